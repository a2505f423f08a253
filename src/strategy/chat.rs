use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::command_lang::{ContextObject, Strategy, Value};
use crate::config::CommandLangConfig;
use crate::PlatformResult;

/// The invoking message as seen by CommandLang.
#[async_trait]
pub trait ChatContext: Send + Sync {
    fn author(&self) -> Arc<dyn ContextObject>;

    /// Highest role of the author.
    fn top_role(&self) -> Arc<dyn ContextObject>;

    fn channel(&self) -> Arc<dyn ContextObject>;

    /// Category of the channel, if it is in one.
    fn category(&self) -> Option<Arc<dyn ContextObject>>;

    /// Sends a message to the channel the context came from.
    async fn send(&self, content: &str) -> PlatformResult<()>;

    /// Number of custom commands already rendering on behalf of this message.
    fn command_depth(&self) -> usize {
        0
    }
}

/// A bot command that CommandLang can invoke from an exec block.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    /// Permission check for the invoking context.
    async fn can_run(&self, _context: &dyn ChatContext) -> bool {
        true
    }

    async fn invoke(&self, context: Arc<dyn ChatContext>, args: Vec<String>) -> PlatformResult<()>;
}

/// Lookup of bot commands by name.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRegistry: Send + Sync {
    fn get(&self, name: &str) -> Option<Arc<dyn Command>>;
}

/// Strategy for chat messages: names resolve to live context objects and unknown names
/// are tried as bot commands.
///
/// | token | resolves to |
/// |-------|-------------|
/// | `a`, `author` | message author |
/// | `r`, `role` | author's top role |
/// | `ch`, `channel` | channel |
/// | `cat`, `category` | channel category |
/// | `n` | `"name"` |
/// | `disc` | `"discriminator"` |
/// | `c` | `"colour"` |
/// | `d`, `display` | `"display_name"` |
///
/// Full attribute names such as `nick` are only attribute names after `:`; a bare `{nick}`
/// is looked up as a command.
#[derive(Clone)]
pub struct ChatStrategy {
    registry: Arc<dyn CommandRegistry>,
    denied_message: Arc<str>,
}

impl ChatStrategy {
    pub fn new(registry: Arc<dyn CommandRegistry>) -> Self {
        Self::from_config(registry, &CommandLangConfig::default())
    }

    pub fn from_config(registry: Arc<dyn CommandRegistry>, config: &CommandLangConfig) -> Self {
        Self {
            registry,
            denied_message: Arc::from(config.denied_message.as_str()),
        }
    }

    pub fn registry(&self) -> &Arc<dyn CommandRegistry> {
        &self.registry
    }
}

impl Strategy for ChatStrategy {
    type Context = Arc<dyn ChatContext>;

    fn resolve_value(&self, context: &Self::Context, token: &str) -> Option<Value> {
        if let Ok(number) = token.parse::<f64>() {
            return Some(Value::Float(number));
        }
        match token {
            "a" | "author" => Some(Value::Object(context.author())),
            "r" | "role" => Some(Value::Object(context.top_role())),
            "ch" | "channel" => Some(Value::Object(context.channel())),
            "cat" | "category" => context.category().map(Value::Object),
            "n" => Some(Value::from("name")),
            "disc" => Some(Value::from("discriminator")),
            "c" => Some(Value::from("colour")),
            "d" | "display" => Some(Value::from("display_name")),
            _ => unquote(token).map(Value::from),
        }
    }

    fn execute_command(&self, context: &Self::Context, command: &str) -> bool {
        let mut parts = command.split_whitespace();
        let Some(name) = parts.next() else {
            return false;
        };
        let Some(found) = self.registry.get(name) else {
            debug!("no command named {:?}", name);
            return false;
        };
        let args: Vec<String> = parts.map(String::from).collect();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Cannot schedule command {}: {}", name, e);
                return false;
            }
        };
        let context = Arc::clone(context);
        let denied_message = Arc::clone(&self.denied_message);
        handle.spawn(async move {
            run_checked(found, context, args, &denied_message).await;
        });
        true
    }
}

/// Runs a command if the context is allowed to, otherwise tells the channel it isn't.
/// Failures are logged, never returned.
#[tracing::instrument(level = "debug", skip_all, fields(command = command.name()))]
pub async fn run_checked(
    command: Arc<dyn Command>,
    context: Arc<dyn ChatContext>,
    args: Vec<String>,
    denied_message: &str,
) {
    if command.can_run(context.as_ref()).await {
        if let Err(e) = command.invoke(Arc::clone(&context), args).await {
            warn!("Command {} failed: {}", command.name(), e);
        }
    } else if let Err(e) = context.send(denied_message).await {
        warn!("Failed to report denied command {}: {}", command.name(), e);
    }
}

fn unquote(token: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        token
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

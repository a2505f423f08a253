use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tracing::debug;

use crate::command_lang::ContextObject;
use crate::strategy::{ChatContext, ChatStrategy, Command};
use crate::{CommandLang, PlatformError, PlatformResult};

/// A user defined command whose response is a CommandLang document.
///
/// Invoking it renders `text` against the invoking message and sends the trimmed result,
/// if any, back to the channel. The runner is held weakly: it usually owns, through its
/// strategy, the registry this command is stored in.
///
/// Commands started from the rendered text see a context one level deeper; past the
/// runner's `max_depth` the invocation fails instead of rendering.
pub struct CustomCommand {
    name: String,
    text: String,
    runner: Weak<CommandLang<ChatStrategy>>,
}

impl CustomCommand {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        runner: &Arc<CommandLang<ChatStrategy>>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            runner: Arc::downgrade(runner),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn failed(&self, message: impl Into<String>) -> PlatformError {
        PlatformError::CommandFailed {
            command: self.name.clone(),
            message: message.into(),
        }
    }

    /// Renders the response without sending it.
    pub fn render(&self, context: &Arc<dyn ChatContext>) -> PlatformResult<String> {
        let runner = self
            .runner
            .upgrade()
            .ok_or_else(|| self.failed("runner is no longer available"))?;

        let depth = context.command_depth();
        let max_depth = runner.config().max_depth;
        if depth >= max_depth {
            return Err(self.failed(format!(
                "custom commands nested deeper than {} levels",
                max_depth
            )));
        }

        let nested: Arc<dyn ChatContext> = Arc::new(NestedContext {
            inner: Arc::clone(context),
            depth: depth + 1,
        });
        let out = runner.run(&nested, &self.text)?;
        Ok(out.trim().to_string())
    }
}

#[async_trait]
impl Command for CustomCommand {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, context: Arc<dyn ChatContext>, _args: Vec<String>) -> PlatformResult<()> {
        let response = self.render(&context)?;
        if response.is_empty() {
            debug!("custom command {} rendered nothing", self.name);
            return Ok(());
        }
        context.send(&response).await
    }
}

/// The invoking context, seen from inside a custom command.
struct NestedContext {
    inner: Arc<dyn ChatContext>,
    depth: usize,
}

#[async_trait]
impl ChatContext for NestedContext {
    fn author(&self) -> Arc<dyn ContextObject> {
        self.inner.author()
    }

    fn top_role(&self) -> Arc<dyn ContextObject> {
        self.inner.top_role()
    }

    fn channel(&self) -> Arc<dyn ContextObject> {
        self.inner.channel()
    }

    fn category(&self) -> Option<Arc<dyn ContextObject>> {
        self.inner.category()
    }

    async fn send(&self, content: &str) -> PlatformResult<()> {
        self.inner.send(content).await
    }

    fn command_depth(&self) -> usize {
        self.depth
    }
}

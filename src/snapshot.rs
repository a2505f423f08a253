//! Serializable stand-in for a live chat message.
//!
//! A [`ContextSnapshot`] describes the author, their top role, the channel and its category
//! as plain data. [`ContextSnapshot::into_context`] turns it into a [`ChatContext`] whose
//! sent messages arrive on an unbounded channel, which is what the CLI and the tests use in
//! place of a real chat connection.

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::trace;

use crate::command_lang::{ContextObject, Value};
use crate::strategy::ChatContext;
use crate::{PlatformError, PlatformResult};

/// A member, role, channel or category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.discriminator {
            Some(discriminator) => write!(f, "{}#{}", self.name, discriminator),
            None => write!(f, "{}", self.name),
        }
    }
}

fn optional(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or_default()
}

impl ContextObject for Entity {
    fn attribute(&self, name: &str) -> Option<Value> {
        let value = match name {
            "name" => Value::String(self.name.clone()),
            "id" => self
                .id
                .and_then(|id| i64::try_from(id).ok())
                .map(Value::Integer)
                .unwrap_or_default(),
            "discriminator" => optional(&self.discriminator),
            "nick" => optional(&self.nick),
            "display_name" => Value::String(
                self.display_name
                    .clone()
                    .or_else(|| self.nick.clone())
                    .unwrap_or_else(|| self.name.clone()),
            ),
            "colour" => Value::String(self.colour.clone().unwrap_or_else(|| "#000000".into())),
            _ => return None,
        };
        Some(value)
    }
}

/// Plain data description of an invoking message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub author: Entity,
    pub top_role: Entity,
    pub channel: Entity,
    #[serde(default)]
    pub category: Option<Entity>,
}

impl Default for ContextSnapshot {
    fn default() -> Self {
        Self {
            author: Entity::named("user"),
            top_role: Entity::named("@everyone"),
            channel: Entity::named("general"),
            category: None,
        }
    }
}

impl ContextSnapshot {
    /// Builds a live context and the receiving end of its outbox.
    pub fn into_context(self) -> (SnapshotContext, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let context = SnapshotContext {
            author: Arc::new(self.author),
            top_role: Arc::new(self.top_role),
            channel: Arc::new(self.channel),
            category: self.category.map(Arc::new),
            outbox: sender,
        };
        (context, receiver)
    }
}

/// [`ChatContext`] backed by a [`ContextSnapshot`].
///
/// Object handles are created once, so repeated lookups of the same name are identical.
#[derive(Debug, Clone)]
pub struct SnapshotContext {
    author: Arc<Entity>,
    top_role: Arc<Entity>,
    channel: Arc<Entity>,
    category: Option<Arc<Entity>>,
    outbox: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl ChatContext for SnapshotContext {
    fn author(&self) -> Arc<dyn ContextObject> {
        self.author.clone()
    }

    fn top_role(&self) -> Arc<dyn ContextObject> {
        self.top_role.clone()
    }

    fn channel(&self) -> Arc<dyn ContextObject> {
        self.channel.clone()
    }

    fn category(&self) -> Option<Arc<dyn ContextObject>> {
        self.category
            .clone()
            .map(|category| category as Arc<dyn ContextObject>)
    }

    async fn send(&self, content: &str) -> PlatformResult<()> {
        trace!("send to {}: {:?}", self.channel.name, content);
        self.outbox
            .send(content.to_string())
            .map_err(|e| PlatformError::SendFailed {
                message: e.to_string(),
            })
    }
}

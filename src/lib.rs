//! # Talos
//!
//! CommandLang, the template language used by the Talos chat bot for custom commands and
//! scheduled events, together with the chat-side plumbing it needs.
//!
//! * [`command_lang`]: lexer, expression evaluator and interpreter
//! * [`strategy`]: how names resolve and commands run, for chat messages and for events
//! * [`custom_command`]: user defined commands backed by a CommandLang document
//! * [`registry`]: in-memory command table
//! * [`snapshot`]: serializable message context, used by the CLI and tests
//! * [`config`]: JSON configuration
//!
//! ```
//! use talos::{ContextFreeStrategy, ContextFreeRunner};
//!
//! let runner = ContextFreeRunner::new(ContextFreeStrategy);
//! assert_eq!(runner.run(&(), "Hello {world}[if a = b](!)").unwrap(), "Hello world");
//! ```

pub mod command_lang;
pub mod config;
pub mod custom_command;
pub mod error;
pub mod registry;
pub mod snapshot;
pub mod strategy;

// Re-exports
pub use command_lang::{CommandLang, ContextObject, Interpreter, Lexer, Strategy, Token, Value};
pub use config::CommandLangConfig;
pub use custom_command::CustomCommand;
pub use error::*;
pub use registry::InMemoryRegistry;
pub use snapshot::{ContextSnapshot, Entity, SnapshotContext};
pub use strategy::{ChatContext, ChatStrategy, Command, CommandRegistry, ContextFreeStrategy};

/// Runner for custom commands.
pub type ChatRunner = CommandLang<ChatStrategy>;
/// Runner for scheduled events.
pub type ContextFreeRunner = CommandLang<ContextFreeStrategy>;

//! Platform bindings for the CommandLang interpreter.
//!
//! * [`ChatStrategy`]: custom commands run from a chat message, with access to the author,
//!   their top role, the channel and its category, and to other bot commands.
//! * [`ContextFreeStrategy`]: scheduled events, where nothing resolves and nothing runs.

pub mod chat;
pub mod context_free;

pub use chat::{run_checked, ChatContext, ChatStrategy, Command, CommandRegistry};
pub use context_free::ContextFreeStrategy;

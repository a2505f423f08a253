use crate::command_lang::{Strategy, Value};

/// Strategy that ignores all context.
///
/// Every token resolves to its own text, so exec blocks render literally and commands are
/// never reached. Used for scheduled events, which have no invoking message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFreeStrategy;

impl Strategy for ContextFreeStrategy {
    type Context = ();

    fn resolve_value(&self, _context: &(), token: &str) -> Option<Value> {
        Some(Value::from(token))
    }

    fn execute_command(&self, _context: &(), _command: &str) -> bool {
        true
    }
}

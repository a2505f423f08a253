use tracing::{debug, trace};

use super::expression::{evaluate, lex_expression};
use super::instruction::{ConditionalKind, Token};
use super::lexer::Lexer;
use super::operator::Operator;
use super::value::Value;
use crate::{CommandLangError, CommandLangResult};

/// Binds the generic interpreter to a host platform.
///
/// The interpreter owns the grammar; a strategy decides what names mean and what running
/// a command means.
pub trait Strategy: Send + Sync {
    /// Whatever the platform needs to resolve names, e.g. the invoking message.
    type Context: ?Sized;

    /// Resolves an operand token to a value, or `None` when the token names nothing.
    fn resolve_value(&self, context: &Self::Context, token: &str) -> Option<Value>;

    /// Tries to run `command` (name followed by space separated arguments).
    ///
    /// Returns whether a command was found and handed off. Must not block on the
    /// command's completion.
    fn execute_command(&self, context: &Self::Context, command: &str) -> bool;
}

/// Walks a token stream and renders it to a string.
#[derive(Debug, Clone)]
pub struct Interpreter<S> {
    strategy: S,
    lexer: Lexer,
    max_depth: usize,
}

impl<S: Strategy> Interpreter<S> {
    pub fn new(strategy: S, max_depth: usize) -> Self {
        Self {
            strategy,
            lexer: Lexer::new(),
            max_depth,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Top level entry point for rendering lexed tokens.
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
    pub fn interpret(&self, context: &S::Context, tokens: &[Token]) -> CommandLangResult<String> {
        self.interpret_at(context, tokens, 0)
    }

    fn interpret_at(
        &self,
        context: &S::Context,
        tokens: &[Token],
        depth: usize,
    ) -> CommandLangResult<String> {
        let mut out = String::new();
        // Set while the current if/elif run has not selected a branch yet.
        let mut if_else = false;

        for token in tokens {
            let instruction = token.instruction();
            trace!(opcode = instruction.opcode(), depth, "{}", instruction);
            match token {
                Token::Conditional {
                    kind: ConditionalKind::If,
                    predicate,
                    body,
                } => {
                    if self.eval_predicate(context, predicate.as_deref())? {
                        out.push_str(&self.interpret_body(context, body, depth)?);
                        if_else = false;
                    } else {
                        if_else = true;
                    }
                }
                Token::Conditional {
                    kind: ConditionalKind::Elif,
                    predicate,
                    body,
                } if if_else => {
                    if self.eval_predicate(context, predicate.as_deref())? {
                        out.push_str(&self.interpret_body(context, body, depth)?);
                        if_else = false;
                    }
                }
                Token::Conditional {
                    kind: ConditionalKind::Else,
                    body,
                    ..
                } if if_else => {
                    out.push_str(&self.interpret_body(context, body, depth)?);
                    if_else = false;
                }
                Token::Conditional { .. } => if_else = false,
                Token::Exec(text) => {
                    out.push_str(&self.eval_exec(context, text)?);
                    if_else = false;
                }
                Token::Raw(text) => {
                    out.push_str(text);
                    if_else = false;
                }
            }
        }

        Ok(out)
    }

    fn eval_predicate(&self, context: &S::Context, predicate: Option<&str>) -> CommandLangResult<bool> {
        let tokens = lex_expression(predicate.unwrap_or_default());
        let result = evaluate(&tokens, |token| self.strategy.resolve_value(context, token))?;
        trace!("predicate {:?} -> {}", predicate, result);
        Ok(result)
    }

    fn interpret_body(
        &self,
        context: &S::Context,
        body: &str,
        depth: usize,
    ) -> CommandLangResult<String> {
        if depth >= self.max_depth {
            return Err(CommandLangError::syntax(format!(
                "Conditional blocks nested deeper than {} levels",
                self.max_depth
            )));
        }
        let tokens = self.lexer.lex(body)?;
        self.interpret_at(context, &tokens, depth + 1)
    }

    /// Renders an exec block: a value if the text resolves to one, otherwise a command
    /// invocation, otherwise the text itself.
    fn eval_exec(&self, context: &S::Context, text: &str) -> CommandLangResult<String> {
        let value = match text.split_once(':') {
            Some((object, attribute)) => {
                let object = self.strategy.resolve_value(context, object.trim());
                let attribute = attribute.trim();
                let attribute = self
                    .strategy
                    .resolve_value(context, attribute)
                    .unwrap_or_else(|| Value::from(attribute));
                Some(Operator::Attribute.apply(&[object.unwrap_or_default(), attribute])?)
            }
            None => self.strategy.resolve_value(context, text.trim()),
        };

        match value {
            Some(value) => Ok(value.to_string()),
            None if self.strategy.execute_command(context, text) => {
                debug!("exec {:?} handed off as a command", text);
                Ok(String::new())
            }
            None => Ok(text.to_string()),
        }
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::interpreter::{Interpreter, Strategy};
use super::lexer::Lexer;
use crate::config::CommandLangConfig;
use crate::CommandLangResult;

lazy_static! {
    // Block openers only; a document containing one is always lexed.
    static ref OPERATORS: Regex = Regex::new(r"\[(?:if|elif|else)[ \]]|\{").unwrap();
}

/// Lexer and interpreter wired together behind a single `run` call.
///
/// ```
/// use talos::{CommandLang, ContextFreeStrategy};
///
/// let runner = CommandLang::new(ContextFreeStrategy);
/// let out = runner.run(&(), "[if 1=2](A)[elif 1=1](B)[else](C)").unwrap();
/// assert_eq!(out, "B");
/// ```
#[derive(Debug, Clone)]
pub struct CommandLang<S> {
    lexer: Lexer,
    interpreter: Interpreter<S>,
    config: CommandLangConfig,
}

impl<S: Strategy> CommandLang<S> {
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, CommandLangConfig::default())
    }

    pub fn with_config(strategy: S, config: CommandLangConfig) -> Self {
        Self {
            lexer: Lexer::new(),
            interpreter: Interpreter::new(strategy, config.max_depth),
            config,
        }
    }

    pub fn strategy(&self) -> &S {
        self.interpreter.strategy()
    }

    pub fn config(&self) -> &CommandLangConfig {
        &self.config
    }

    /// Checks whether a string contains a CommandLang block opener.
    pub fn operators_exist(source: &str) -> bool {
        OPERATORS.is_match(source)
    }

    /// Renders `source` against `context`.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn run(&self, context: &S::Context, source: &str) -> CommandLangResult<String> {
        if self.config.fast_path && !Self::operators_exist(source) {
            trace!("no CommandLang blocks, returning source unchanged");
            return Ok(source.to_string());
        }

        let tokens = self.lexer.lex(source)?;
        let out = self.interpreter.interpret(context, &tokens)?;
        debug!("rendered {} tokens into {} bytes", tokens.len(), out.len());
        Ok(out)
    }
}

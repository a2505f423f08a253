//! # Statement Lexer
//!
//! Scans CommandLang source into [`Token`]s in a single forward pass.
//!
//! Outside of blocks, `\` escapes the next character, `[` opens a conditional block and
//! `{` opens an exec block. Conditional blocks are scanned by a small state machine:
//!
//! ```text
//! [ Keyword ─' '→ Predicate ─']'→ AwaitBody ─'('→ Body ─')'→ done
//!           └───────────────']'──┘
//! ```
//!
//! The body keeps its escapes and balances nested parentheses, so it can be lexed again
//! when the interpreter selects it.

use std::str::Chars;

use tracing::trace;

use super::instruction::{ConditionalKind, Token};
use crate::{CommandLangError, CommandLangResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn lex(&self, source: &str) -> CommandLangResult<Vec<Token>> {
        let tokens = Scanner::new(source).lex_document()?;
        trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionalState {
    Keyword,
    Predicate,
    AwaitBody,
    Body,
}

struct Scanner<'a> {
    chars: Chars<'a>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
        }
    }

    fn lex_document(&mut self) -> CommandLangResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut raw = String::new();

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = self.chars.next() {
                        raw.push(escaped);
                    }
                }
                '[' => {
                    flush_raw(&mut tokens, &mut raw);
                    tokens.push(self.lex_conditional()?);
                }
                '{' => {
                    flush_raw(&mut tokens, &mut raw);
                    tokens.push(Token::Exec(self.lex_exec()));
                }
                _ => raw.push(c),
            }
        }
        flush_raw(&mut tokens, &mut raw);

        Ok(tokens)
    }

    /// Scans the rest of a conditional block, the opening `[` already consumed.
    fn lex_conditional(&mut self) -> CommandLangResult<Token> {
        let mut state = ConditionalState::Keyword;
        let mut kind = None;
        let mut predicate = String::new();
        let mut raw = String::new();
        let mut depth = 0usize;

        while let Some(c) = self.chars.next() {
            match state {
                ConditionalState::Keyword => match c {
                    '\\' => raw.extend(self.chars.next()),
                    ' ' => {
                        kind = Some(parse_kind(&raw)?);
                        raw.clear();
                        state = ConditionalState::Predicate;
                    }
                    ']' => {
                        let parsed = parse_kind(&raw)?;
                        check_predicate(parsed, "")?;
                        kind = Some(parsed);
                        raw.clear();
                        state = ConditionalState::AwaitBody;
                    }
                    _ => raw.push(c),
                },
                ConditionalState::Predicate => match c {
                    '\\' => raw.extend(self.chars.next()),
                    ']' => {
                        if let Some(kind) = kind {
                            check_predicate(kind, &raw)?;
                        }
                        predicate = std::mem::take(&mut raw);
                        state = ConditionalState::AwaitBody;
                    }
                    _ => raw.push(c),
                },
                ConditionalState::AwaitBody => {
                    if c != '(' {
                        return Err(CommandLangError::syntax("If statement missing result"));
                    }
                    state = ConditionalState::Body;
                }
                ConditionalState::Body => match c {
                    '\\' => {
                        raw.push('\\');
                        raw.extend(self.chars.next());
                    }
                    '(' => {
                        depth += 1;
                        raw.push(c);
                    }
                    ')' if depth == 0 => {
                        let kind = kind.unwrap_or(ConditionalKind::If);
                        let predicate = match kind {
                            ConditionalKind::Else => None,
                            _ => Some(predicate),
                        };
                        return Ok(Token::Conditional {
                            kind,
                            predicate,
                            body: raw,
                        });
                    }
                    ')' => {
                        depth -= 1;
                        raw.push(c);
                    }
                    _ => raw.push(c),
                },
            }
        }

        // Input ended inside the block.
        match state {
            ConditionalState::Keyword => {
                let kind = parse_kind(&raw)?;
                check_predicate(kind, "")?;
                Err(CommandLangError::syntax("If statement missing result"))
            }
            ConditionalState::Predicate => {
                if let Some(kind) = kind {
                    check_predicate(kind, &raw)?;
                }
                Err(CommandLangError::syntax("If statement missing result"))
            }
            ConditionalState::AwaitBody => {
                Err(CommandLangError::syntax("If statement missing result"))
            }
            ConditionalState::Body => {
                Err(CommandLangError::syntax("Unexpected end of expression"))
            }
        }
    }

    /// Scans the rest of an exec block, the opening `{` already consumed. End of input
    /// closes the block.
    fn lex_exec(&mut self) -> String {
        let mut raw = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => raw.extend(self.chars.next()),
                '}' => break,
                _ => raw.push(c),
            }
        }
        raw
    }
}

fn flush_raw(tokens: &mut Vec<Token>, raw: &mut String) {
    if !raw.is_empty() {
        tokens.push(Token::Raw(std::mem::take(raw)));
    }
}

fn parse_kind(keyword: &str) -> CommandLangResult<ConditionalKind> {
    keyword
        .parse()
        .map_err(|_| CommandLangError::syntax("Invalid if statement type"))
}

fn check_predicate(kind: ConditionalKind, predicate: &str) -> CommandLangResult<()> {
    match kind {
        ConditionalKind::Else if !predicate.trim().is_empty() => Err(CommandLangError::syntax(
            "Else statement contains unexpected boolean expression",
        )),
        ConditionalKind::If | ConditionalKind::Elif if predicate.trim().is_empty() => Err(
            CommandLangError::syntax("If statement missing boolean expression"),
        ),
        _ => Ok(()),
    }
}

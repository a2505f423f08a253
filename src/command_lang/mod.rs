//! # CommandLang
//!
//! CommandLang is the small markdown-styled template language behind Talos custom
//! commands and scheduled events. A document is literal text interleaved with
//! conditional blocks and exec blocks:
//!
//! ```text
//! Hello {author:name}! [if author:nick = "admin"](Welcome back.)[else](Nice to meet you.)
//! ```
//!
//! The language is not Turing complete: there is no looping, only conditional selection
//! of text and substitution of values or command invocations.
//!
//! ## Pipeline
//!
//! ```text
//! source → Lexer → [Token] → Interpreter ─┬─ conditional → lex_expression → evaluate
//!                                          └─ exec → Strategy (resolve / execute)
//! ```
//!
//! * [`lexer`]: character scanner producing [`Token`]s
//! * [`expression`]: predicate tokenizer and shunting-yard evaluator
//! * [`operator`]: operator table and the attribute allow-list
//! * [`value`]: runtime values and the [`ContextObject`] seam
//! * [`interpreter`]: token walker and the [`Strategy`] trait
//! * [`runner`]: the [`CommandLang`] façade exposing `run`
//!
//! Interpretation is synchronous and holds no state between calls. Commands launched from
//! exec blocks are handed off by the strategy and are not ordered relative to the rendered
//! text.

pub mod expression;
pub mod instruction;
pub mod interpreter;
pub mod lexer;
pub mod operator;
pub mod runner;
pub mod value;

pub use expression::{evaluate, evaluate_value, lex_expression};
pub use instruction::{ConditionalKind, Instruction, Token};
pub use interpreter::{Interpreter, Strategy};
pub use lexer::Lexer;
pub use operator::{Operator, ALLOWED_ATTRIBUTES};
pub use runner::CommandLang;
pub use value::{ContextObject, Value};

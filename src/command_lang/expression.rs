//! Predicate tokenizer and evaluator.
//!
//! Predicates are split into a flat list of strings by [`lex_expression`] and evaluated
//! with a two-stack shunting-yard pass by [`evaluate`]. A token found in the operator table
//! is an operator; everything else is an operand resolved through a caller supplied
//! callback, which is how strategies bind names to their context.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use super::operator::Operator;
use super::value::Value;
use crate::{CommandLangError, CommandLangResult};

lazy_static! {
    // A quoted string (escaped quotes and backslashes allowed inside) or any single
    // non-word character.
    static ref SPLIT: Regex =
        Regex::new(r#""(?:.*?[^\\](?:\\\\)*?)?"|'(?:.*?[^\\](?:\\\\)*?)?'|\W"#).unwrap();
    static ref BACKSLASHES: Regex = Regex::new(r"\\+").unwrap();
}

/// Splits a predicate into operand and operator strings.
///
/// Separators are kept as tokens; whitespace-only and empty pieces are dropped. Inside a
/// token every run of `2n` or `2n + 1` backslashes collapses to `n`, so a lone backslash
/// disappears.
pub fn lex_expression(expression: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in SPLIT.find_iter(expression) {
        pieces.push(&expression[last..m.start()]);
        pieces.push(m.as_str());
        last = m.end();
    }
    pieces.push(&expression[last..]);

    pieces
        .into_iter()
        .map(|piece| {
            if piece.contains('\\') {
                BACKSLASHES
                    .replace_all(piece, |caps: &Captures| "\\".repeat(caps[0].len() / 2))
                    .into_owned()
            } else {
                piece.to_string()
            }
        })
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Evaluates expression tokens and coerces the result by truthiness.
pub fn evaluate<F>(tokens: &[String], resolve: F) -> CommandLangResult<bool>
where
    F: FnMut(&str) -> Option<Value>,
{
    evaluate_value(tokens, resolve).map(|value| value.is_truthy())
}

/// Evaluates expression tokens to a single value.
///
/// Operands that `resolve` does not recognise evaluate to [`Value::Null`], except right
/// after `:`, where they name the attribute to read.
pub fn evaluate_value<F>(tokens: &[String], mut resolve: F) -> CommandLangResult<Value>
where
    F: FnMut(&str) -> Option<Value>,
{
    let mut operators: Vec<Operator> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    let mut dangling = false;
    let mut after_attribute = false;

    for token in tokens {
        let operator = Operator::parse(token);
        let attribute_next = operator == Some(Operator::Attribute);
        match operator {
            Some(Operator::OpenParen) => {
                operators.push(Operator::OpenParen);
                dangling = false;
            }
            Some(Operator::CloseParen) => {
                while matches!(operators.last(), Some(top) if *top != Operator::OpenParen) {
                    apply_top(&mut operators, &mut values)?;
                }
                if operators.last() == Some(&Operator::OpenParen) {
                    operators.pop();
                }
                dangling = false;
            }
            Some(op) => {
                while matches!(
                    operators.last(),
                    Some(top) if *top != Operator::OpenParen && top.precedence() >= op.precedence()
                ) {
                    apply_top(&mut operators, &mut values)?;
                }
                operators.push(op);
                dangling = !op.is_unary();
            }
            None => {
                let value = match resolve(token) {
                    Some(value) => value,
                    None if after_attribute => Value::String(token.clone()),
                    None => Value::Null,
                };
                values.push(value);
                dangling = false;
            }
        }
        after_attribute = attribute_next;
    }

    if dangling {
        return Err(CommandLangError::syntax("Invalid Boolean Expression"));
    }
    while !operators.is_empty() {
        apply_top(&mut operators, &mut values)?;
    }

    trace!("expression {:?} left values {:?}", tokens, values);
    // If we have dangling operators or variables, something went wrong.
    match values.pop() {
        Some(value) if values.is_empty() => Ok(value),
        _ => Err(CommandLangError::syntax("Invalid Boolean Expression")),
    }
}

fn apply_top(operators: &mut Vec<Operator>, values: &mut Vec<Value>) -> CommandLangResult<()> {
    let Some(op) = operators.pop() else {
        return Ok(());
    };
    let arity = op.arity();
    if values.len() < arity {
        return Err(CommandLangError::operator(
            "One value supplied to two value operator",
        ));
    }
    let operands = values.split_off(values.len() - arity);
    values.push(op.apply(&operands)?);
    Ok(())
}

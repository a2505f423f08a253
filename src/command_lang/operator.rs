//! # Operator Table
//!
//! Every operator CommandLang understands, with its precedence and semantics.
//!
//! | symbol | precedence | arity |
//! |--------|-----------:|------:|
//! | `(` `)` | -1 | - |
//! | `=` `is` | 0 | 2 |
//! | `or` `+` `-` | 10 | 2 |
//! | `and` `*` `/` | 20 | 2 |
//! | `^` | 30 | 2 |
//! | `not` | 30 | 1 |
//! | `:` | 40 | 2 |
//!
//! Comparison and logical operators always produce `0` or `1` integers.

use strum_macros::{AsRefStr, Display, EnumString};

use super::value::Value;
use crate::{CommandLangError, CommandLangResult};

/// Attribute names reachable through the `:` operator.
pub const ALLOWED_ATTRIBUTES: [&str; 6] =
    ["name", "colour", "id", "discriminator", "nick", "display_name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum Operator {
    #[strum(serialize = "(")]
    OpenParen,
    #[strum(serialize = ")")]
    CloseParen,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = "is")]
    Is,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "^")]
    Power,
    #[strum(serialize = "not")]
    Not,
    #[strum(serialize = ":")]
    Attribute,
}

impl Operator {
    /// Looks up an expression token in the operator table.
    pub fn parse(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    pub fn precedence(self) -> i32 {
        match self {
            Operator::OpenParen | Operator::CloseParen => -1,
            Operator::Equal | Operator::Is => 0,
            Operator::Or | Operator::Plus | Operator::Minus => 10,
            Operator::And | Operator::Multiply | Operator::Divide => 20,
            Operator::Power | Operator::Not => 30,
            Operator::Attribute => 40,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Operator::OpenParen | Operator::CloseParen => 0,
            Operator::Not => 1,
            _ => 2,
        }
    }

    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// Applies the operator to already resolved operands, left operand first.
    pub fn apply(self, operands: &[Value]) -> CommandLangResult<Value> {
        if operands.len() != self.arity() {
            return Err(CommandLangError::operator(format!(
                "Operator {} takes {} operand(s), {} supplied",
                self,
                self.arity(),
                operands.len()
            )));
        }
        match self {
            Operator::Not => Ok(Value::from_bool(!operands[0].is_truthy())),
            Operator::OpenParen | Operator::CloseParen => Err(CommandLangError::syntax(
                "Unbalanced parenthesis in expression",
            )),
            _ => self.apply_binary(&operands[0], &operands[1]),
        }
    }

    fn apply_binary(self, left: &Value, right: &Value) -> CommandLangResult<Value> {
        match self {
            Operator::Equal => Ok(Value::from_bool(loose_eq(left, right))),
            Operator::Is => Ok(Value::from_bool(left == right)),
            Operator::And => Ok(Value::from_bool(left.is_truthy() && right.is_truthy())),
            Operator::Or => Ok(Value::from_bool(left.is_truthy() || right.is_truthy())),
            Operator::Attribute => get_attribute(left, right),
            Operator::Plus => match (left, right) {
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => self.arithmetic(left, right),
            },
            _ => self.arithmetic(left, right),
        }
    }

    fn arithmetic(self, left: &Value, right: &Value) -> CommandLangResult<Value> {
        if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
            let exact = match self {
                Operator::Plus => a.checked_add(*b),
                Operator::Minus => a.checked_sub(*b),
                Operator::Multiply => a.checked_mul(*b),
                Operator::Power => u32::try_from(*b).ok().and_then(|exp| a.checked_pow(exp)),
                _ => None,
            };
            if let Some(result) = exact {
                return Ok(Value::Integer(result));
            }
        }

        let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
            return Err(CommandLangError::operator(format!(
                "Unsupported operand types for {}: {} and {}",
                self,
                left.type_name(),
                right.type_name()
            )));
        };
        let result = match self {
            Operator::Plus => a + b,
            Operator::Minus => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => {
                if b == 0.0 {
                    return Err(CommandLangError::operator("Division by zero"));
                }
                a / b
            }
            Operator::Power => a.powf(b),
            _ => unreachable!("{} is not an arithmetic operator", self),
        };
        Ok(Value::Float(result))
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// The `:` operator: reads an allow-listed attribute from a context object.
///
/// `colour` is always returned in its string form.
pub fn get_attribute(object: &Value, attribute: &Value) -> CommandLangResult<Value> {
    let name = match attribute {
        Value::String(name) if ALLOWED_ATTRIBUTES.contains(&name.as_str()) => name.as_str(),
        other => return Err(CommandLangError::invalid_attribute(other.to_string())),
    };
    let Value::Object(object) = object else {
        return Err(CommandLangError::invalid_attribute(name));
    };
    match object.attribute(name) {
        Some(value) if name == "colour" => Ok(Value::String(value.to_string())),
        Some(value) => Ok(value),
        None => Err(CommandLangError::invalid_attribute(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;
    use std::sync::Arc;

    use crate::command_lang::value::ContextObject;

    #[derive(Debug)]
    struct Member;

    impl fmt::Display for Member {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "Bob#0420")
        }
    }

    impl ContextObject for Member {
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some("Bob".into()),
                "id" => Some(Value::Integer(42)),
                "colour" => Some(Value::Integer(0xff0000)),
                _ => None,
            }
        }
    }

    fn member() -> Value {
        Value::Object(Arc::new(Member))
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(Operator::parse("is"), Some(Operator::Is));
        assert_eq!(Operator::parse(":"), Some(Operator::Attribute));
        assert_eq!(Operator::parse("^"), Some(Operator::Power));
        assert_eq!(Operator::parse("xor"), None);
        assert_eq!(Operator::parse("1"), None);
        assert!(Operator::Multiply.precedence() > Operator::Plus.precedence());
        assert!(Operator::Attribute.precedence() > Operator::Not.precedence());
    }

    #[test]
    fn test_equality_returns_integers() {
        let eq = Operator::Equal.apply(&[Value::Float(1.0), Value::Integer(1)]);
        assert_eq!(eq, Ok(Value::Integer(1)));
        let eq = Operator::Equal.apply(&["a".into(), "b".into()]);
        assert_eq!(eq, Ok(Value::Integer(0)));
    }

    #[test]
    fn test_is_is_strict() {
        let is = Operator::Is.apply(&[Value::Float(1.0), Value::Integer(1)]);
        assert_eq!(is, Ok(Value::Integer(0)));
        let obj = member();
        assert_eq!(
            Operator::Is.apply(&[obj.clone(), obj]),
            Ok(Value::Integer(1))
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            Operator::And.apply(&["x".into(), Value::Integer(0)]),
            Ok(Value::Integer(0))
        );
        assert_eq!(
            Operator::Or.apply(&["x".into(), Value::Integer(0)]),
            Ok(Value::Integer(1))
        );
        assert_eq!(Operator::Not.apply(&[Value::Null]), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            Operator::Plus.apply(&[Value::Float(2.0), Value::Float(3.0)]),
            Ok(Value::Float(5.0))
        );
        assert_eq!(
            Operator::Power.apply(&[Value::Integer(2), Value::Integer(10)]),
            Ok(Value::Integer(1024))
        );
        assert_eq!(
            Operator::Divide.apply(&[Value::Integer(7), Value::Integer(2)]),
            Ok(Value::Float(3.5))
        );
        assert_eq!(
            Operator::Plus.apply(&["2".into(), "1".into()]),
            Ok(Value::String("21".into()))
        );
    }

    #[test]
    fn test_arithmetic_errors() {
        let err = Operator::Minus.apply(&["a".into(), Value::Integer(1)]);
        assert!(matches!(err, Err(CommandLangError::Operator(_))));
        let err = Operator::Divide.apply(&[Value::Integer(1), Value::Integer(0)]);
        assert!(matches!(err, Err(CommandLangError::Operator(_))));
        let err = Operator::Plus.apply(&[Value::Integer(1)]);
        assert!(matches!(err, Err(CommandLangError::Operator(_))));
    }

    #[test]
    fn test_attribute_access() {
        assert_eq!(
            get_attribute(&member(), &"name".into()),
            Ok(Value::String("Bob".into()))
        );
        assert_eq!(
            get_attribute(&member(), &"colour".into()),
            Ok(Value::String("16711680".into()))
        );
    }

    #[test]
    fn test_attribute_access_rejects_unlisted_names() {
        let err = get_attribute(&member(), &"password".into()).unwrap_err();
        assert_eq!(
            err,
            CommandLangError::InvalidAttribute(
                "Attempt to access invalid attribute password".into()
            )
        );
        // allow-listed but missing on the object
        let err = get_attribute(&member(), &"nick".into()).unwrap_err();
        assert!(matches!(err, CommandLangError::InvalidAttribute(_)));
        // not an object
        let err = get_attribute(&"author".into(), &"name".into()).unwrap_err();
        assert!(matches!(err, CommandLangError::InvalidAttribute(_)));
    }
}

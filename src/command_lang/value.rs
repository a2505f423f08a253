use core::fmt;
use std::sync::Arc;

/// A platform object reachable from CommandLang, such as a member, role or channel.
///
/// The interpreter never looks inside it except through [`ContextObject::attribute`],
/// and only for names on the attribute allow-list.
pub trait ContextObject: fmt::Display + fmt::Debug + Send + Sync {
    /// Returns the named attribute, or `None` when the object does not have it.
    fn attribute(&self, name: &str) -> Option<Value>;
}

/// Runtime value of an expression operand or exec block.
#[derive(Clone, Debug, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Object(Arc<dyn ContextObject>),
    #[default]
    Null,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
            Value::Null => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Object(_) => "object",
            Value::Null => "none",
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "{}", obj),
            Value::Null => write!(f, "None"),
        }
    }
}

// Integral floats keep a trailing `.0` so `{5}` renders as `5.0`. Very large or small
// magnitudes switch to exponent form with a signed, two digit exponent (`1e+20`).
fn write_float(f: &mut fmt::Formatter, x: f64) -> fmt::Result {
    if x.is_nan() {
        write!(f, "nan")
    } else if x.is_infinite() {
        write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" })
    } else if x != 0.0 && (x.abs() >= 1e16 || x.abs() < 1e-4) {
        let scientific = format!("{:e}", x);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        let exponent: i32 = exponent.parse().unwrap_or_default();
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if x.fract() == 0.0 {
        write!(f, "{:.1}", x)
    } else {
        write!(f, "{}", x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Arc<dyn ContextObject>> for Value {
    fn from(obj: Arc<dyn ContextObject>) -> Self {
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dummy;

    impl fmt::Display for Dummy {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "dummy#0001")
        }
    }

    impl ContextObject for Dummy {
        fn attribute(&self, _name: &str) -> Option<Value> {
            None
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Integer(2).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::Object(Arc::new(Dummy)).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(0.0).to_string(), "0.0");
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(-2.5e16).to_string(), "-2.5e+16");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(0.00001).to_string(), "1e-05");
        assert_eq!(Value::Float(1.5e-300).to_string(), "1.5e-300");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Integer(1).to_string(), "1");
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Object(Arc::new(Dummy)).to_string(), "dummy#0001");
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a: Arc<dyn ContextObject> = Arc::new(Dummy);
        let b: Arc<dyn ContextObject> = Arc::new(Dummy);
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }
}

//! JSON value kinds and helpers shared by the function catalog

use serde_json::{Number, Value};
use std::fmt;

use crate::error::Error;

/// The kind of a JSON value, named the way JMESPath names its types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}
impl Kind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of accepted kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kinds(pub &'static [Kind]);
impl Kinds {
    pub fn contains(&self, kind: Kind) -> bool {
        self.0.contains(&kind)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.contains(Kind::of(value))
    }
}
impl fmt::Display for Kinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => f.write_str("nothing"),
            [only] => write!(f, "{}", only),
            kinds => {
                f.write_str("one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

pub const NULL: Value = Value::Null;

/// Return whether a value is truthy for mapping purposes.
///
/// Unlike JMESPath's own truthiness, zero is falsy here. Empty strings,
/// arrays and objects are falsy, as are `false` and `null`.
///
/// ```rust
/// use serde_json::json;
/// use jmespath_mapping::truthy;
///
/// let trues = [json!(true), json!([0]), json!({"a": 1}), json!(-1), json!("0")];
/// let falses = [json!(false), json!([]), json!({}), json!(""), json!(0), json!(0.0), json!(null)];
///
/// trues.iter().for_each(|v| assert!(truthy(v)));
/// falses.iter().for_each(|v| assert!(!truthy(v)));
/// ```
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Deep equality that compares numbers by value, so `1 == 1.0`.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l == r,
            _ => l.as_f64() == r.as_f64(),
        },
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l
                    .iter()
                    .all(|(k, lv)| r.get(k).map(|rv| loose_eq(lv, rv)).unwrap_or(false))
        }
        _ => left == right,
    }
}

/// Render a value as an object key: strings verbatim, anything else as
/// its compact JSON text.
pub fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a float into a JSON number, or null if it is not finite.
pub fn to_number_value(num: f64) -> Value {
    Number::from_f64(num).map(Value::Number).unwrap_or(NULL)
}

fn mismatch(function: &str, position: usize, expected: Kinds, value: &Value) -> Error {
    Error::InvalidArgumentType {
        function: function.into(),
        position,
        expected,
        actual: Kind::of(value),
    }
}

fn arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a Value, Error> {
    args.get(position).ok_or_else(|| {
        Error::UnexpectedError(format!(
            "{}() was dispatched without argument {}",
            function, position
        ))
    })
}

// The accessors below re-check what the signature matcher already
// guaranteed, so a mis-declared signature surfaces as an error, not a panic.

pub fn str_arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a str, Error> {
    match arg(function, args, position)? {
        Value::String(s) => Ok(s),
        other => Err(mismatch(function, position, Kinds(&[Kind::String]), other)),
    }
}

pub fn number_arg<'a>(
    function: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a Number, Error> {
    match arg(function, args, position)? {
        Value::Number(n) => Ok(n),
        other => Err(mismatch(function, position, Kinds(&[Kind::Number]), other)),
    }
}

pub fn array_arg<'a>(
    function: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a Vec<Value>, Error> {
    match arg(function, args, position)? {
        Value::Array(items) => Ok(items),
        other => Err(mismatch(function, position, Kinds(&[Kind::Array]), other)),
    }
}

pub fn object_arg<'a>(
    function: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a serde_json::Map<String, Value>, Error> {
    match arg(function, args, position)? {
        Value::Object(map) => Ok(map),
        other => Err(mismatch(function, position, Kinds(&[Kind::Object]), other)),
    }
}

pub fn any_arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a Value, Error> {
    arg(function, args, position)
}

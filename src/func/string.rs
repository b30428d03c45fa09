//! String Functions

use serde_json::{Number, Value};

use crate::error::Error;
use crate::value::{number_arg, str_arg};

pub fn to_lower(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::String(str_arg("toLower", args, 0)?.to_lowercase()))
}

pub fn to_upper(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::String(str_arg("toUpper", args, 0)?.to_uppercase()))
}

fn replace_named(function: &str, args: &[Value]) -> Result<Value, Error> {
    let string = str_arg(function, args, 0)?;
    let old = str_arg(function, args, 1)?;
    let new = str_arg(function, args, 2)?;
    Ok(Value::String(string.replace(old, new)))
}

/// Replace every occurrence of a substring
pub fn replace(args: &[Value]) -> Result<Value, Error> {
    replace_named("replace", args)
}

/// Identical to `replace`, which already replaces every occurrence
pub fn replace_all(args: &[Value]) -> Result<Value, Error> {
    replace_named("replaceAll", args)
}

pub fn trim(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::String(str_arg("trim", args, 0)?.trim().to_string()))
}

enum Align {
    Center,
    Right,
    Left,
}

/// Interpret a width, truncating any fraction toward zero
fn width_of(num: &Number) -> Option<usize> {
    let width = num.as_i64().or_else(|| num.as_f64().map(|f| f.trunc() as i64))?;
    usize::try_from(width).ok()
}

fn pad_named(function: &str, args: &[Value], align: Align) -> Result<Value, Error> {
    let string = str_arg(function, args, 0)?;
    let width = number_arg(function, args, 1)?;
    let fill = str_arg(function, args, 2)?;

    let len = string.chars().count();
    let (width, fill) = match (width_of(width), fill.chars().next()) {
        (Some(width), Some(fill)) if width > len => (width, fill),
        _ => return Ok(Value::String(string.to_string())),
    };

    let margin = width - len;
    let left = match align {
        // Odd margins put the extra fill on the left only when the
        // width is odd as well.
        Align::Center => margin / 2 + (margin & width & 1),
        Align::Right => margin,
        Align::Left => 0,
    };
    let right = margin - left;

    let mut padded = String::with_capacity(string.len() + margin * fill.len_utf8());
    padded.extend(std::iter::repeat(fill).take(left));
    padded.push_str(string);
    padded.extend(std::iter::repeat(fill).take(right));
    Ok(Value::String(padded))
}

/// Center a string within a width
pub fn pad(args: &[Value]) -> Result<Value, Error> {
    pad_named("pad", args, Align::Center)
}

/// Right-justify a string within a width
pub fn pad_start(args: &[Value]) -> Result<Value, Error> {
    pad_named("padStart", args, Align::Right)
}

/// Left-justify a string within a width
pub fn pad_end(args: &[Value]) -> Result<Value, Error> {
    pad_named("padEnd", args, Align::Left)
}

/// Split a string on a separator
///
/// An empty separator leaves the string whole.
pub fn split(args: &[Value]) -> Result<Value, Error> {
    let string = str_arg("split", args, 0)?;
    let separator = str_arg("split", args, 1)?;
    tracing::trace!(separator, "splitting string");
    if separator.is_empty() {
        return Ok(Value::Array(vec![Value::String(string.to_string())]));
    }
    Ok(Value::Array(
        string
            .split(separator)
            .map(|part| Value::String(part.to_string()))
            .collect(),
    ))
}

#[cfg(test)]
mod test_string {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_case_and_trim() {
        assert_eq!(to_lower(&[json!("John Doe")]).unwrap(), json!("john doe"));
        assert_eq!(to_upper(&[json!("John Doe")]).unwrap(), json!("JOHN DOE"));
        assert_eq!(
            trim(&[json!("   This is a sample description.   ")]).unwrap(),
            json!("This is a sample description.")
        );
    }

    #[test]
    fn test_replace_all_occurrences() {
        let args = [json!("a-b-c"), json!("-"), json!("+")];
        assert_eq!(replace(&args).unwrap(), json!("a+b+c"));
        assert_eq!(replace_all(&args).unwrap(), json!("a+b+c"));
    }

    #[rstest]
    #[case("John Doe", 20, "******John Doe******", "************John Doe", "John Doe************")]
    #[case("abc", 6, "*abc**", "***abc", "abc***")]
    #[case("ab", 5, "**ab*", "***ab", "ab***")]
    #[case("abc", 2, "abc", "abc", "abc")]
    #[case("abc", -4, "abc", "abc", "abc")]
    fn test_pad(
        #[case] s: &str,
        #[case] width: i64,
        #[case] centered: &str,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let args = [json!(s), json!(width), json!("*")];
        assert_eq!(pad(&args).unwrap(), json!(centered));
        assert_eq!(pad_start(&args).unwrap(), json!(start));
        assert_eq!(pad_end(&args).unwrap(), json!(end));
    }

    #[test]
    fn test_pad_fractional_width_and_empty_fill() {
        assert_eq!(
            pad_start(&[json!("7"), json!(3.9), json!("0")]).unwrap(),
            json!("007")
        );
        assert_eq!(
            pad_start(&[json!("7"), json!(3), json!("")]).unwrap(),
            json!("7")
        );
        assert_eq!(
            pad_end(&[json!("é"), json!(3), json!("ü")]).unwrap(),
            json!("éüü")
        );
    }

    #[rstest]
    #[case("Project A", "Project ", json!(["", "A"]))]
    #[case("a,b,,c", ",", json!(["a", "b", "", "c"]))]
    #[case("abc", "", json!(["abc"]))]
    #[case("abc", "x", json!(["abc"]))]
    fn test_split(#[case] s: &str, #[case] sep: &str, #[case] expected: Value) {
        assert_eq!(split(&[json!(s), json!(sep)]).unwrap(), expected);
    }
}

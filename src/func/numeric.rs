//! Numeric Functions

use serde_json::{Number, Value};

use crate::error::Error;
use crate::value::{number_arg, str_arg, to_number_value, NULL};

fn as_f64(num: &Number) -> Result<f64, Error> {
    num.as_f64()
        .ok_or_else(|| Error::UnexpectedError(format!("{} is not representable as a float", num)))
}

/// Apply an integer op when both operands are integers and it does not
/// overflow, else fall back to the float op.
fn arithmetic(
    function: &str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    let a = number_arg(function, args, 0)?;
    let b = number_arg(function, args, 1)?;
    if let Some(result) = a.as_i64().zip(b.as_i64()).and_then(|(a, b)| int_op(a, b)) {
        return Ok(Value::from(result));
    }
    Ok(to_number_value(float_op(as_f64(a)?, as_f64(b)?)))
}

/// `a - b`
pub fn num_diff(args: &[Value]) -> Result<Value, Error> {
    arithmetic("numDiff", args, i64::checked_sub, |a, b| a - b)
}

/// `a * b`
pub fn product(args: &[Value]) -> Result<Value, Error> {
    arithmetic("product", args, i64::checked_mul, |a, b| a * b)
}

/// Percentage change from `old` to `new`, or null when `old` is zero
pub fn percent_change(args: &[Value]) -> Result<Value, Error> {
    let old = as_f64(number_arg("percentChange", args, 0)?)?;
    let new = as_f64(number_arg("percentChange", args, 1)?)?;
    if old == 0.0 {
        return Ok(NULL);
    }
    Ok(to_number_value((new - old) / old * 100.0))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    digits.chars().enumerate().for_each(|(i, c)| {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    });
    grouped
}

/// Format an amount with thousands separators and two decimals, followed
/// by the currency code: `1,234.56 USD`.
///
/// The locale is accepted for compatibility and not used.
pub fn currency(args: &[Value]) -> Result<Value, Error> {
    let amount = as_f64(number_arg("currency", args, 0)?)?;
    let _locale = str_arg("currency", args, 1)?;
    let code = str_arg("currency", args, 2)?;
    if !amount.is_finite() {
        tracing::debug!(amount, "could not format currency");
        return Ok(NULL);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    Ok(Value::String(format!(
        "{}{}.{} {}",
        sign,
        group_thousands(whole),
        fraction,
        code
    )))
}

//! Impure Functions

use chrono::Utc;
use serde_json::Value;

use super::datetime::utc_isoformat;
use crate::error::Error;
use crate::value::any_arg;

/// The current UTC instant as ISO-8601
pub fn now(_args: &[Value]) -> Result<Value, Error> {
    Ok(Value::String(utc_isoformat(Utc::now())))
}

/// Log a value and pass it through unchanged
///
/// Emitted at INFO under the `jmespath_mapping::debug` target, so hosts
/// can route mapping diagnostics separately from the crate's own logs.
pub fn debug(args: &[Value]) -> Result<Value, Error> {
    let value = any_arg("debug", args, 0)?;
    tracing::info!(target: "jmespath_mapping::debug", %value, "debug value in mapping");
    Ok(value.clone())
}

//! Path Access Functions

use serde_json::Value;

use crate::error::Error;
use crate::path;
use crate::value::{any_arg, array_arg, loose_eq, object_arg, str_arg, NULL};

/// Get the value at a path, or the default (null if not given) when the
/// path does not exist.
///
/// A path that exists but holds null yields null, not the default.
pub fn get(args: &[Value]) -> Result<Value, Error> {
    let target = any_arg("get", args, 0)?;
    let path = str_arg("get", args, 1)?;
    Ok(match path::get(target, path) {
        Some(found) => found.clone(),
        None => args.get(2).cloned().unwrap_or(NULL),
    })
}

/// Return a copy of the target with a value written at a path
pub fn set(args: &[Value]) -> Result<Value, Error> {
    let target = any_arg("set", args, 0)?;
    let path = str_arg("set", args, 1)?;
    let value = any_arg("set", args, 2)?;
    Ok(path::set(target, path, value.clone()))
}

/// Find the index of the first object containing every field of a
/// pattern object.
///
/// A field missing from an item compares equal to null, so
/// `{"a": null}` matches items without an `a` key.
pub fn find_index(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("findIndex", args, 0)?;
    let pattern = object_arg("findIndex", args, 1)?;

    let position = items.iter().position(|item| match item {
        Value::Object(fields) => pattern
            .iter()
            .all(|(k, v)| loose_eq(fields.get(k).unwrap_or(&NULL), v)),
        _ => false,
    });

    Ok(match position {
        Some(idx) => Value::from(idx),
        None => Value::from(-1),
    })
}

//! Collection Functions
//!
//! Object results keep the key order of their input. Equality between
//! values is deep, with numbers compared by value.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::path;
use crate::value::{any_arg, array_arg, key_string, loose_eq, object_arg, str_arg, truthy, NULL};

fn contains(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|v| loose_eq(v, needle))
}

fn key_listed(keys: &[Value], key: &str) -> bool {
    keys.iter().any(|k| matches!(k, Value::String(s) if s == key))
}

/// Drop the listed keys from an object
pub fn omit(args: &[Value]) -> Result<Value, Error> {
    let obj = object_arg("omit", args, 0)?;
    let keys = array_arg("omit", args, 1)?;
    Ok(Value::Object(
        obj.iter()
            .filter(|(k, _)| !key_listed(keys, k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    ))
}

/// Keep only the listed keys of an object
pub fn pick(args: &[Value]) -> Result<Value, Error> {
    let obj = object_arg("pick", args, 0)?;
    let keys = array_arg("pick", args, 1)?;
    Ok(Value::Object(
        obj.iter()
            .filter(|(k, _)| key_listed(keys, k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    ))
}

/// Find the first object whose field equals a value, or null
///
/// A missing field compares equal to null.
pub fn find(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("find", args, 0)?;
    let key = str_arg("find", args, 1)?;
    let value = any_arg("find", args, 2)?;
    Ok(items
        .iter()
        .find(|item| match item {
            Value::Object(fields) => loose_eq(fields.get(key).unwrap_or(&NULL), value),
            _ => false,
        })
        .cloned()
        .unwrap_or(NULL))
}

/// Drop the entries of an object whose values are falsy
pub fn compact(args: &[Value]) -> Result<Value, Error> {
    let obj = object_arg("compact", args, 0)?;
    Ok(Value::Object(
        obj.iter()
            .filter(|(_, v)| truthy(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    ))
}

/// Transpose an array of objects into an object of arrays
///
/// Each key seen on any item maps to the values it had, in item order.
/// Items that are not objects are skipped.
pub fn group_by_keys(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("groupByKeys", args, 0)?;
    let mut grouped: Map<String, Value> = Map::new();
    items
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|obj| obj.iter())
        .for_each(|(k, v)| {
            match grouped.get_mut(k) {
                Some(Value::Array(values)) => values.push(v.clone()),
                _ => {
                    grouped.insert(k.clone(), Value::Array(vec![v.clone()]));
                }
            };
        });
    Ok(Value::Object(grouped))
}

/// `{"a": 1}` becomes `[["a", 1]]`
pub fn to_pairs(args: &[Value]) -> Result<Value, Error> {
    let obj = object_arg("toPairs", args, 0)?;
    Ok(Value::Array(
        obj.iter()
            .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), v.clone()]))
            .collect(),
    ))
}

/// Build an object from `[key, value]` pairs
///
/// Entries that are not two-element arrays with a string key are skipped.
pub fn from_pairs(args: &[Value]) -> Result<Value, Error> {
    let pairs = array_arg("fromPairs", args, 0)?;
    Ok(Value::Object(
        pairs
            .iter()
            .filter_map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([Value::String(k), v]) => Some((k.clone(), v.clone())),
                _ => None,
            })
            .collect(),
    ))
}

/// Pair every element with its successor
///
/// The last element's `next` is null, so the output is as long as the
/// input.
pub fn pairwise(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("pairwise", args, 0)?;
    Ok(Value::Array(
        items
            .iter()
            .enumerate()
            .map(|(i, current)| {
                let mut pair = Map::with_capacity(2);
                pair.insert("current".into(), current.clone());
                pair.insert("next".into(), items.get(i + 1).cloned().unwrap_or(NULL));
                Value::Object(pair)
            })
            .collect(),
    ))
}

/// Remove duplicates, keeping first occurrences
pub fn uniq(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("uniq", args, 0)?;
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    items.iter().for_each(|item| {
        if !contains(&unique, item) {
            unique.push(item.clone());
        }
    });
    Ok(Value::Array(unique))
}

/// Remove items whose value at a path was already seen
///
/// Items without the path all share the null value.
pub fn uniq_by(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("uniqBy", args, 0)?;
    let key = str_arg("uniqBy", args, 1)?;
    let mut seen: Vec<Value> = Vec::new();
    let mut unique: Vec<Value> = Vec::new();
    items.iter().for_each(|item| {
        let marker = path::get(item, key).cloned().unwrap_or(NULL);
        if !contains(&seen, &marker) {
            seen.push(marker);
            unique.push(item.clone());
        }
    });
    Ok(Value::Array(unique))
}

/// Check membership
///
/// Arrays are searched by element, objects by value, and strings by
/// substring (a non-string needle is never found in a string).
pub fn includes(args: &[Value]) -> Result<Value, Error> {
    let collection = any_arg("includes", args, 0)?;
    let needle = any_arg("includes", args, 1)?;
    let found = match (collection, needle) {
        (Value::Array(items), _) => contains(items, needle),
        (Value::Object(obj), _) => obj.values().any(|v| loose_eq(v, needle)),
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        _ => false,
    };
    Ok(Value::Bool(found))
}

/// Whether every element is truthy. An empty array is.
pub fn all(args: &[Value]) -> Result<Value, Error> {
    let items = array_arg("all", args, 0)?;
    Ok(Value::Bool(items.iter().all(truthy)))
}

/// Build an object from an array of keys and an array of values
///
/// The result is as long as the shorter array. Non-string keys are
/// rendered as JSON text.
pub fn zip(args: &[Value]) -> Result<Value, Error> {
    let keys = array_arg("zip", args, 0)?;
    let values = array_arg("zip", args, 1)?;
    Ok(Value::Object(
        keys.iter()
            .zip(values)
            .map(|(k, v)| (key_string(k), v.clone()))
            .collect(),
    ))
}

#[cfg(test)]
mod test_collection {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn person() -> Value {
        json!({"name": "John Doe", "age": 35, "email": "x"})
    }

    #[test]
    fn test_omit_and_pick_are_complementary() {
        let keys = json!(["email"]);
        let omitted = omit(&[person(), keys.clone()]).unwrap();
        let picked = pick(&[person(), keys]).unwrap();
        assert_eq!(omitted, json!({"name": "John Doe", "age": 35}));
        assert_eq!(picked, json!({"email": "x"}));

        let mut rebuilt = omitted.as_object().unwrap().clone();
        rebuilt.extend(picked.as_object().unwrap().clone());
        assert_eq!(Value::Object(rebuilt), person());
    }

    #[test]
    fn test_omit_keeps_order() {
        let omitted = omit(&[person(), json!(["age"])]).unwrap();
        let keys: Vec<&String> = omitted.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "email"]);
    }

    #[test]
    fn test_find() {
        let projects = json!([{"id": 1, "title": "Project A"}, {"id": 2, "title": "Project B"}]);
        assert_eq!(
            find(&[projects.clone(), json!("title"), json!("Project B")]).unwrap(),
            json!({"id": 2, "title": "Project B"})
        );
        assert_eq!(
            find(&[projects.clone(), json!("title"), json!("Project C")]).unwrap(),
            json!(null)
        );
        assert_eq!(
            find(&[projects, json!("owner"), json!(null)]).unwrap(),
            json!({"id": 1, "title": "Project A"})
        );
    }

    #[test]
    fn test_compact() {
        let obj = json!({
            "a": 1, "b": 0, "c": "", "d": null, "e": [], "f": {}, "g": false, "h": "x", "i": [0]
        });
        assert_eq!(
            compact(&[obj]).unwrap(),
            json!({"a": 1, "h": "x", "i": [0]})
        );
    }

    #[test]
    fn test_group_by_keys() {
        let projects = json!([
            {"category": "A", "value": 10},
            {"category": "B", "value": 20},
            "skipped",
            {"category": "A", "value": 30}
        ]);
        assert_eq!(
            group_by_keys(&[projects]).unwrap(),
            json!({"category": ["A", "B", "A"], "value": [10, 20, 30]})
        );
    }

    #[test]
    fn test_pairs() {
        assert_eq!(
            to_pairs(&[json!({"name": "Jane Doe", "age": 28})]).unwrap(),
            json!([["name", "Jane Doe"], ["age", 28]])
        );
        assert_eq!(
            from_pairs(&[json!([["name", "Jane Doe"], ["age", 28], [1, 2], ["x"], "ab"])]).unwrap(),
            json!({"name": "Jane Doe", "age": 28})
        );
    }

    #[rstest]
    #[case(json!([]), json!([]))]
    #[case(json!(["a"]), json!([{"current": "a", "next": null}]))]
    #[case(
        json!(["a", "b", "c"]),
        json!([
            {"current": "a", "next": "b"},
            {"current": "b", "next": "c"},
            {"current": "c", "next": null}
        ])
    )]
    fn test_pairwise(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(pairwise(&[input]).unwrap(), expected);
    }

    #[test]
    fn test_uniq() {
        assert_eq!(
            uniq(&[json!(["frontend", "backend", "frontend", "ui", "backend"])]).unwrap(),
            json!(["frontend", "backend", "ui"])
        );
        assert_eq!(uniq(&[json!([1, 1.0, {"a": 1}, {"a": 1}])]).unwrap(), json!([1, {"a": 1}]));
    }

    #[test]
    fn test_uniq_by() {
        let users = json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"},
            {"id": 1, "name": "Alice"},
            {"name": "Nobody"},
            {"name": "Nobody else"}
        ]);
        assert_eq!(
            uniq_by(&[users, json!("id")]).unwrap(),
            json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}, {"name": "Nobody"}])
        );
    }

    #[rstest]
    #[case(json!([1, 2, 3, 4, 5]), json!(3), true)]
    #[case(json!([1, 2, 3]), json!(3.0), true)]
    #[case(json!([1, 2, 3]), json!("3"), false)]
    #[case(json!({"a": 1, "b": 2}), json!(2), true)]
    #[case(json!({"a": 1, "b": 2}), json!("a"), false)]
    #[case(json!("frontend"), json!("end"), true)]
    #[case(json!("frontend"), json!(1), false)]
    fn test_includes(#[case] collection: Value, #[case] needle: Value, #[case] expected: bool) {
        assert_eq!(includes(&[collection, needle]).unwrap(), json!(expected));
    }

    #[rstest]
    #[case(json!([true, true, true]), true)]
    #[case(json!([true, false, true]), false)]
    #[case(json!([1, "a", [0]]), true)]
    #[case(json!([1, 0]), false)]
    #[case(json!([]), true)]
    fn test_all(#[case] input: Value, #[case] expected: bool) {
        assert_eq!(all(&[input]).unwrap(), json!(expected));
    }

    #[test]
    fn test_zip() {
        assert_eq!(
            zip(&[json!(["a", "b", "c"]), json!([1, 2, 3])]).unwrap(),
            json!({"a": 1, "b": 2, "c": 3})
        );
        assert_eq!(
            zip(&[json!(["a", "b", "c"]), json!([1])]).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            zip(&[json!([1, true, "a", "a"]), json!(["x", "y", "z", "w"])]).unwrap(),
            json!({"1": "x", "true": "y", "a": "w"})
        );
    }
}

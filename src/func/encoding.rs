//! Encoding Functions

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pulldown_cmark::{html, Parser};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::Error;
use crate::value::{any_arg, object_arg, str_arg};

fn encode_named(function: &str, args: &[Value]) -> Result<Value, Error> {
    let string = str_arg(function, args, 0)?;
    Ok(Value::String(STANDARD.encode(string.as_bytes())))
}

/// Base64-encode the UTF-8 bytes of a string
pub fn btoa(args: &[Value]) -> Result<Value, Error> {
    encode_named("btoa", args)
}

/// Same as `btoa`
pub fn base64_encode(args: &[Value]) -> Result<Value, Error> {
    encode_named("base64encode", args)
}

/// Serialize any value to compact JSON text
pub fn json(args: &[Value]) -> Result<Value, Error> {
    let value = any_arg("json", args, 0)?;
    Ok(Value::String(serde_json::to_string(value)?))
}

/// Render CommonMark as HTML
pub fn markdown(args: &[Value]) -> Result<Value, Error> {
    let source = str_arg("markdown", args, 0)?;
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new(source));
    let trimmed_len = rendered.trim_end_matches('\n').len();
    rendered.truncate(trimmed_len);
    Ok(Value::String(rendered))
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Encode an object as a query string
///
/// Array values repeat their key once per element.
pub fn qs(args: &[Value]) -> Result<Value, Error> {
    let obj = object_arg("qs", args, 0)?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    obj.iter().for_each(|(k, v)| match v {
        Value::Array(items) => items.iter().for_each(|item| {
            query.append_pair(k, &query_value(item));
        }),
        other => {
            query.append_pair(k, &query_value(other));
        }
    });
    Ok(Value::String(query.finish()))
}

/// Parse a query string into an object
///
/// Pairs with blank values are dropped. A key seen once maps to its
/// string, a repeated key to the array of its values in order.
pub fn parse_qs(args: &[Value]) -> Result<Value, Error> {
    let query = str_arg("parseQs", args, 0)?;
    let mut parsed: Map<String, Value> = Map::new();
    form_urlencoded::parse(query.as_bytes())
        .filter(|(_, v)| !v.is_empty())
        .for_each(|(k, v)| {
            let value = Value::String(v.into_owned());
            match parsed.get_mut(&*k) {
                Some(Value::Array(values)) => values.push(value),
                _ => {
                    parsed.insert(k.into_owned(), Value::Array(vec![value]));
                }
            }
        });
    Ok(Value::Object(
        parsed
            .into_iter()
            .map(|(k, v)| match v {
                Value::Array(mut values) if values.len() == 1 => (k, values.remove(0)),
                other => (k, other),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod test_encoding {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("John Doe", "Sm9obiBEb2U=")]
    #[case("", "")]
    #[case("héllo ✓", "aMOpbGxvIOKckw==")]
    fn test_base64(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(btoa(&[json!(input)]).unwrap(), json!(expected));
        assert_eq!(base64_encode(&[json!(input)]).unwrap(), json!(expected));
    }

    #[test]
    fn test_json() {
        assert_eq!(
            json(&[json!({"name": "Zoë", "tags": [1, true, null]})]).unwrap(),
            json!(r#"{"name":"Zoë","tags":[1,true,null]}"#)
        );
        assert_eq!(json(&[json!("a")]).unwrap(), json!(r#""a""#));
    }

    #[test]
    fn test_markdown() {
        assert_eq!(
            markdown(&[json!("## Hello World\n\nThis is a **bold** statement.")]).unwrap(),
            json!("<h2>Hello World</h2>\n<p>This is a <strong>bold</strong> statement.</p>")
        );
        assert_eq!(markdown(&[json!("")]).unwrap(), json!(""));
    }

    #[test]
    fn test_qs() {
        assert_eq!(
            qs(&[json!({"name": "John Doe", "age": 35, "tags": ["frontend", "ui"]})]).unwrap(),
            json!("name=John+Doe&age=35&tags=frontend&tags=ui")
        );
        assert_eq!(
            qs(&[json!({"q": "a&b=c", "empty": null, "flag": false})]).unwrap(),
            json!("q=a%26b%3Dc&empty=&flag=false")
        );
        assert_eq!(
            qs(&[json!({"a": "x*y~z"})]).unwrap(),
            json!("a=x*y%7Ez")
        );
    }

    #[test]
    fn test_parse_qs() {
        assert_eq!(
            parse_qs(&[json!("name=John+Doe&age=35&tags=frontend&tags=ui")]).unwrap(),
            json!({"name": "John Doe", "age": "35", "tags": ["frontend", "ui"]})
        );
        assert_eq!(
            parse_qs(&[json!("a=&b&c=%20x")]).unwrap(),
            json!({"c": " x"})
        );
        assert_eq!(parse_qs(&[json!("")]).unwrap(), json!({}));
    }
}

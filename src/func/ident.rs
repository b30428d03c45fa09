//! Identifier Functions

use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::signature::Arity;
use crate::value::{Kind, Kinds};

/// Seed for the namespace of name-based uuids when none is given
pub const DEFAULT_NAMESPACE: &str = "https://app.kendra.io";

/// A v5 uuid for `name`, under the namespace derived from `seed` (itself
/// a v5 uuid in the URL namespace).
fn namespaced(name: &str, seed: &str) -> Uuid {
    let namespace = Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes());
    Uuid::new_v5(&namespace, name.as_bytes())
}

/// Generate a uuid
///
/// - `uuid()`: random (v4)
/// - `uuid(name)`: v5 of `name` under the default namespace; null is
///   treated as the empty name
/// - `uuid(name, namespace)`: v5 under a namespace derived from the given
///   seed, or the default if it is null. `name` may not be null here.
pub fn uuid(args: &[Value]) -> Result<Value, Error> {
    let id = match args {
        [] => Uuid::new_v4(),
        [name] => {
            let name = match name {
                Value::String(s) => s.as_str(),
                _ => "",
            };
            namespaced(name, DEFAULT_NAMESPACE)
        }
        [name, seed] => {
            let name = match name {
                Value::String(s) => s.as_str(),
                other => {
                    return Err(Error::InvalidArgument {
                        function: "uuid".into(),
                        position: 0,
                        expected: Kinds(&[Kind::String]),
                        value: other.clone(),
                    })
                }
            };
            let seed = match seed {
                Value::String(s) => s.as_str(),
                _ => DEFAULT_NAMESPACE,
            };
            namespaced(name, seed)
        }
        _ => {
            return Err(Error::WrongArgumentCount {
                function: "uuid".into(),
                expected: Arity {
                    min: 0,
                    max: Some(2),
                },
                actual: args.len(),
            })
        }
    };
    Ok(Value::String(id.to_string()))
}

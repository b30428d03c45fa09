//! Data-mapping functions for JMESPath
//!
//! A catalog of custom functions (string manipulation, dates, collection
//! reshaping, encodings, identifiers) registered on top of the `jmespath`
//! crate, so mapping expressions can reshape JSON documents in one pass.
//!
//! ```rust
//! use serde_json::json;
//!
//! let data = json!({"name": "John Doe", "tags": ["ui", "frontend", "ui"]});
//! let result = jmespath_mapping::search(
//!     "{upper: toUpper(name), tags: uniq(tags), id: uuid(name)}",
//!     &data,
//! )
//! .unwrap();
//!
//! assert_eq!(result["upper"], json!("JOHN DOE"));
//! assert_eq!(result["tags"], json!(["ui", "frontend"]));
//! ```
//!
//! Functions can also be called directly, without an expression:
//!
//! ```rust
//! use serde_json::json;
//! use jmespath_mapping::Registry;
//!
//! let registry = Registry::new();
//! let zipped = registry.call("zip", &[json!(["a", "b"]), json!([1, 2])]).unwrap();
//! assert_eq!(zipped, json!({"a": 1, "b": 2}));
//! ```

pub mod error;
pub mod func;
pub mod path;
pub mod runtime;
pub mod signature;
pub mod value;

pub use error::Error;
pub use func::{Function, Registry};
pub use runtime::{search, search_str, Evaluator, Options};
pub use value::{truthy, Kind};

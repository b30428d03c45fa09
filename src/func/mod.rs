//! Functions
//!
//! This module contains the global function map, which defines the
//! mapping functions available to expressions. Each entry declares its
//! signatures (overloads are tried in declaration order) and a plain
//! function that runs once the arguments have been matched.

use phf::phf_map;
use serde_json::Value;
use std::fmt;

use crate::error::Error;
use crate::signature::{self, Param, Signature, ANY};
use crate::value::Kind;

mod access;
mod collection;
mod datetime;
mod encoding;
mod ident;
mod impure;
mod numeric;
mod string;

pub use ident::DEFAULT_NAMESPACE;

const STRING: &[Kind] = &[Kind::String];
const NUMBER: &[Kind] = &[Kind::Number];
const ARRAY: &[Kind] = &[Kind::Array];
const OBJECT: &[Kind] = &[Kind::Object];
const OBJECT_OR_ARRAY: &[Kind] = &[Kind::Object, Kind::Array];
const STRING_OR_NULL: &[Kind] = &[Kind::String, Kind::Null];
const NUMBER_OR_NULL: &[Kind] = &[Kind::Number, Kind::Null];
const NUMBER_STRING_OR_NULL: &[Kind] = &[Kind::Number, Kind::String, Kind::Null];
const COLLECTION: &[Kind] = &[Kind::Array, Kind::Object, Kind::String];

const NO_ARGS: &[Signature] = &[Signature::new(&[])];
const ONE_STRING: &[Signature] = &[Signature::new(&[Param::required(STRING)])];
const THREE_STRINGS: &[Signature] = &[Signature::new(&[
    Param::required(STRING),
    Param::required(STRING),
    Param::required(STRING),
])];
const ONE_ARRAY: &[Signature] = &[Signature::new(&[Param::required(ARRAY)])];
const ONE_OBJECT: &[Signature] = &[Signature::new(&[Param::required(OBJECT)])];
const ONE_ANY: &[Signature] = &[Signature::new(&[Param::required(ANY)])];
const TWO_NUMBERS: &[Signature] = &[Signature::new(&[
    Param::required(NUMBER),
    Param::required(NUMBER),
])];
const OBJECT_AND_KEYS: &[Signature] = &[Signature::new(&[
    Param::required(OBJECT),
    Param::required(ARRAY),
])];
const PAD: &[Signature] = &[Signature::new(&[
    Param::required(STRING),
    Param::required(NUMBER),
    Param::required(STRING),
])];
const DATE_INPUT: &[Signature] = &[Signature::new(&[Param::required(NUMBER_STRING_OR_NULL)])];

pub static FUNCTION_MAP: phf::Map<&'static str, Function> = phf_map! {
    "get" => Function {
        name: "get",
        signatures: &[
            Signature::new(&[Param::required(OBJECT_OR_ARRAY), Param::required(STRING)]),
            Signature::new(&[
                Param::required(OBJECT_OR_ARRAY),
                Param::required(STRING),
                Param::required(ANY),
            ]),
        ],
        implementation: access::get,
        pure: true,
    },
    "set" => Function {
        name: "set",
        signatures: &[Signature::new(&[
            Param::required(OBJECT_OR_ARRAY),
            Param::required(STRING),
            Param::required(ANY),
        ])],
        implementation: access::set,
        pure: true,
    },
    "findIndex" => Function {
        name: "findIndex",
        signatures: &[Signature::new(&[Param::required(ARRAY), Param::required(OBJECT)])],
        implementation: access::find_index,
        pure: true,
    },
    // Zero arguments yields a random v4 uuid, so this is not pure.
    "uuid" => Function {
        name: "uuid",
        signatures: &[Signature::new(&[
            Param::optional(STRING_OR_NULL),
            Param::optional(STRING_OR_NULL),
        ])],
        implementation: ident::uuid,
        pure: false,
    },
    "toLower" => Function {
        name: "toLower",
        signatures: ONE_STRING,
        implementation: string::to_lower,
        pure: true,
    },
    "toUpper" => Function {
        name: "toUpper",
        signatures: ONE_STRING,
        implementation: string::to_upper,
        pure: true,
    },
    "replace" => Function {
        name: "replace",
        signatures: THREE_STRINGS,
        implementation: string::replace,
        pure: true,
    },
    "replaceAll" => Function {
        name: "replaceAll",
        signatures: THREE_STRINGS,
        implementation: string::replace_all,
        pure: true,
    },
    "trim" => Function {
        name: "trim",
        signatures: ONE_STRING,
        implementation: string::trim,
        pure: true,
    },
    "pad" => Function {
        name: "pad",
        signatures: PAD,
        implementation: string::pad,
        pure: true,
    },
    "padStart" => Function {
        name: "padStart",
        signatures: PAD,
        implementation: string::pad_start,
        pure: true,
    },
    "padEnd" => Function {
        name: "padEnd",
        signatures: PAD,
        implementation: string::pad_end,
        pure: true,
    },
    "split" => Function {
        name: "split",
        signatures: &[Signature::new(&[Param::required(STRING), Param::required(STRING)])],
        implementation: string::split,
        pure: true,
    },
    "now" => Function {
        name: "now",
        signatures: NO_ARGS,
        implementation: impure::now,
        pure: false,
    },
    "formatDate" => Function {
        name: "formatDate",
        signatures: &[Signature::new(&[Param::required(STRING), Param::required(STRING)])],
        implementation: datetime::format_date,
        pure: true,
    },
    "parseDate" => Function {
        name: "parseDate",
        signatures: DATE_INPUT,
        implementation: datetime::parse_date,
        pure: true,
    },
    "parseDuration" => Function {
        name: "parseDuration",
        signatures: DATE_INPUT,
        implementation: datetime::parse_duration,
        pure: true,
    },
    "parseUnixTimestamp" => Function {
        name: "parseUnixTimestamp",
        signatures: &[Signature::new(&[
            Param::required(NUMBER_OR_NULL),
            Param::optional(STRING_OR_NULL),
        ])],
        implementation: datetime::parse_unix_timestamp,
        pure: true,
    },
    "omit" => Function {
        name: "omit",
        signatures: OBJECT_AND_KEYS,
        implementation: collection::omit,
        pure: true,
    },
    "pick" => Function {
        name: "pick",
        signatures: OBJECT_AND_KEYS,
        implementation: collection::pick,
        pure: true,
    },
    "find" => Function {
        name: "find",
        signatures: &[Signature::new(&[
            Param::required(ARRAY),
            Param::required(STRING),
            Param::required(ANY),
        ])],
        implementation: collection::find,
        pure: true,
    },
    "compact" => Function {
        name: "compact",
        signatures: ONE_OBJECT,
        implementation: collection::compact,
        pure: true,
    },
    "groupByKeys" => Function {
        name: "groupByKeys",
        signatures: ONE_ARRAY,
        implementation: collection::group_by_keys,
        pure: true,
    },
    "toPairs" => Function {
        name: "toPairs",
        signatures: ONE_OBJECT,
        implementation: collection::to_pairs,
        pure: true,
    },
    "fromPairs" => Function {
        name: "fromPairs",
        signatures: ONE_ARRAY,
        implementation: collection::from_pairs,
        pure: true,
    },
    "pairwise" => Function {
        name: "pairwise",
        signatures: ONE_ARRAY,
        implementation: collection::pairwise,
        pure: true,
    },
    "uniq" => Function {
        name: "uniq",
        signatures: ONE_ARRAY,
        implementation: collection::uniq,
        pure: true,
    },
    "uniqBy" => Function {
        name: "uniqBy",
        signatures: &[Signature::new(&[Param::required(ARRAY), Param::required(STRING)])],
        implementation: collection::uniq_by,
        pure: true,
    },
    "includes" => Function {
        name: "includes",
        signatures: &[Signature::new(&[Param::required(COLLECTION), Param::required(ANY)])],
        implementation: collection::includes,
        pure: true,
    },
    "all" => Function {
        name: "all",
        signatures: ONE_ARRAY,
        implementation: collection::all,
        pure: true,
    },
    "zip" => Function {
        name: "zip",
        signatures: &[Signature::new(&[Param::required(ARRAY), Param::required(ARRAY)])],
        implementation: collection::zip,
        pure: true,
    },
    "numDiff" => Function {
        name: "numDiff",
        signatures: TWO_NUMBERS,
        implementation: numeric::num_diff,
        pure: true,
    },
    "percentChange" => Function {
        name: "percentChange",
        signatures: TWO_NUMBERS,
        implementation: numeric::percent_change,
        pure: true,
    },
    "product" => Function {
        name: "product",
        signatures: TWO_NUMBERS,
        implementation: numeric::product,
        pure: true,
    },
    "currency" => Function {
        name: "currency",
        signatures: &[Signature::new(&[
            Param::required(NUMBER),
            Param::required(STRING),
            Param::required(STRING),
        ])],
        implementation: numeric::currency,
        pure: true,
    },
    "btoa" => Function {
        name: "btoa",
        signatures: ONE_STRING,
        implementation: encoding::btoa,
        pure: true,
    },
    "base64encode" => Function {
        name: "base64encode",
        signatures: ONE_STRING,
        implementation: encoding::base64_encode,
        pure: true,
    },
    "json" => Function {
        name: "json",
        signatures: ONE_ANY,
        implementation: encoding::json,
        pure: true,
    },
    "markdown" => Function {
        name: "markdown",
        signatures: ONE_STRING,
        implementation: encoding::markdown,
        pure: true,
    },
    "qs" => Function {
        name: "qs",
        signatures: ONE_OBJECT,
        implementation: encoding::qs,
        pure: true,
    },
    "parseQs" => Function {
        name: "parseQs",
        signatures: ONE_STRING,
        implementation: encoding::parse_qs,
        pure: true,
    },
    "debug" => Function {
        name: "debug",
        signatures: ONE_ANY,
        implementation: impure::debug,
        pure: false,
    },
};

type FunctionImpl = fn(&[Value]) -> Result<Value, Error>;

/// A named, signature-checked function
pub struct Function {
    name: &'static str,
    signatures: &'static [Signature],
    implementation: FunctionImpl,
    pure: bool,
}
impl Function {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signatures(&self) -> &'static [Signature] {
        self.signatures
    }

    /// Whether the function always returns the same result for the same
    /// arguments. `now`, `debug` and zero-argument `uuid` do not.
    pub fn is_pure(&self) -> bool {
        self.pure
    }

    /// Match the arguments against the declared signatures and run the
    /// function.
    pub fn call(&self, args: &[Value]) -> Result<Value, Error> {
        signature::select(self.name, self.signatures, args)?;
        tracing::trace!(function = self.name, args = args.len(), "calling mapping function");
        (self.implementation)(args)
    }
}
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signatures", &self.signatures)
            .field("implementation", &"<function fn>")
            .finish()
    }
}

/// A read-only handle onto the function map
///
/// The map is static data, so a registry is free to copy and share
/// between threads.
#[derive(Clone, Copy)]
pub struct Registry {
    functions: &'static phf::Map<&'static str, Function>,
}
impl Registry {
    pub fn new() -> Self {
        Registry {
            functions: &FUNCTION_MAP,
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static Function> {
        let functions: &'static phf::Map<&'static str, Function> = self.functions;
        functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &'static Function> {
        let functions: &'static phf::Map<&'static str, Function> = self.functions;
        functions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.functions().map(Function::name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Call a function by name with already-evaluated arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        self.get(name)
            .ok_or_else(|| Error::UnknownFunction(name.into()))?
            .call(args)
    }
}
impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

//! Signatures and overload resolution
//!
//! Every catalog function declares one or more signatures. A call is
//! matched against them in declaration order, and the first signature
//! whose arity and positional kinds fit the actual arguments wins.

use serde_json::Value;
use std::fmt;

use crate::error::Error;
use crate::value::{Kind, Kinds};

pub const ANY: &[Kind] = &[
    Kind::String,
    Kind::Number,
    Kind::Boolean,
    Kind::Object,
    Kind::Array,
    Kind::Null,
];

/// A parameter descriptor
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub kinds: Kinds,
    pub optional: bool,
    pub variadic: bool,
}
impl Param {
    pub const fn required(kinds: &'static [Kind]) -> Self {
        Param {
            kinds: Kinds(kinds),
            optional: false,
            variadic: false,
        }
    }

    pub const fn optional(kinds: &'static [Kind]) -> Self {
        Param {
            kinds: Kinds(kinds),
            optional: true,
            variadic: false,
        }
    }

    /// Zero or more trailing arguments. Must be the last parameter.
    pub const fn variadic(kinds: &'static [Kind]) -> Self {
        Param {
            kinds: Kinds(kinds),
            optional: false,
            variadic: true,
        }
    }
}

/// The number of arguments a signature (or a set of overloads) accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}
impl Arity {
    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && self.max.map(|max| len <= max).unwrap_or(true)
    }

    fn union(self, other: Arity) -> Arity {
        Arity {
            min: self.min.min(other.min),
            max: match (self.max, other.max) {
                (Some(l), Some(r)) => Some(l.max(r)),
                _ => None,
            },
        }
    }
}
impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {}", max),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// An ordered list of parameter descriptors
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub params: &'static [Param],
}
impl Signature {
    pub const fn new(params: &'static [Param]) -> Self {
        Signature { params }
    }

    pub fn arity(&self) -> Arity {
        let min = self
            .params
            .iter()
            .filter(|p| !p.optional && !p.variadic)
            .count();
        let max = match self.params.last() {
            Some(p) if p.variadic => None,
            _ => Some(self.params.len()),
        };
        Arity { min, max }
    }

    /// The descriptor governing the argument at `position`, if any
    fn param_at(&self, position: usize) -> Option<&Param> {
        self.params.get(position).or_else(|| match self.params.last() {
            Some(p) if p.variadic => Some(p),
            _ => None,
        })
    }

    /// Optional params follow required ones, and only the last may be variadic.
    pub fn is_well_formed(&self) -> bool {
        let last = self.params.len().saturating_sub(1);
        let mut seen_optional = false;
        self.params.iter().enumerate().all(|(i, p)| {
            if p.variadic && i != last {
                return false;
            }
            if p.optional {
                seen_optional = true;
            } else if seen_optional && !p.variadic {
                return false;
            }
            !(p.optional && p.variadic)
        })
    }

    /// Check actual arguments against this signature's kinds.
    ///
    /// Arity is assumed to have been checked already.
    fn check_kinds(&self, function: &str, args: &[Value]) -> Result<(), Error> {
        args.iter()
            .enumerate()
            .try_for_each(|(position, value)| match self.param_at(position) {
                Some(param) if param.kinds.accepts(value) => Ok(()),
                Some(param) => Err(Error::InvalidArgumentType {
                    function: function.into(),
                    position,
                    expected: param.kinds,
                    actual: Kind::of(value),
                }),
                None => Err(Error::WrongArgumentCount {
                    function: function.into(),
                    expected: self.arity(),
                    actual: args.len(),
                }),
            })
    }
}

/// The combined arity of a set of overloads
pub fn overall_arity(signatures: &[Signature]) -> Arity {
    signatures
        .iter()
        .map(Signature::arity)
        .reduce(Arity::union)
        .unwrap_or(Arity {
            min: 0,
            max: Some(0),
        })
}

/// Select the first signature that accepts the given arguments.
///
/// If no signature accepts the argument count, the error is a
/// `WrongArgumentCount` spanning all overloads. Otherwise the kind error
/// from the first signature with a compatible arity is returned.
pub fn select<'s>(
    function: &str,
    signatures: &'s [Signature],
    args: &[Value],
) -> Result<&'s Signature, Error> {
    let mut first_kind_error: Option<Error> = None;
    for signature in signatures {
        if !signature.arity().contains(args.len()) {
            continue;
        }
        match signature.check_kinds(function, args) {
            Ok(()) => return Ok(signature),
            Err(err) => {
                first_kind_error.get_or_insert(err);
            }
        }
    }
    Err(first_kind_error.unwrap_or_else(|| Error::WrongArgumentCount {
        function: function.into(),
        expected: overall_arity(signatures),
        actual: args.len(),
    }))
}

#[cfg(test)]
mod test_signature {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const STRING: &[Kind] = &[Kind::String];
    const NUMBER_OR_NULL: &[Kind] = &[Kind::Number, Kind::Null];

    const OVERLOADS: &[Signature] = &[
        Signature::new(&[Param::required(STRING)]),
        Signature::new(&[Param::required(STRING), Param::required(NUMBER_OR_NULL)]),
    ];

    const VARIADIC: &[Signature] = &[Signature::new(&[
        Param::required(STRING),
        Param::variadic(NUMBER_OR_NULL),
    ])];

    const OPTIONAL: &[Signature] = &[Signature::new(&[
        Param::optional(STRING),
        Param::optional(STRING),
    ])];

    #[rstest]
    #[case(vec![json!("a")], 1)]
    #[case(vec![json!("a"), json!(2)], 2)]
    #[case(vec![json!("a"), json!(null)], 2)]
    fn test_select_overload(#[case] args: Vec<Value>, #[case] params: usize) {
        let sig = select("f", OVERLOADS, &args).unwrap();
        assert_eq!(sig.params.len(), params);
    }

    #[test]
    fn test_kind_mismatch_reports_position_and_kinds() {
        let err = select("f", OVERLOADS, &[json!("a"), json!("b")]).unwrap_err();
        match err {
            Error::InvalidArgumentType {
                function,
                position,
                expected,
                actual,
            } => {
                assert_eq!(function, "f");
                assert_eq!(position, 1);
                assert_eq!(expected, Kinds(NUMBER_OR_NULL));
                assert_eq!(actual, Kind::String);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_null_only_where_declared() {
        assert!(select("f", OVERLOADS, &[json!(null)]).is_err());
    }

    #[test]
    fn test_wrong_count_spans_overloads() {
        let err = select("f", OVERLOADS, &[]).unwrap_err();
        match err {
            Error::WrongArgumentCount {
                expected, actual, ..
            } => {
                assert_eq!(
                    expected,
                    Arity {
                        min: 1,
                        max: Some(2)
                    }
                );
                assert_eq!(actual, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    #[case(vec![json!("a")])]
    #[case(vec![json!("a"), json!(1)])]
    #[case(vec![json!("a"), json!(1), json!(null), json!(3.5)])]
    fn test_variadic_accepts_trailing(#[case] args: Vec<Value>) {
        assert!(select("f", VARIADIC, &args).is_ok());
    }

    #[test]
    fn test_variadic_checks_each_trailing_argument() {
        let err = select("f", VARIADIC, &[json!("a"), json!(1), json!(true)]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgumentType { position: 2, .. }
        ));
    }

    #[test]
    fn test_optional_params() {
        assert!(select("f", OPTIONAL, &[]).is_ok());
        assert!(select("f", OPTIONAL, &[json!("a")]).is_ok());
        assert!(select("f", OPTIONAL, &[json!("a"), json!("b")]).is_ok());
        let err = select("f", OPTIONAL, &[json!("a"), json!("b"), json!("c")]).unwrap_err();
        assert!(err.is_argument_error());
        assert!(matches!(err, Error::WrongArgumentCount { actual: 3, .. }));
    }

    #[rstest]
    #[case(Arity { min: 2, max: Some(2) }, "exactly 2")]
    #[case(Arity { min: 0, max: Some(2) }, "between 0 and 2")]
    #[case(Arity { min: 1, max: None }, "at least 1")]
    fn test_arity_display(#[case] arity: Arity, #[case] expected: &str) {
        assert_eq!(arity.to_string(), expected);
    }

    const REQUIRED_AFTER_OPTIONAL: Signature =
        Signature::new(&[Param::optional(STRING), Param::required(STRING)]);
    const REQUIRED_AFTER_VARIADIC: Signature =
        Signature::new(&[Param::variadic(STRING), Param::required(STRING)]);

    #[test]
    fn test_well_formed() {
        assert!(VARIADIC[0].is_well_formed());
        assert!(OPTIONAL[0].is_well_formed());
        assert!(!REQUIRED_AFTER_OPTIONAL.is_well_formed());
        assert!(!REQUIRED_AFTER_VARIADIC.is_well_formed());
    }
}

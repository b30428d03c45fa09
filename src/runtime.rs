//! Evaluator
//!
//! Glue between the function catalog and the `jmespath` crate. Every
//! catalog entry is registered on a `jmespath::Runtime` as a custom
//! function; JMESPath evaluates the arguments and hands them over, and
//! catalog errors are translated back into JMESPath runtime errors so the
//! evaluator can attach the expression position.

use jmespath::functions::Function as JmespathFunction;
use jmespath::{
    Context, ErrorReason, Expression, JmespathError, Rcvar, Runtime, RuntimeError, ToJmespath,
    Variable,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, INVALID_VALUE_PREFIX};
use crate::func::{Function, Registry};

/// Evaluator settings
///
/// Deserializable so hosts can load them from their own configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Register JMESPath's builtin functions (`length`, `sort_by`, ...)
    pub builtin_functions: bool,
    /// Catalog functions to leave unregistered
    pub exclude: Vec<String>,
}
impl Default for Options {
    fn default() -> Self {
        Options {
            builtin_functions: true,
            exclude: Vec::new(),
        }
    }
}

/// A catalog function as seen by the JMESPath runtime
struct Extension {
    function: &'static Function,
}
impl Extension {
    fn arguments(&self, args: &[Rcvar], ctx: &Context<'_>) -> Result<Vec<Value>, JmespathError> {
        args.iter()
            .enumerate()
            .map(|(position, arg)| match &**arg {
                Variable::Expref(_) => Err(JmespathError::from_ctx(
                    ctx,
                    ErrorReason::Runtime(RuntimeError::InvalidType {
                        expected: format!("a value for {}()", self.function.name()),
                        actual: "expref".to_string(),
                        position,
                    }),
                )),
                var => serde_json::to_value(var)
                    .map_err(|e| translate(ctx, Error::InvalidData(e))),
            })
            .collect()
    }
}
impl JmespathFunction for Extension {
    fn evaluate(&self, args: &[Rcvar], ctx: &mut Context<'_>) -> Result<Rcvar, JmespathError> {
        let args = self.arguments(args, ctx)?;
        let result = self
            .function
            .call(&args)
            .map_err(|e| translate(ctx, e))?;
        result.to_jmespath()
    }
}

/// Express a catalog error as a JMESPath runtime error
fn translate(ctx: &Context<'_>, err: Error) -> JmespathError {
    let reason = match err {
        Error::WrongArgumentCount {
            expected, actual, ..
        } => match expected.max {
            Some(max) if actual > max => RuntimeError::TooManyArguments {
                expected: max,
                actual,
            },
            _ => RuntimeError::NotEnoughArguments {
                expected: expected.min,
                actual,
            },
        },
        Error::InvalidArgumentType {
            position,
            expected,
            actual,
            ..
        } => RuntimeError::InvalidType {
            expected: expected.to_string(),
            actual: actual.to_string(),
            position,
        },
        Error::InvalidArgument {
            position,
            expected,
            value,
            ..
        } => RuntimeError::InvalidType {
            expected: format!("{}{}", INVALID_VALUE_PREFIX, expected),
            actual: value.to_string(),
            position,
        },
        Error::Expression(inner) => return inner,
        other => RuntimeError::InvalidType {
            expected: "an argument".to_string(),
            actual: other.to_string(),
            position: 0,
        },
    };
    JmespathError::from_ctx(ctx, ErrorReason::Runtime(reason))
}

/// A JMESPath runtime with the function catalog registered
///
/// Values in the runtime are reference-counted without atomics, so an
/// evaluator stays on the thread that built it.
pub struct Evaluator {
    runtime: Runtime,
    registry: Registry,
}
impl Evaluator {
    /// An evaluator with JMESPath's builtins and the whole catalog
    pub fn new() -> Self {
        Self::with_options(Registry::new(), &Options::default())
    }

    pub fn with_options(registry: Registry, options: &Options) -> Self {
        let mut runtime = Runtime::new();
        if options.builtin_functions {
            runtime.register_builtin_functions();
        }
        options
            .exclude
            .iter()
            .filter(|name| !registry.contains(name))
            .for_each(|name| tracing::warn!(function = %name, "excluded function is not in the catalog"));

        let mut registered = 0;
        registry
            .functions()
            .filter(|f| !options.exclude.iter().any(|name| name == f.name()))
            .for_each(|function| {
                runtime.register_function(function.name(), Box::new(Extension { function }));
                registered += 1;
            });
        tracing::debug!(
            registered,
            builtins = options.builtin_functions,
            "built mapping evaluator"
        );

        Evaluator { runtime, registry }
    }

    pub fn registry(&self) -> Registry {
        self.registry
    }

    /// Compile an expression for repeated evaluation
    pub fn compile<'a>(&'a self, expression: &str) -> Result<Expression<'a>, Error> {
        Ok(self.runtime.compile(expression)?)
    }

    /// Evaluate an expression against a document
    pub fn search(&self, expression: &str, data: &Value) -> Result<Value, Error> {
        let result = self.compile(expression)?.search(data)?;
        Ok(serde_json::to_value(&*result)?)
    }

    /// Evaluate an expression against a document given as JSON text
    pub fn search_str(&self, expression: &str, data: &str) -> Result<Value, Error> {
        let data: Value = serde_json::from_str(data)?;
        self.search(expression, &data)
    }
}
impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("registry", &self.registry)
            .finish()
    }
}

thread_local! {
    static DEFAULT_EVALUATOR: Evaluator = Evaluator::new();
}

/// Evaluate an expression with the default evaluator for this thread
pub fn search(expression: &str, data: &Value) -> Result<Value, Error> {
    DEFAULT_EVALUATOR.with(|evaluator| evaluator.search(expression, data))
}

/// Like `search`, with the document given as JSON text
pub fn search_str(expression: &str, data: &str) -> Result<Value, Error> {
    DEFAULT_EVALUATOR.with(|evaluator| evaluator.search_str(expression, data))
}

#[cfg(test)]
mod test_runtime {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn runtime_reason(result: Result<Value, Error>) -> RuntimeError {
        match result {
            Err(Error::Expression(JmespathError {
                reason: ErrorReason::Runtime(reason),
                ..
            })) => reason,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_and_builtins_together() {
        let evaluator = Evaluator::new();
        let data = json!({"tags": ["b", "a", "b"]});
        assert_eq!(
            evaluator.search("sort(uniq(tags))", &data).unwrap(),
            json!(["a", "b"])
        );
    }

    #[test]
    fn test_wrong_kind_becomes_invalid_type() {
        let reason = runtime_reason(Evaluator::new().search("toUpper(`1`)", &json!({})));
        match reason {
            RuntimeError::InvalidType {
                expected,
                actual,
                position,
            } => {
                assert_eq!(expected, "string");
                assert_eq!(actual, "number");
                assert_eq!(position, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_arity_errors() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            runtime_reason(evaluator.search("trim('a', 'b')", &json!({}))),
            RuntimeError::TooManyArguments {
                expected: 1,
                actual: 2
            }
        ));
        assert!(matches!(
            runtime_reason(evaluator.search("get(@)", &json!({}))),
            RuntimeError::NotEnoughArguments {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_expref_rejected() {
        let reason = runtime_reason(Evaluator::new().search("toUpper(&name)", &json!({"name": "a"})));
        assert!(matches!(reason, RuntimeError::InvalidType { actual, .. } if actual == "expref"));
    }

    #[test]
    fn test_options_exclude_and_builtins() {
        let options = Options {
            builtin_functions: false,
            exclude: vec!["now".into()],
        };
        let evaluator = Evaluator::with_options(Registry::new(), &options);
        assert!(evaluator.search("now()", &json!({})).is_err());
        assert!(evaluator.search("length(@)", &json!([1])).is_err());
        assert_eq!(
            evaluator.search("toLower('A')", &json!({})).unwrap(),
            json!("a")
        );
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: Options = serde_json::from_value(json!({"exclude": ["debug"]})).unwrap();
        assert_eq!(
            options,
            Options {
                builtin_functions: true,
                exclude: vec!["debug".into()],
            }
        );
    }

    #[test]
    fn test_search_str_rejects_bad_json() {
        assert!(matches!(
            search_str("a", "{not json"),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(search_str("a", r#"{"a": "x"}"#).unwrap(), json!("x"));
    }

    #[test]
    fn test_compile_reuse() {
        let evaluator = Evaluator::new();
        let expr = evaluator.compile("btoa(name)").unwrap();
        let first = expr.search(&json!({"name": "John Doe"})).unwrap();
        let second = expr.search(&json!({"name": "a"})).unwrap();
        assert_eq!(serde_json::to_value(&*first).unwrap(), json!("Sm9obiBEb2U="));
        assert_eq!(serde_json::to_value(&*second).unwrap(), json!("YQ=="));
    }
}

//! Leaf codecs over JSON values.
//!
//! Every leaf here either succeeds immediately or reports exactly one
//! [`ValidationError`](crate::ValidationError) for the rejected value, at the
//! context it was called with.

use std::marker::PhantomData;

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::codec::combinators::{Pattern, Refine};
use crate::codec::{Codec, Decoder, Encoder};
use crate::context::Context;
use crate::error::failure;
use crate::DecodeResult;

/// A Rust type with a direct JSON counterpart.
///
/// Implementing this trait is enough to get a [`Primitive`] codec for the
/// type.
pub trait JsonPrimitive: Sized + Send + Sync + 'static {
    /// Name recorded in contexts for this type.
    const NAME: &'static str;

    /// Extracts the value, or `None` if `value` is the wrong JSON type.
    fn from_json(value: &Value) -> Option<Self>;

    /// Converts the value back to JSON.
    fn to_json(&self) -> Value;
}

impl JsonPrimitive for Value {
    const NAME: &'static str = "unknown";

    fn from_json(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl JsonPrimitive for String {
    const NAME: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl JsonPrimitive for f64 {
    const NAME: &'static str = "number";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl JsonPrimitive for i64 {
    const NAME: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl JsonPrimitive for bool {
    const NAME: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl JsonPrimitive for () {
    const NAME: &'static str = "null";

    fn from_json(value: &Value) -> Option<Self> {
        value.is_null().then_some(())
    }

    fn to_json(&self) -> Value {
        Value::Null
    }
}

/// Decoder and encoder for a [`JsonPrimitive`].
pub struct Primitive<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Primitive<T> {
    fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Primitive<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: JsonPrimitive> std::fmt::Debug for Primitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Primitive({})", T::NAME)
    }
}

impl<T: JsonPrimitive> Decoder for Primitive<T> {
    type Input = Value;
    type Output = T;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<T> {
        match T::from_json(input) {
            Some(value) => Validation::Success(value),
            None => failure(input, context),
        }
    }
}

impl<T: JsonPrimitive> Encoder for Primitive<T> {
    type Input = T;
    type Output = Value;

    fn encode(&self, value: &T) -> Value {
        value.to_json()
    }
}

fn primitive<T: JsonPrimitive>() -> Codec<Primitive<T>, Primitive<T>> {
    Codec::new(T::NAME, Primitive::new(), Primitive::new())
}

/// Accepts any JSON value unchanged.
pub fn unknown() -> Codec<Primitive<Value>, Primitive<Value>> {
    primitive()
}

/// Accepts JSON strings.
///
/// # Example
///
/// ```rust
/// use rivet::string;
/// use serde_json::json;
///
/// assert!(string().decode(&json!("x")).is_success());
/// assert!(string().decode(&json!(42)).is_failure());
/// ```
pub fn string() -> Codec<Primitive<String>, Primitive<String>> {
    primitive()
}

/// Accepts any JSON number as an `f64`.
pub fn number() -> Codec<Primitive<f64>, Primitive<f64>> {
    primitive()
}

/// Accepts JSON numbers that fit an `i64` exactly.
///
/// Floats such as `1.5` and integers beyond the `i64` range are rejected.
pub fn integer() -> Codec<Primitive<i64>, Primitive<i64>> {
    primitive()
}

/// Accepts `true` and `false`.
pub fn boolean() -> Codec<Primitive<bool>, Primitive<bool>> {
    primitive()
}

/// Accepts only `null`.
pub fn null() -> Codec<Primitive<()>, Primitive<()>> {
    primitive()
}

/// Decoder and encoder for one exact JSON value.
#[derive(Debug, Clone)]
pub struct Literal {
    value: Value,
}

impl Decoder for Literal {
    type Input = Value;
    type Output = Value;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<Value> {
        if *input == self.value {
            Validation::Success(input.clone())
        } else {
            failure(input, context)
        }
    }
}

impl Encoder for Literal {
    type Input = Value;
    type Output = Value;

    fn encode(&self, value: &Value) -> Value {
        value.clone()
    }
}

/// Accepts exactly `value`.
///
/// # Example
///
/// ```rust
/// use rivet::literal;
/// use serde_json::json;
///
/// let kind = literal(json!("circle"));
/// assert_eq!(kind.name(), "\"circle\"");
/// assert!(kind.decode(&json!("circle")).is_success());
/// assert!(kind.decode(&json!("square")).is_failure());
/// ```
pub fn literal(value: Value) -> Codec<Literal, Literal> {
    let literal = Literal { value };
    Codec::new(literal.value.to_string(), literal.clone(), literal)
}

/// Accepts strings matching a regular expression.
///
/// Returns an error if the pattern does not compile.
///
/// # Example
///
/// ```rust
/// use rivet::string_matching;
/// use serde_json::json;
///
/// let digits = string_matching(r"^\d+$").unwrap();
///
/// assert!(digits.decode(&json!("12345")).is_success());
///
/// let errors = digits.decode(&json!("abc")).into_result().unwrap_err();
/// assert_eq!(errors.first().message.as_deref(), Some("must match pattern ^\\d+$"));
/// ```
pub fn string_matching(
    pattern: &str,
) -> Result<Codec<Refine<Primitive<String>, Pattern>, Primitive<String>>, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(string().refine(
        format!("string matching {}", pattern),
        Pattern::new(regex),
        format!("must match pattern {}", pattern),
    ))
}

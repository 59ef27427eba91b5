//! Codecs that parse numbers out of text.
//!
//! [`parse_number`] and [`parse_integer`] work on `String` values and are
//! meant to be composed after [`string`](crate::string); the
//! [`number_from_string`] and [`integer_from_string`] shortcuts do exactly
//! that. Text that does not parse is a decode failure.

use stillwater::Validation;

use crate::codec::primitive::{string, Primitive};
use crate::codec::{AndThen, Codec, Decoder, Encoder, Then};
use crate::context::Context;
use crate::error::failure;
use crate::DecodeResult;

/// Decoder and encoder between decimal text and `f64`.
///
/// Surrounding whitespace is ignored. Empty text, unparseable text, and text
/// naming a non-finite value (`NaN`, `inf`) are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseNumber;

impl Decoder for ParseNumber {
    type Input = String;
    type Output = f64;

    fn validate(&self, input: &String, context: &Context) -> DecodeResult<f64> {
        match input.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Validation::Success(n),
            _ => failure(input, context),
        }
    }
}

impl Encoder for ParseNumber {
    type Input = f64;
    type Output = String;

    fn encode(&self, value: &f64) -> String {
        value.to_string()
    }
}

/// Decoder and encoder between decimal text and `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseInteger;

impl Decoder for ParseInteger {
    type Input = String;
    type Output = i64;

    fn validate(&self, input: &String, context: &Context) -> DecodeResult<i64> {
        match input.trim().parse::<i64>() {
            Ok(n) => Validation::Success(n),
            Err(_) => failure(input, context),
        }
    }
}

impl Encoder for ParseInteger {
    type Input = i64;
    type Output = String;

    fn encode(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// Parses a `String` into an `f64`; encodes back to its shortest decimal text.
pub fn parse_number() -> Codec<ParseNumber, ParseNumber> {
    Codec::new("NumberFromString", ParseNumber, ParseNumber)
}

/// Parses a `String` into an `i64`; encodes back to decimal text.
pub fn parse_integer() -> Codec<ParseInteger, ParseInteger> {
    Codec::new("IntegerFromString", ParseInteger, ParseInteger)
}

/// JSON strings holding a number, decoded to `f64`.
///
/// # Example
///
/// ```rust
/// use rivet::number_from_string;
/// use serde_json::json;
///
/// let codec = number_from_string();
///
/// let n = codec.decode(&json!("3")).into_result().unwrap();
/// assert_eq!(n, 3.0);
///
/// let text = codec.encode(&n);
/// assert_eq!(text, json!("3"));
/// assert_eq!(codec.decode(&text).into_result().unwrap(), 3.0);
/// ```
pub fn number_from_string() -> Codec<
    AndThen<Primitive<String>, ParseNumber>,
    Then<ParseNumber, Primitive<String>>,
> {
    string().pipe(parse_number())
}

/// JSON strings holding an integer, decoded to `i64`.
pub fn integer_from_string() -> Codec<
    AndThen<Primitive<String>, ParseInteger>,
    Then<ParseInteger, Primitive<String>>,
> {
    string().pipe(parse_integer())
}

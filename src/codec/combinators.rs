//! Combinators for alternatives, nullability and refinement.
//!
//! - [`union`]: the first member that accepts the input wins
//! - [`nullable`]: `null` or a value of the inner codec
//! - [`Refine`]: an inner codec narrowed by a [`Predicate`]
//!
//! # Example
//!
//! ```rust
//! use rivet::{integer, nullable, string, union, Either};
//! use serde_json::json;
//!
//! // Flexible ID - string or integer
//! let id = union(string(), integer());
//! assert_eq!(id.decode(&json!(7)).into_result().unwrap(), Either::Right(7));
//!
//! let nickname = nullable(string());
//! assert_eq!(nickname.decode(&json!(null)).into_result().unwrap(), None);
//! ```

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use stillwater::{Semigroup, Validation};

use crate::codec::{Codec, Decoder, Encoder};
use crate::context::Context;
use crate::error::{accumulate, Errors, ValidationError};
use crate::DecodeResult;

/// A value decoded by one of two union members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    /// Accepted by the first member.
    Left(L),
    /// Accepted by the second member.
    Right(R),
}

/// Decoder half of [`union`].
///
/// Members are tried in declaration order, each under a context entry for its
/// position. The first success wins; if every member fails, their errors are
/// reported together in declaration order.
#[derive(Debug, Clone)]
pub struct UnionDecoder<L, R> {
    left: L,
    left_name: String,
    right: R,
    right_name: String,
}

impl<L, R> Decoder for UnionDecoder<L, R>
where
    L: Decoder,
    R: Decoder<Input = L::Input>,
{
    type Input = L::Input;
    type Output = Either<L::Output, R::Output>;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        let left_errors = match self
            .left
            .validate(input, &context.push_index(0, self.left_name.as_str()))
        {
            Validation::Success(value) => return Validation::Success(Either::Left(value)),
            Validation::Failure(errors) => errors,
        };

        match self
            .right
            .validate(input, &context.push_index(1, self.right_name.as_str()))
        {
            Validation::Success(value) => Validation::Success(Either::Right(value)),
            Validation::Failure(right_errors) => {
                Validation::Failure(left_errors.combine(right_errors))
            }
        }
    }
}

/// Encoder half of [`union`]: dispatches on the variant.
#[derive(Debug, Clone)]
pub struct UnionEncoder<L, R> {
    left: L,
    right: R,
}

impl<L, R> Encoder for UnionEncoder<L, R>
where
    L: Encoder,
    R: Encoder<Output = L::Output>,
{
    type Input = Either<L::Input, R::Input>;
    type Output = L::Output;

    fn encode(&self, value: &Self::Input) -> Self::Output {
        match value {
            Either::Left(value) => self.left.encode(value),
            Either::Right(value) => self.right.encode(value),
        }
    }
}

/// Accepts what either member accepts, preferring `left`.
///
/// Wider unions nest: `union(a, union(b, c))`.
///
/// # Example
///
/// ```rust
/// use rivet::{number, string, union};
/// use serde_json::json;
///
/// let codec = union(string(), number());
///
/// let errors = codec.decode(&json!(true)).into_result().unwrap_err();
/// let paths: Vec<_> = errors.iter().map(|e| e.expected().unwrap().to_string()).collect();
/// assert_eq!(paths, vec!["string", "number"]);
/// ```
#[allow(clippy::type_complexity)]
pub fn union<LD, LE, RD, RE>(
    left: Codec<LD, LE>,
    right: Codec<RD, RE>,
) -> Codec<UnionDecoder<LD, RD>, UnionEncoder<LE, RE>>
where
    LD: Decoder,
    LE: Encoder<Input = LD::Output>,
    RD: Decoder<Input = LD::Input>,
    RE: Encoder<Input = RD::Output, Output = LE::Output>,
{
    let (left_name, left_decoder, left_encoder) = left.into_parts();
    let (right_name, right_decoder, right_encoder) = right.into_parts();

    Codec::new(
        format!("({} | {})", left_name, right_name),
        UnionDecoder {
            left: left_decoder,
            left_name,
            right: right_decoder,
            right_name,
        },
        UnionEncoder {
            left: left_encoder,
            right: right_encoder,
        },
    )
}

/// Decoder half of [`nullable`].
#[derive(Debug, Clone)]
pub struct NullableDecoder<D> {
    inner: D,
}

impl<D> Decoder for NullableDecoder<D>
where
    D: Decoder<Input = Value>,
{
    type Input = Value;
    type Output = Option<D::Output>;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<Self::Output> {
        if input.is_null() {
            Validation::Success(None)
        } else {
            self.inner.validate(input, context).map(Some)
        }
    }
}

/// Encoder half of [`nullable`].
#[derive(Debug, Clone)]
pub struct NullableEncoder<E> {
    inner: E,
}

impl<E> Encoder for NullableEncoder<E>
where
    E: Encoder<Output = Value>,
{
    type Input = Option<E::Input>;
    type Output = Value;

    fn encode(&self, value: &Self::Input) -> Value {
        match value {
            Some(value) => self.inner.encode(value),
            None => Value::Null,
        }
    }
}

/// Accepts `null` as `None` and anything `inner` accepts as `Some`.
///
/// Record fields that are missing from the input decode as `null`, so a
/// nullable field is also an optional one.
pub fn nullable<D, E>(inner: Codec<D, E>) -> Codec<NullableDecoder<D>, NullableEncoder<E>>
where
    D: Decoder<Input = Value>,
    E: Encoder<Input = D::Output, Output = Value>,
{
    let (name, decoder, encoder) = inner.into_parts();
    Codec::new(
        format!("({} | null)", name),
        NullableDecoder { inner: decoder },
        NullableEncoder { inner: encoder },
    )
}

/// A test applied to decoded values by [`Refine`].
///
/// Implemented for closures `Fn(&A) -> bool` and, for strings, for
/// [`Pattern`].
pub trait Predicate<A: ?Sized>: Send + Sync {
    /// Returns true if `value` is accepted.
    fn test(&self, value: &A) -> bool;
}

impl<A: ?Sized, F> Predicate<A> for F
where
    F: Fn(&A) -> bool + Send + Sync,
{
    fn test(&self, value: &A) -> bool {
        self(value)
    }
}

/// A regular expression used as a string predicate.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Wraps a compiled regular expression.
    pub fn new(regex: Regex) -> Self {
        Self(regex)
    }

    /// Returns the pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Predicate<String> for Pattern {
    fn test(&self, value: &String) -> bool {
        self.0.is_match(value)
    }
}

/// Decoder that checks a predicate after the inner decoder succeeds.
///
/// Built by [`Codec::refine`].
#[derive(Debug, Clone)]
pub struct Refine<D, P> {
    inner: D,
    predicate: P,
    message: String,
}

impl<D, P> Refine<D, P> {
    /// Wraps `inner`, rejecting values for which `predicate` is false.
    pub fn new(inner: D, predicate: P, message: impl Into<String>) -> Self {
        Self {
            inner,
            predicate,
            message: message.into(),
        }
    }
}

impl<D, P> Decoder for Refine<D, P>
where
    D: Decoder,
    D::Input: Serialize,
    P: Predicate<D::Output>,
{
    type Input = D::Input;
    type Output = D::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        match self.inner.validate(input, context) {
            Validation::Success(value) if self.predicate.test(&value) => {
                Validation::Success(value)
            }
            Validation::Success(_) => Validation::Failure(Errors::single(
                ValidationError::capture(input, context).with_message(self.message.as_str()),
            )),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }
}

/// Merges the failures of independent children, keeping their order.
pub(crate) fn merge<A>(
    results: impl IntoIterator<Item = DecodeResult<A>>,
) -> DecodeResult<Vec<A>> {
    let mut values = Vec::new();
    let mut errors = None;

    for result in results {
        match result {
            Validation::Success(value) => values.push(value),
            Validation::Failure(e) => errors = accumulate(errors, e),
        }
    }

    match errors {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(values),
    }
}

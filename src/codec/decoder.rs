//! The decoder half of a codec.
//!
//! This module provides the [`Decoder`] trait, sequential composition through
//! [`AndThen`], and adapters that turn plain functions into decoders.

use std::marker::PhantomData;
use std::sync::Arc;

use stillwater::Validation;

use crate::context::Context;
use crate::DecodeResult;

/// A pure function from an input value to a [`DecodeResult`].
///
/// Decoders must be deterministic and must report every rejection as a
/// `Validation::Failure`; they never panic on bad input. The `Send + Sync`
/// bounds let a decoder be shared across threads and stored in trait objects
/// like `Arc<dyn Decoder<Input = Value, Output = String>>`.
///
/// # Example
///
/// ```rust
/// use rivet::{Context, Decoder};
/// use rivet::codec::decoder;
/// use stillwater::Validation;
///
/// let positive = decoder::from_fn(|n: &i64, context: &Context| {
///     if *n > 0 {
///         Validation::Success(*n)
///     } else {
///         rivet::failure(n, context)
///     }
/// });
///
/// assert!(positive.decode(&3).is_success());
/// assert!(positive.decode(&-3).is_failure());
/// ```
pub trait Decoder: Send + Sync {
    /// The external representation this decoder accepts.
    type Input;

    /// The validated value produced on success.
    type Output;

    /// Decodes `input`, attributing failures to `context`.
    ///
    /// Structural codecs call this with an extended context before handing a
    /// nested value to a child.
    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output>;

    /// Decodes `input` from the root context.
    fn decode(&self, input: &Self::Input) -> DecodeResult<Self::Output> {
        self.validate(input, &Context::root())
    }
}

impl<D: Decoder + ?Sized> Decoder for Arc<D> {
    type Input = D::Input;
    type Output = D::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        (**self).validate(input, context)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Input = D::Input;
    type Output = D::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        (**self).validate(input, context)
    }
}

/// Two decoders run in sequence.
///
/// The second decoder receives the first one's output and the same context;
/// composition never adds a path entry of its own. When the first decoder
/// fails, the second is not run and the first one's errors are returned
/// unchanged.
#[derive(Debug, Clone)]
pub struct AndThen<D1, D2> {
    first: D1,
    second: D2,
}

impl<D1, D2> AndThen<D1, D2> {
    /// Chains `second` after `first`.
    pub fn new(first: D1, second: D2) -> Self {
        Self { first, second }
    }
}

impl<D1, D2> Decoder for AndThen<D1, D2>
where
    D1: Decoder,
    D2: Decoder<Input = D1::Output>,
{
    type Input = D1::Input;
    type Output = D2::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        match self.first.validate(input, context) {
            Validation::Success(intermediate) => self.second.validate(&intermediate, context),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }
}

/// A decoder backed by a function of the input and the current context.
pub struct FnDecoder<I, A, F> {
    f: F,
    _marker: PhantomData<fn(&I) -> A>,
}

impl<I, A, F: Clone> Clone for FnDecoder<I, A, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, A, F> Decoder for FnDecoder<I, A, F>
where
    F: Fn(&I, &Context) -> DecodeResult<A> + Send + Sync,
{
    type Input = I;
    type Output = A;

    fn validate(&self, input: &I, context: &Context) -> DecodeResult<A> {
        (self.f)(input, context)
    }
}

/// Creates a decoder from a function of the input and the current context.
pub fn from_fn<I, A, F>(f: F) -> FnDecoder<I, A, F>
where
    F: Fn(&I, &Context) -> DecodeResult<A> + Send + Sync,
{
    FnDecoder {
        f,
        _marker: PhantomData,
    }
}

/// A decoder that always succeeds by applying a total function.
pub struct Total<I, F> {
    f: F,
    _marker: PhantomData<fn(&I)>,
}

impl<I, F: Clone> Clone for Total<I, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, A, F> Decoder for Total<I, F>
where
    F: Fn(&I) -> A + Send + Sync,
{
    type Input = I;
    type Output = A;

    fn validate(&self, input: &I, _context: &Context) -> DecodeResult<A> {
        Validation::Success((self.f)(input))
    }
}

/// Creates a decoder that never fails.
pub fn total<I, A, F>(f: F) -> Total<I, F>
where
    F: Fn(&I) -> A + Send + Sync,
{
    Total {
        f,
        _marker: PhantomData,
    }
}

/// A decoder whose failures all carry the same custom message.
#[derive(Debug, Clone)]
pub struct WithMessage<D> {
    inner: D,
    message: String,
}

impl<D> WithMessage<D> {
    /// Wraps `inner`, replacing the message of every error it reports.
    pub fn new(inner: D, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }
}

impl<D: Decoder> Decoder for WithMessage<D> {
    type Input = D::Input;
    type Output = D::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        match self.inner.validate(input, context) {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(errors) => Validation::Failure(errors.with_message(&self.message)),
        }
    }
}

//! The encoder half of a codec.
//!
//! Encoders are total: they turn a decoded value back into an external
//! representation and have no failure channel.

use std::marker::PhantomData;
use std::sync::Arc;

/// A pure, total function from a decoded value to an external representation.
pub trait Encoder: Send + Sync {
    /// The decoded value this encoder accepts.
    type Input;

    /// The external representation produced.
    type Output;

    /// Encodes `value`.
    fn encode(&self, value: &Self::Input) -> Self::Output;
}

impl<E: Encoder + ?Sized> Encoder for Arc<E> {
    type Input = E::Input;
    type Output = E::Output;

    fn encode(&self, value: &Self::Input) -> Self::Output {
        (**self).encode(value)
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    type Input = E::Input;
    type Output = E::Output;

    fn encode(&self, value: &Self::Input) -> Self::Output {
        (**self).encode(value)
    }
}

/// Two encoders run in sequence: `first`, then `second` on its output.
///
/// Codec composition builds this with the stages in the reverse of the
/// decoding order, so the outermost decoder's encoder runs last.
#[derive(Debug, Clone)]
pub struct Then<E1, E2> {
    first: E1,
    second: E2,
}

impl<E1, E2> Then<E1, E2> {
    /// Chains `second` after `first`.
    pub fn new(first: E1, second: E2) -> Self {
        Self { first, second }
    }
}

impl<E1, E2> Encoder for Then<E1, E2>
where
    E1: Encoder,
    E2: Encoder<Input = E1::Output>,
{
    type Input = E1::Input;
    type Output = E2::Output;

    fn encode(&self, value: &Self::Input) -> Self::Output {
        self.second.encode(&self.first.encode(value))
    }
}

/// An encoder backed by a function.
pub struct FnEncoder<A, O, F> {
    f: F,
    _marker: PhantomData<fn(&A) -> O>,
}

impl<A, O, F: Clone> Clone for FnEncoder<A, O, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, O, F> Encoder for FnEncoder<A, O, F>
where
    F: Fn(&A) -> O + Send + Sync,
{
    type Input = A;
    type Output = O;

    fn encode(&self, value: &A) -> O {
        (self.f)(value)
    }
}

/// Creates an encoder from a function.
///
/// # Example
///
/// ```rust
/// use rivet::Encoder;
/// use rivet::codec::encoder;
///
/// let to_text = encoder::from_fn(|n: &f64| n.to_string());
/// assert_eq!(to_text.encode(&1.5), "1.5");
/// ```
pub fn from_fn<A, O, F>(f: F) -> FnEncoder<A, O, F>
where
    F: Fn(&A) -> O + Send + Sync,
{
    FnEncoder {
        f,
        _marker: PhantomData,
    }
}

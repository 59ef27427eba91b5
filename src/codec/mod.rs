//! Codecs and the combinators that build them.
//!
//! A [`Codec`] pairs a [`Decoder`] with an [`Encoder`] whose input is the
//! decoder's output. Codecs are plain values: combinators consume codecs and
//! return new ones, and nothing is mutated after construction.
//!
//! # Example
//!
//! ```rust
//! use rivet::{array, number, record, string};
//! use serde_json::json;
//!
//! let person = record((("name", string()), ("scores", array(number()))));
//!
//! let result = person.decode(&json!({"name": "Ada", "scores": [1, 2.5]}));
//! let (name, scores) = result.into_result().unwrap();
//! assert_eq!(name, "Ada");
//! assert_eq!(scores, vec![1.0, 2.5]);
//!
//! assert_eq!(
//!     person.encode(&("Ada".to_string(), vec![1.0])),
//!     json!({"name": "Ada", "scores": [1.0]})
//! );
//! ```

mod array;
mod combinators;
pub mod decoder;
pub mod encoder;
mod parse;
mod primitive;
mod record;
mod recursive;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use stillwater::Validation;

use crate::context::Context;
use crate::DecodeResult;

pub use array::{
    array, dictionary, ArrayDecoder, ArrayEncoder, DictionaryDecoder, DictionaryEncoder,
};
pub use combinators::{
    nullable, union, Either, NullableDecoder, NullableEncoder, Pattern, Predicate, Refine,
    UnionDecoder, UnionEncoder,
};
pub use decoder::{AndThen, Decoder, FnDecoder, Total, WithMessage};
pub use encoder::{Encoder, FnEncoder, Then};
pub use parse::{
    integer_from_string, number_from_string, parse_integer, parse_number, ParseInteger,
    ParseNumber,
};
pub use primitive::{
    boolean, integer, literal, null, number, string, string_matching, unknown, JsonPrimitive,
    Literal, Primitive,
};
pub use record::{record, Fields, RecordDecoder, RecordEncoder};
pub use recursive::{
    recursive, recursive_with_max_depth, Recursive, RecursiveCodec, DEFAULT_MAX_DEPTH,
};

/// A codec whose decoder and encoder are type-erased trait objects.
///
/// Produced by [`Codec::erase`]; useful for storing codecs of different
/// concrete types side by side and required by [`recursive`].
pub type DynCodec<I, A, O> =
    Codec<Arc<dyn Decoder<Input = I, Output = A>>, Arc<dyn Encoder<Input = A, Output = O>>>;

/// A named pairing of a decoder and the encoder that reverses it.
///
/// The encoder's input type must equal the decoder's output type; the
/// constructors and combinators enforce this through trait bounds, so a codec
/// whose halves do not line up does not compile.
///
/// # Example
///
/// ```rust
/// use rivet::{string, Context};
/// use serde_json::json;
///
/// let codec = string();
///
/// let errors = codec.decode(&json!(42)).into_result().unwrap_err();
/// assert_eq!(errors.first().value, json!(42));
/// assert_eq!(errors.first().context, Context::root());
///
/// assert_eq!(codec.decode(&json!("x")).into_result().unwrap(), "x");
/// assert_eq!(codec.encode(&"x".to_string()), json!("x"));
/// ```
#[derive(Debug, Clone)]
pub struct Codec<D, E> {
    name: String,
    decoder: D,
    encoder: E,
}

impl<D, E> Codec<D, E>
where
    D: Decoder,
    E: Encoder<Input = D::Output>,
{
    /// Pairs a decoder with its encoder under a name.
    ///
    /// The name is what structural codecs record in the [`Context`] when they
    /// hand a nested value to this codec.
    pub fn new(name: impl Into<String>, decoder: D, encoder: E) -> Self {
        Self {
            name: name.into(),
            decoder,
            encoder,
        }
    }

    /// Returns the codec's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoder half.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Returns the encoder half.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Splits the codec into its name, decoder and encoder.
    pub fn into_parts(self) -> (String, D, E) {
        (self.name, self.decoder, self.encoder)
    }

    /// Returns the same codec under a different name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Decodes `input`, attributing failures to `context`.
    pub fn validate(&self, input: &D::Input, context: &Context) -> DecodeResult<D::Output> {
        self.decoder.validate(input, context)
    }

    /// Decodes `input` from the root context.
    pub fn decode(&self, input: &D::Input) -> DecodeResult<D::Output> {
        let result = self.decoder.decode(input);
        if let Validation::Failure(errors) = &result {
            tracing::debug!(codec = %self.name, errors = errors.len(), "decode failed");
        }
        result
    }

    /// Encodes a decoded value.
    pub fn encode(&self, value: &D::Output) -> E::Output {
        self.encoder.encode(value)
    }

    /// Returns true if `input` decodes successfully.
    pub fn is(&self, input: &D::Input) -> bool {
        self.decoder.decode(input).is_success()
    }

    /// Composes `next` after this codec.
    ///
    /// Decoding runs this codec's decoder, then `next`'s decoder on the result.
    /// Encoding runs in the mirrored order: `next`'s encoder first, then this
    /// codec's encoder. See [`compose`] for the curried form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rivet::{parse_number, string};
    /// use serde_json::json;
    ///
    /// let codec = string().pipe(parse_number());
    ///
    /// assert_eq!(codec.decode(&json!("3")).into_result().unwrap(), 3.0);
    /// assert_eq!(codec.encode(&3.0), json!("3"));
    /// ```
    pub fn pipe<ND, NE>(self, next: Codec<ND, NE>) -> Codec<AndThen<D, ND>, Then<NE, E>>
    where
        ND: Decoder<Input = D::Output>,
        NE: Encoder<Input = ND::Output, Output = D::Output>,
    {
        Codec {
            name: format!("pipe({}, {})", self.name, next.name),
            decoder: AndThen::new(self.decoder, next.decoder),
            encoder: Then::new(next.encoder, self.encoder),
        }
    }

    /// Appends a lossless conversion to another type.
    ///
    /// `decode` maps every successfully decoded value forward and `encode`
    /// maps it back before this codec's encoder runs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rivet::{number, record};
    /// use serde_json::json;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Point { x: f64, y: f64 }
    ///
    /// let point = record((("x", number()), ("y", number()))).map(
    ///     "Point",
    ///     |&(x, y)| Point { x, y },
    ///     |p: &Point| (p.x, p.y),
    /// );
    ///
    /// let decoded = point.decode(&json!({"x": 1, "y": 2})).into_result().unwrap();
    /// assert_eq!(decoded, Point { x: 1.0, y: 2.0 });
    /// assert_eq!(point.encode(&decoded), json!({"x": 1.0, "y": 2.0}));
    /// ```
    #[allow(clippy::type_complexity)]
    pub fn map<B, F, G>(
        self,
        name: impl Into<String>,
        decode: F,
        encode: G,
    ) -> Codec<AndThen<D, Total<D::Output, F>>, Then<FnEncoder<B, D::Output, G>, E>>
    where
        F: Fn(&D::Output) -> B + Send + Sync,
        G: Fn(&B) -> D::Output + Send + Sync,
    {
        let name = name.into();
        let iso = Codec {
            name: name.clone(),
            decoder: decoder::total(decode),
            encoder: encoder::from_fn(encode),
        };
        self.pipe(iso).named(name)
    }

    /// Narrows the accepted values to those satisfying `predicate`.
    ///
    /// A decoded value that fails the predicate is reported as one error for
    /// the original input, at the current context, carrying `message`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rivet::integer;
    /// use serde_json::json;
    ///
    /// let positive = integer().refine("Positive", |n: &i64| *n > 0, "must be positive");
    ///
    /// assert!(positive.decode(&json!(3)).is_success());
    ///
    /// let errors = positive.decode(&json!(-3)).into_result().unwrap_err();
    /// assert_eq!(errors.first().message.as_deref(), Some("must be positive"));
    /// ```
    pub fn refine<P>(
        self,
        name: impl Into<String>,
        predicate: P,
        message: impl Into<String>,
    ) -> Codec<Refine<D, P>, E>
    where
        D::Input: Serialize,
        P: Predicate<D::Output>,
    {
        Codec {
            name: name.into(),
            decoder: Refine::new(self.decoder, predicate, message),
            encoder: self.encoder,
        }
    }

    /// Replaces the message of every error this codec reports.
    pub fn with_message(self, message: impl Into<String>) -> Codec<WithMessage<D>, E> {
        Codec {
            name: self.name,
            decoder: WithMessage::new(self.decoder, message),
            encoder: self.encoder,
        }
    }

    /// Erases the concrete decoder and encoder types.
    pub fn erase(self) -> DynCodec<D::Input, D::Output, E::Output>
    where
        D: 'static,
        E: 'static,
    {
        let decoder: Arc<dyn Decoder<Input = D::Input, Output = D::Output>> =
            Arc::new(self.decoder);
        let encoder: Arc<dyn Encoder<Input = D::Output, Output = E::Output>> =
            Arc::new(self.encoder);
        Codec {
            name: self.name,
            decoder,
            encoder,
        }
    }
}

impl<I, A, O, F, G> Codec<FnDecoder<I, A, F>, FnEncoder<A, O, G>>
where
    F: Fn(&I, &Context) -> DecodeResult<A> + Send + Sync,
    G: Fn(&A) -> O + Send + Sync,
{
    /// Builds a codec from a validate function and an encode function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rivet::{failure, Codec, Context};
    /// use stillwater::Validation;
    ///
    /// let even = Codec::from_fns(
    ///     "Even",
    ///     |n: &u32, context: &Context| {
    ///         if n % 2 == 0 {
    ///             Validation::Success(*n)
    ///         } else {
    ///             failure(n, context)
    ///         }
    ///     },
    ///     |n: &u32| *n,
    /// );
    ///
    /// assert!(even.is(&4));
    /// assert!(!even.is(&5));
    /// ```
    pub fn from_fns(name: impl Into<String>, validate: F, encode: G) -> Self {
        Codec {
            name: name.into(),
            decoder: decoder::from_fn(validate),
            encoder: encoder::from_fn(encode),
        }
    }
}

impl<D, E> Decoder for Codec<D, E>
where
    D: Decoder,
    E: Encoder<Input = D::Output>,
{
    type Input = D::Input;
    type Output = D::Output;

    fn validate(&self, input: &Self::Input, context: &Context) -> DecodeResult<Self::Output> {
        self.decoder.validate(input, context)
    }
}

impl<D, E> Encoder for Codec<D, E>
where
    D: Decoder,
    E: Encoder<Input = D::Output>,
{
    type Input = E::Input;
    type Output = E::Output;

    fn encode(&self, value: &Self::Input) -> Self::Output {
        self.encoder.encode(value)
    }
}

/// Curried codec composition: `compose(next).apply(previous)`.
///
/// Holds the `next` codec until the `previous` one is supplied.
#[derive(Debug, Clone)]
pub struct Composer<ND, NE> {
    next: Codec<ND, NE>,
}

/// Starts a composition with the codec that runs second when decoding.
///
/// `compose(next).apply(previous)` is the same codec as
/// `previous.pipe(next)`: decoding goes `previous` then `next`, encoding goes
/// `next` then `previous`. Stages whose types do not line up are rejected at
/// compile time.
///
/// # Example
///
/// ```rust
/// use rivet::{compose, parse_number, string};
/// use serde_json::json;
///
/// let number_from_string = compose(parse_number()).apply(string());
///
/// assert_eq!(number_from_string.decode(&json!("10")).into_result().unwrap(), 10.0);
/// assert_eq!(number_from_string.encode(&10.0), json!("10"));
/// assert!(number_from_string.decode(&json!("abc")).is_failure());
/// ```
pub fn compose<ND, NE>(next: Codec<ND, NE>) -> Composer<ND, NE>
where
    ND: Decoder,
    NE: Encoder<Input = ND::Output, Output = ND::Input>,
{
    Composer { next }
}

impl<ND, NE> Composer<ND, NE>
where
    ND: Decoder,
    NE: Encoder<Input = ND::Output, Output = ND::Input>,
{
    /// Supplies the codec that runs first when decoding.
    pub fn apply<PD, PE>(self, previous: Codec<PD, PE>) -> Codec<AndThen<PD, ND>, Then<NE, PE>>
    where
        PD: Decoder<Output = ND::Input>,
        PE: Encoder<Input = ND::Input>,
    {
        previous.pipe(self.next)
    }
}

/// A decoder and encoder that pass values through unchanged.
pub struct Identity<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Identity<T> {
    /// Creates the identity stage.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Identity")
    }
}

impl<T: Clone> Decoder for Identity<T> {
    type Input = T;
    type Output = T;

    fn validate(&self, input: &T, _context: &Context) -> DecodeResult<T> {
        Validation::Success(input.clone())
    }
}

impl<T: Clone> Encoder for Identity<T> {
    type Input = T;
    type Output = T;

    fn encode(&self, value: &T) -> T {
        value.clone()
    }
}

/// A codec that accepts every value of `T` and encodes it to itself.
///
/// # Example
///
/// ```rust
/// use rivet::identity;
///
/// let codec = identity::<String>("string");
/// assert_eq!(codec.decode(&"x".to_string()).into_result().unwrap(), "x");
/// assert_eq!(codec.encode(&"x".to_string()), "x");
/// ```
pub fn identity<T: Clone>(name: impl Into<String>) -> Codec<Identity<T>, Identity<T>> {
    Codec::new(name, Identity::new(), Identity::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_pipe_names() {
        let codec = string().pipe(parse_number());
        assert_eq!(codec.name(), "pipe(string, NumberFromString)");
        assert_eq!(codec.named("Num").name(), "Num");
    }

    #[test]
    fn test_compose_matches_pipe() {
        let curried = compose(parse_number()).apply(string());
        let method = string().pipe(parse_number());

        for input in [json!("1.5"), json!("x"), json!(3), json!(null)] {
            assert_eq!(
                curried.decode(&input).into_result().ok(),
                method.decode(&input).into_result().ok()
            );
        }
        assert_eq!(curried.encode(&2.0), method.encode(&2.0));
    }

    #[test]
    fn test_identity_round_trip() {
        let codec = identity::<Vec<u8>>("bytes");
        let value = vec![1, 2, 3];
        let decoded = codec.decode(&value).into_result().unwrap();
        assert_eq!(codec.encode(&decoded), value);
    }

    #[test]
    fn test_with_message_keeps_encoder() {
        let codec = number().with_message("a number, please");
        let errors = codec.decode(&json!("x")).into_result().unwrap_err();
        assert_eq!(errors.first().message.as_deref(), Some("a number, please"));
        assert_eq!(codec.encode(&1.5), json!(1.5));
    }

    #[test]
    fn test_erase_keeps_behaviour() {
        let erased: DynCodec<Value, f64, Value> = number_from_string().erase();
        assert_eq!(erased.name(), "pipe(string, NumberFromString)");
        assert_eq!(erased.decode(&json!("4")).into_result().unwrap(), 4.0);
        assert_eq!(erased.encode(&4.0), json!("4"));
    }

    #[test]
    fn test_codec_as_decoder_trait() {
        fn decode_twice<C: Decoder>(codec: &C, input: &C::Input) -> bool {
            codec.decode(input).is_success() && codec.decode(input).is_success()
        }
        assert!(decode_twice(&string(), &json!("a")));
        assert!(!decode_twice(&string(), &json!(1)));
    }

    #[test]
    fn test_is() {
        assert!(boolean().is(&json!(true)));
        assert!(!boolean().is(&json!("true")));
    }
}

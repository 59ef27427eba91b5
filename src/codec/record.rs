//! Fixed-shape object codecs.
//!
//! [`record`] takes a tuple of `(key, codec)` pairs and decodes a JSON object
//! into the tuple of the field codecs' outputs, so the decoded type follows
//! directly from the field definitions. Every field is decoded even when an
//! earlier one fails; the failures are reported in definition order.

use std::sync::Arc;

use serde_json::{Map, Value};
use stillwater::{Semigroup, Validation};

use crate::codec::{Codec, Decoder, Encoder};
use crate::context::Context;
use crate::error::failure;
use crate::DecodeResult;

/// A tuple of `(key, codec)` field definitions.
///
/// Implemented for tuples of one to eight pairs where every codec takes and
/// produces `serde_json::Value` on the outside.
pub trait Fields: Send + Sync {
    /// Tuple of the decoded field values, in definition order.
    type Output;

    /// Renders the record type, e.g. `{ name: string, age: number }`.
    fn describe(&self) -> String;

    /// Decodes each field of `object` under its own context entry.
    fn validate_fields(
        &self,
        object: &Map<String, Value>,
        context: &Context,
    ) -> DecodeResult<Self::Output>;

    /// Encodes each field, in definition order.
    fn encode_fields(&self, value: &Self::Output) -> Map<String, Value>;
}

fn decode_field<D, E>(
    key: &str,
    codec: &Codec<D, E>,
    object: &Map<String, Value>,
    context: &Context,
) -> DecodeResult<D::Output>
where
    D: Decoder<Input = Value>,
    E: Encoder<Input = D::Output, Output = Value>,
{
    // Absent keys decode as null so nullable fields double as optional ones.
    let input = object.get(key).unwrap_or(&Value::Null);
    codec.validate(input, &context.push_field(key, codec.name()))
}

/// Pairs two field results, keeping the failures of both in order.
fn zip<A, B>(left: DecodeResult<A>, right: DecodeResult<B>) -> DecodeResult<(A, B)> {
    match (left, right) {
        (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
        (Validation::Failure(e), Validation::Success(_))
        | (Validation::Success(_), Validation::Failure(e)) => Validation::Failure(e),
        (Validation::Failure(a), Validation::Failure(b)) => Validation::Failure(a.combine(b)),
    }
}

// `zip_fields!(a, b, c)` builds `zip(a, zip(b, c))`; `nest_fields!` is the
// matching pattern `(a, (b, c))`.
macro_rules! zip_fields {
    ($only:ident) => { $only };
    ($first:ident, $($rest:ident),+) => { zip($first, zip_fields!($($rest),+)) };
}

macro_rules! nest_fields {
    ($only:ident) => { $only };
    ($first:ident, $($rest:ident),+) => { ($first, nest_fields!($($rest),+)) };
}

macro_rules! impl_fields {
    ($(($idx:tt, $K:ident, $D:ident, $E:ident, $v:ident)),+) => {
        impl<$($K, $D, $E),+> Fields for ($(($K, Codec<$D, $E>),)+)
        where
            $(
                $K: AsRef<str> + Send + Sync,
                $D: Decoder<Input = Value>,
                $E: Encoder<Input = $D::Output, Output = Value>,
            )+
        {
            type Output = ($($D::Output,)+);

            fn describe(&self) -> String {
                let fields = [$(format!("{}: {}", self.$idx.0.as_ref(), self.$idx.1.name())),+];
                format!("{{ {} }}", fields.join(", "))
            }

            fn validate_fields(
                &self,
                object: &Map<String, Value>,
                context: &Context,
            ) -> DecodeResult<Self::Output> {
                $(
                    let $v = decode_field(self.$idx.0.as_ref(), &self.$idx.1, object, context);
                )+

                match zip_fields!($($v),+) {
                    Validation::Success(nest_fields!($($v),+)) => Validation::Success(($($v,)+)),
                    Validation::Failure(errors) => Validation::Failure(errors),
                }
            }

            fn encode_fields(&self, value: &Self::Output) -> Map<String, Value> {
                let mut object = Map::new();
                $(
                    object.insert(
                        self.$idx.0.as_ref().to_string(),
                        self.$idx.1.encode(&value.$idx),
                    );
                )+
                object
            }
        }
    };
}

impl_fields!((0, K0, D0, E0, v0));
impl_fields!((0, K0, D0, E0, v0), (1, K1, D1, E1, v1));
impl_fields!((0, K0, D0, E0, v0), (1, K1, D1, E1, v1), (2, K2, D2, E2, v2));
impl_fields!(
    (0, K0, D0, E0, v0),
    (1, K1, D1, E1, v1),
    (2, K2, D2, E2, v2),
    (3, K3, D3, E3, v3)
);
impl_fields!(
    (0, K0, D0, E0, v0),
    (1, K1, D1, E1, v1),
    (2, K2, D2, E2, v2),
    (3, K3, D3, E3, v3),
    (4, K4, D4, E4, v4)
);
impl_fields!(
    (0, K0, D0, E0, v0),
    (1, K1, D1, E1, v1),
    (2, K2, D2, E2, v2),
    (3, K3, D3, E3, v3),
    (4, K4, D4, E4, v4),
    (5, K5, D5, E5, v5)
);
impl_fields!(
    (0, K0, D0, E0, v0),
    (1, K1, D1, E1, v1),
    (2, K2, D2, E2, v2),
    (3, K3, D3, E3, v3),
    (4, K4, D4, E4, v4),
    (5, K5, D5, E5, v5),
    (6, K6, D6, E6, v6)
);
impl_fields!(
    (0, K0, D0, E0, v0),
    (1, K1, D1, E1, v1),
    (2, K2, D2, E2, v2),
    (3, K3, D3, E3, v3),
    (4, K4, D4, E4, v4),
    (5, K5, D5, E5, v5),
    (6, K6, D6, E6, v6),
    (7, K7, D7, E7, v7)
);

/// Decoder half of [`record`].
pub struct RecordDecoder<F> {
    fields: Arc<F>,
}

impl<F> Clone for RecordDecoder<F> {
    fn clone(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<F: Fields> Decoder for RecordDecoder<F> {
    type Input = Value;
    type Output = F::Output;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<F::Output> {
        match input.as_object() {
            Some(object) => self.fields.validate_fields(object, context),
            None => failure(input, context),
        }
    }
}

/// Encoder half of [`record`].
pub struct RecordEncoder<F> {
    fields: Arc<F>,
}

impl<F> Clone for RecordEncoder<F> {
    fn clone(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<F: Fields> Encoder for RecordEncoder<F> {
    type Input = F::Output;
    type Output = Value;

    fn encode(&self, value: &F::Output) -> Value {
        Value::Object(self.fields.encode_fields(value))
    }
}

/// A JSON object with a fixed set of fields.
///
/// Keys not listed in `fields` are ignored when decoding and absent when
/// encoding. Missing keys are decoded as `null`, so they fail unless the field
/// codec is [`nullable`](crate::nullable).
///
/// # Example
///
/// ```rust
/// use rivet::{integer, nullable, record, string};
/// use serde_json::json;
///
/// let user = record((
///     ("name", string()),
///     ("age", integer()),
///     ("email", nullable(string())),
/// ));
/// assert_eq!(user.name(), "{ name: string, age: integer, email: (string | null) }");
///
/// let (name, age, email) = user
///     .decode(&json!({"name": "Alice", "age": 30}))
///     .into_result()
///     .unwrap();
/// assert_eq!((name.as_str(), age, email), ("Alice", 30, None));
///
/// // Every failing field is reported
/// let errors = user.decode(&json!({"name": 1, "age": "x"})).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn record<F: Fields>(fields: F) -> Codec<RecordDecoder<F>, RecordEncoder<F>> {
    let name = fields.describe();
    let fields = Arc::new(fields);
    Codec::new(
        name,
        RecordDecoder {
            fields: Arc::clone(&fields),
        },
        RecordEncoder { fields },
    )
}

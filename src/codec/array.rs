//! Codecs for homogeneous JSON collections.
//!
//! This module provides [`array`] for JSON arrays and [`dictionary`] for JSON
//! objects whose values all share one codec. Both decode every element and
//! accumulate all element failures rather than stopping at the first one.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::codec::combinators::merge;
use crate::codec::{Codec, Decoder, Encoder};
use crate::context::Context;
use crate::error::failure;
use crate::DecodeResult;

/// Decoder half of [`array`].
#[derive(Debug, Clone)]
pub struct ArrayDecoder<D> {
    item: D,
    item_name: String,
}

impl<D> Decoder for ArrayDecoder<D>
where
    D: Decoder<Input = Value>,
{
    type Input = Value;
    type Output = Vec<D::Output>;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<Self::Output> {
        let items = match input.as_array() {
            Some(items) => items,
            None => return failure(input, context),
        };

        merge(items.iter().enumerate().map(|(index, item)| {
            self.item
                .validate(item, &context.push_index(index, self.item_name.as_str()))
        }))
    }
}

/// Encoder half of [`array`].
#[derive(Debug, Clone)]
pub struct ArrayEncoder<E> {
    item: E,
}

impl<E> Encoder for ArrayEncoder<E>
where
    E: Encoder<Output = Value>,
{
    type Input = Vec<E::Input>;
    type Output = Value;

    fn encode(&self, value: &Self::Input) -> Value {
        Value::Array(value.iter().map(|item| self.item.encode(item)).collect())
    }
}

/// A JSON array whose elements all decode with `item`.
///
/// Each element is decoded under a context entry for its index; failures are
/// reported in index order.
///
/// # Example
///
/// ```rust
/// use rivet::{array, number};
/// use serde_json::json;
///
/// let codec = array(number());
/// assert_eq!(codec.name(), "Array<number>");
///
/// assert_eq!(codec.decode(&json!([1, 2])).into_result().unwrap(), vec![1.0, 2.0]);
///
/// let errors = codec.decode(&json!([1, "a", true])).into_result().unwrap_err();
/// let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
/// assert_eq!(paths, vec!["[1]", "[2]"]);
/// ```
pub fn array<D, E>(item: Codec<D, E>) -> Codec<ArrayDecoder<D>, ArrayEncoder<E>>
where
    D: Decoder<Input = Value>,
    E: Encoder<Input = D::Output, Output = Value>,
{
    let (item_name, decoder, encoder) = item.into_parts();
    Codec::new(
        format!("Array<{}>", item_name),
        ArrayDecoder {
            item: decoder,
            item_name,
        },
        ArrayEncoder { item: encoder },
    )
}

/// Decoder half of [`dictionary`].
#[derive(Debug, Clone)]
pub struct DictionaryDecoder<D> {
    value: D,
    value_name: String,
}

impl<D> Decoder for DictionaryDecoder<D>
where
    D: Decoder<Input = Value>,
{
    type Input = Value;
    type Output = IndexMap<String, D::Output>;

    fn validate(&self, input: &Value, context: &Context) -> DecodeResult<Self::Output> {
        let object = match input.as_object() {
            Some(object) => object,
            None => return failure(input, context),
        };

        let decoded = merge(object.iter().map(|(key, value)| {
            self.value
                .validate(value, &context.push_field(key.as_str(), self.value_name.as_str()))
                .map(|decoded| (key.clone(), decoded))
        }));

        match decoded {
            Validation::Success(entries) => Validation::Success(entries.into_iter().collect()),
            Validation::Failure(errors) => Validation::Failure(errors),
        }
    }
}

/// Encoder half of [`dictionary`].
#[derive(Debug, Clone)]
pub struct DictionaryEncoder<E> {
    value: E,
}

impl<E> Encoder for DictionaryEncoder<E>
where
    E: Encoder<Output = Value>,
{
    type Input = IndexMap<String, E::Input>;
    type Output = Value;

    fn encode(&self, value: &Self::Input) -> Value {
        let object: Map<String, Value> = value
            .iter()
            .map(|(key, item)| (key.clone(), self.value.encode(item)))
            .collect();
        Value::Object(object)
    }
}

/// A JSON object with arbitrary keys whose values all decode with `value`.
///
/// Keys keep their input order in the decoded map.
///
/// # Example
///
/// ```rust
/// use rivet::{dictionary, integer};
/// use serde_json::json;
///
/// let codec = dictionary(integer());
///
/// let counts = codec.decode(&json!({"b": 2, "a": 1})).into_result().unwrap();
/// assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(codec.encode(&counts), json!({"b": 2, "a": 1}));
/// ```
pub fn dictionary<D, E>(value: Codec<D, E>) -> Codec<DictionaryDecoder<D>, DictionaryEncoder<E>>
where
    D: Decoder<Input = Value>,
    E: Encoder<Input = D::Output, Output = Value>,
{
    let (value_name, decoder, encoder) = value.into_parts();
    Codec::new(
        format!("Record<string, {}>", value_name),
        DictionaryDecoder {
            value: decoder,
            value_name,
        },
        DictionaryEncoder { value: encoder },
    )
}

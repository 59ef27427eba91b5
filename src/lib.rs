//! # Rivet
//!
//! Composable codecs: values that validate an external representation into a
//! typed internal one (`decode`) and turn it back again (`encode`).
//!
//! ## Overview
//!
//! A [`Codec`] pairs a [`Decoder`] with an [`Encoder`] whose input type is the
//! decoder's output type. The pairing is checked by the compiler, so codecs
//! compose without runtime type tags. Decoding never panics on bad input: every
//! rejection is a [`ValidationError`] carrying the offending value, the
//! [`Context`] path that led to it, and an optional message.
//!
//! Structural combinators ([`array`], [`record`], [`dictionary`], [`union`])
//! accumulate every failure among independent siblings, while sequential
//! composition ([`compose`], [`Codec::pipe`]) stops at the first failing stage.
//!
//! ## Core Types
//!
//! - [`Context`]: the trail of `(key, codec name)` steps to a nested value
//! - [`ValidationError`] / [`Errors`]: one failure, and a non-empty list of them
//! - [`DecodeResult`]: `Validation<A, Errors>`
//! - [`Decoder`], [`Encoder`], [`Codec`]: the algebra itself
//!
//! ## Example
//!
//! ```rust
//! use rivet::{number_from_string, string};
//! use serde_json::json;
//!
//! let codec = number_from_string();
//!
//! let result = codec.decode(&json!("10"));
//! assert!(result.is_success());
//! assert_eq!(codec.encode(&10.0), json!("10"));
//!
//! // Leaves reject with a single error at the current path
//! let result = string().decode(&json!(42));
//! assert!(result.is_failure());
//! ```

pub mod batch;
pub mod codec;
pub mod context;
pub mod error;
pub mod registry;

pub use batch::decode_all;
pub use codec::{
    array, boolean, compose, dictionary, identity, integer, integer_from_string, literal, null,
    nullable, number, number_from_string, parse_integer, parse_number, record, recursive,
    recursive_with_max_depth, string, string_matching, union, unknown, AndThen, Codec, Composer,
    Decoder, DynCodec, Either, Encoder, Fields, Identity, JsonPrimitive, Predicate, Primitive,
    RecursiveCodec, Then, DEFAULT_MAX_DEPTH,
};
pub use context::{Context, ContextEntry, PathSegment};
pub use error::{failure, report, Errors, ValidationError};
pub use registry::{CodecRegistry, RegistryError};

/// Type alias for decode results using [`Errors`].
pub type DecodeResult<T> = stillwater::Validation<T, Errors>;

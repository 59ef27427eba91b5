//! Error types for decode failures.
//!
//! This module provides types for representing decode failures with their
//! offending value, context path and optional message, plus a plain-text
//! reporter built on top of that data.

mod report;
mod validation_error;

pub use report::report;
pub use validation_error::{Errors, ValidationError};

pub(crate) use validation_error::accumulate;

use serde::Serialize;
use stillwater::Validation;

use crate::context::Context;
use crate::DecodeResult;

/// Builds a failed result holding a single error for `input` at `context`.
///
/// This is what leaf decoders return when they reject a value.
///
/// # Example
///
/// ```rust
/// use rivet::{failure, Context, DecodeResult};
/// use serde_json::json;
///
/// let result: DecodeResult<String> = failure(&json!(42), &Context::root());
/// assert!(result.is_failure());
/// ```
pub fn failure<A, T>(input: &T, context: &Context) -> DecodeResult<A>
where
    T: Serialize + ?Sized,
{
    Validation::Failure(Errors::single(ValidationError::capture(input, context)))
}

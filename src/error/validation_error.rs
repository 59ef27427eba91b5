//! Decode error types.
//!
//! This module provides [`ValidationError`] for single decode failures and
//! [`Errors`] for accumulating multiple failures.

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;
use stillwater::prelude::*;

use crate::context::Context;

/// A single decode failure.
///
/// `ValidationError` captures:
/// - **value**: the raw value that was rejected
/// - **context**: the path of `(key, codec name)` steps that led to it
/// - **message**: an optional human-readable override
///
/// # Example
///
/// ```rust
/// use rivet::{Context, ValidationError};
/// use serde_json::json;
///
/// let error = ValidationError::new(json!(42), Context::root().push_field("name", "string"))
///     .with_message("name must be text");
///
/// assert_eq!(error.value, json!(42));
/// assert_eq!(error.expected(), Some("string"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The value that failed to decode.
    pub value: Value,
    /// The path taken to reach the value.
    pub context: Context,
    /// Custom message, if the codec that failed carries one.
    pub message: Option<String>,
}

impl ValidationError {
    /// Creates a new error for an already-captured value.
    pub fn new(value: Value, context: Context) -> Self {
        Self {
            value,
            context,
            message: None,
        }
    }

    /// Creates a new error by capturing any serializable input.
    ///
    /// Inputs that cannot be represented as JSON are recorded as `null`.
    pub fn capture<T>(input: &T, context: &Context) -> Self
    where
        T: Serialize + ?Sized,
    {
        Self::new(
            serde_json::to_value(input).unwrap_or(Value::Null),
            context.clone(),
        )
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Name of the codec that rejected the value, if the context has one.
    pub fn expected(&self) -> Option<&str> {
        self.context.last().map(|entry| entry.name.as_str())
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.context.is_root() {
            "(root)".to_string()
        } else {
            self.context.to_string()
        };

        if let Some(ref message) = self.message {
            return write!(f, "{}: {}", path_str, message);
        }

        write!(f, "{}: invalid value {}", path_str, self.value)?;
        if let Some(expected) = self.expected() {
            write!(f, " (expected: {})", expected)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of decode failures.
///
/// `Errors` wraps a `NonEmptyVec<ValidationError>`, so a failed decode always
/// reports at least one error. It implements `Semigroup`, which is how
/// structural codecs merge the failures of independent children:
///
/// ```rust
/// use rivet::{Context, Errors, ValidationError};
/// use serde_json::json;
/// use stillwater::prelude::*;
///
/// let name = Errors::single(ValidationError::new(
///     json!(1),
///     Context::root().push_field("name", "string"),
/// ));
/// let age = Errors::single(ValidationError::new(
///     json!("x"),
///     Context::root().push_field("age", "number"),
/// ));
///
/// let combined = name.combine(age);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Errors(NonEmptyVec<ValidationError>);

impl Errors {
    /// Creates an `Errors` containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates an `Errors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Creates an `Errors` from a `Vec`, or `None` if the vec is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all errors whose path renders as `path` (e.g. `users[0].email`).
    pub fn at_path(&self, path: &str) -> Vec<&ValidationError> {
        self.0
            .iter()
            .filter(|e| e.context.to_string() == path)
            .collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Returns a copy of every error with its message replaced.
    pub fn with_message(self, message: &str) -> Self {
        Errors(self.0.map(|error| error.with_message(message)))
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<ValidationError> {
        &self.0
    }
}

impl Semigroup for Errors {
    fn combine(self, other: Self) -> Self {
        Errors(self.0.combine(other.0))
    }
}

impl Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decoding failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl IntoIterator for Errors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Errors>();
    assert_sync::<Errors>();
};

/// Appends `next` to an optional accumulator of errors.
pub(crate) fn accumulate(acc: Option<Errors>, next: Errors) -> Option<Errors> {
    Some(match acc {
        Some(errors) => errors.combine(next),
        None => next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(key: &str, name: &str) -> Context {
        Context::root().push_field(key, name)
    }

    #[test]
    fn test_validation_error_creation() {
        let error = ValidationError::new(json!(42), at("name", "string"));

        assert_eq!(error.value, json!(42));
        assert_eq!(error.context, at("name", "string"));
        assert!(error.message.is_none());
        assert_eq!(error.expected(), Some("string"));
    }

    #[test]
    fn test_capture_serializes_input() {
        let error = ValidationError::capture("abc", &Context::root());
        assert_eq!(error.value, json!("abc"));
        assert!(error.context.is_root());
        assert_eq!(error.expected(), None);
    }

    #[test]
    fn test_display_without_message() {
        let error = ValidationError::new(json!("x"), at("age", "number"));
        let display = error.to_string();
        assert!(display.contains("age: invalid value \"x\""));
        assert!(display.contains("expected: number"));
    }

    #[test]
    fn test_display_with_message_at_root() {
        let error =
            ValidationError::new(json!(null), Context::root()).with_message("value is null");
        assert_eq!(error.to_string(), "(root): value is null");
    }

    #[test]
    fn test_errors_single() {
        let error = ValidationError::new(json!(1), Context::root());
        let errors = Errors::single(error.clone());

        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
        assert_eq!(errors.first(), &error);
    }

    #[test]
    fn test_errors_from_empty_vec() {
        assert!(Errors::from_vec(Vec::new()).is_none());
        let errors = Errors::from_vec(vec![ValidationError::new(json!(1), Context::root())]);
        assert_eq!(errors.map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_errors_combine_preserves_order() {
        let errors = Errors::single(ValidationError::new(json!(1), at("a", "string")))
            .combine(Errors::single(ValidationError::new(json!(2), at("b", "string"))))
            .combine(Errors::single(ValidationError::new(json!(3), at("c", "string"))));

        let values: Vec<_> = errors.iter().map(|e| e.value.clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_errors_at_path() {
        let errors = Errors::single(ValidationError::new(json!(1), at("a", "string")))
            .combine(Errors::single(ValidationError::new(json!(2), at("a", "number"))))
            .combine(Errors::single(ValidationError::new(json!(3), at("b", "string"))));

        assert_eq!(errors.at_path("a").len(), 2);
        assert_eq!(errors.at_path("b").len(), 1);
        assert!(errors.at_path("c").is_empty());
    }

    #[test]
    fn test_errors_with_message() {
        let errors = Errors::single(ValidationError::new(json!(1), at("a", "string")))
            .combine(Errors::single(ValidationError::new(json!(2), at("b", "string"))))
            .with_message("bad");

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message.as_deref() == Some("bad")));
        assert_eq!(errors.first().value, json!(1));
    }

    #[test]
    fn test_errors_with_message_keeps_order_and_context() {
        let errors = Errors::from_vec(vec![
            ValidationError::new(json!(1), at("a", "string")).with_message("old"),
            ValidationError::new(json!(2), at("b", "string")),
            ValidationError::new(json!(3), at("c", "string")),
        ])
        .unwrap()
        .with_message("replaced");

        let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
        let values: Vec<_> = errors.iter().map(|e| e.value.clone()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
        assert!(errors
            .iter()
            .all(|e| e.message.as_deref() == Some("replaced")));
    }

    #[test]
    fn test_errors_display() {
        let errors = Errors::single(ValidationError::new(json!(1), at("name", "string")))
            .combine(Errors::single(
                ValidationError::new(json!("x"), at("email", "string")).with_message("invalid"),
            ));
        let display = errors.to_string();

        assert!(display.contains("2 error(s)"));
        assert!(display.contains("name: invalid value 1"));
        assert!(display.contains("email: invalid"));
    }

    #[test]
    fn test_accumulate() {
        let first = Errors::single(ValidationError::new(json!(1), Context::root()));
        let second = Errors::single(ValidationError::new(json!(2), Context::root()));

        let acc = accumulate(None, first);
        let acc = accumulate(acc, second).unwrap();
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_semigroup_associativity() {
        let e1 = Errors::single(ValidationError::new(json!(1), Context::root()));
        let e2 = Errors::single(ValidationError::new(json!(2), Context::root()));
        let e3 = Errors::single(ValidationError::new(json!(3), Context::root()));

        let left = e1.clone().combine(e2.clone()).combine(e3.clone());
        let right = e1.combine(e2.combine(e3));

        assert_eq!(left, right);
    }
}

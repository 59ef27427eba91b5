//! Plain-text rendering of decode results.

use stillwater::Validation;

use crate::error::ValidationError;
use crate::DecodeResult;

/// Renders a decode result as one line per error.
///
/// Errors carrying a custom message render as that message. Other errors
/// render as `Invalid value <json> supplied to <path>`, where the path lists
/// each `key: codec name` step joined with `/`. A successful result renders as
/// the single line `No errors!`.
///
/// # Example
///
/// ```rust
/// use rivet::{array, report, string};
/// use serde_json::json;
///
/// let result = array(string()).decode(&json!(["a", 1]));
/// assert_eq!(
///     report(&result),
///     vec!["Invalid value 1 supplied to 1: string".to_string()]
/// );
/// ```
pub fn report<A>(result: &DecodeResult<A>) -> Vec<String> {
    match result {
        Validation::Success(_) => vec!["No errors!".to_string()],
        Validation::Failure(errors) => errors.iter().map(describe).collect(),
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.clone();
    }

    let path = if error.context.is_root() {
        "(root)".to_string()
    } else {
        error
            .context
            .entries()
            .map(|entry| format!("{}: {}", entry.key, entry.name))
            .collect::<Vec<_>>()
            .join("/")
    };

    format!("Invalid value {} supplied to {}", error.value, path)
}

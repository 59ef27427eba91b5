//! Codec registry for named codec storage and lookup.
//!
//! This module provides the [`CodecRegistry`] type that stores codecs under
//! string names so JSON payloads can be normalized by a codec chosen at
//! runtime, e.g. from a message type field.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{Codec, Decoder, Encoder};
use crate::context::Context;
use crate::DecodeResult;

/// A registered codec, erased to "decode, then encode back to JSON".
pub type Normalizer = Arc<dyn Fn(&Value, &Context) -> DecodeResult<Value> + Send + Sync>;

/// Type alias for the codec storage map.
type CodecMap = Arc<RwLock<HashMap<String, Normalizer>>>;

/// A thread-safe registry of named codecs.
///
/// Any codec that decodes from and encodes to `serde_json::Value` can be
/// registered, whatever its decoded type. The registry stores it as a
/// normalizer: a successful decode is immediately encoded back, so callers
/// receive the canonical JSON form of the input or the decode errors.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can decode concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use rivet::{number_from_string, record, string, CodecRegistry};
/// use serde_json::json;
///
/// let registry = CodecRegistry::new();
/// registry
///     .register("Price", record((("sku", string()), ("amount", number_from_string()))))
///     .unwrap();
///
/// let result = registry
///     .decode("Price", &json!({"sku": "A1", "amount": " 2.50", "extra": 1}))
///     .unwrap();
///
/// assert_eq!(result.into_result().unwrap(), json!({"sku": "A1", "amount": "2.5"}));
/// ```
pub struct CodecRegistry {
    codecs: CodecMap,
}

impl CodecRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            codecs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a codec under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rivet::{string, CodecRegistry};
    ///
    /// let registry = CodecRegistry::new();
    /// registry.register("Name", string()).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("Name", string()).is_err());
    /// ```
    pub fn register<D, E>(
        &self,
        name: impl Into<String>,
        codec: Codec<D, E>,
    ) -> Result<(), RegistryError>
    where
        D: Decoder<Input = Value> + 'static,
        E: Encoder<Input = D::Output, Output = Value> + 'static,
    {
        let name = name.into();
        let mut codecs = self.codecs.write();

        if codecs.contains_key(&name) {
            tracing::debug!(name = %name, "duplicate codec registration rejected");
            return Err(RegistryError::DuplicateName(name));
        }

        let normalizer: Normalizer = Arc::new(move |value: &Value, context: &Context| {
            codec
                .validate(value, context)
                .map(|decoded| codec.encode(&decoded))
        });

        tracing::debug!(name = %name, "codec registered");
        codecs.insert(name, normalizer);
        Ok(())
    }

    /// Retrieves a registered codec by name.
    ///
    /// Returns `None` if no codec with the given name is registered.
    pub fn get(&self, name: &str) -> Option<Normalizer> {
        self.codecs.read().get(name).cloned()
    }

    /// Returns true if a codec is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.read().contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.codecs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered codecs.
    pub fn len(&self) -> usize {
        self.codecs.read().len()
    }

    /// Returns true if no codecs are registered.
    pub fn is_empty(&self) -> bool {
        self.codecs.read().is_empty()
    }

    /// Decodes `value` with the named codec and encodes the result back.
    ///
    /// Failures are attributed to paths relative to the root of `value`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::CodecNotFound` if the name isn't registered.
    /// Decode failures are not errors here; they are reported in the returned
    /// `DecodeResult`.
    pub fn decode(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<DecodeResult<Value>, RegistryError> {
        let normalizer = self.get(name).ok_or_else(|| {
            tracing::debug!(name = %name, "codec lookup missed");
            RegistryError::CodecNotFound(name.to_string())
        })?;

        // The lock is released before decoding so codecs may use the registry.
        Ok(normalizer(value, &Context::root()))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CodecRegistry {
    fn clone(&self) -> Self {
        Self {
            codecs: Arc::clone(&self.codecs),
        }
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a codec with a name that already exists.
    #[error("codec '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to decode with a codec name that doesn't exist.
    #[error("codec '{0}' not found")]
    CodecNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{integer, string};
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let registry = CodecRegistry::new();
        assert!(registry.is_empty());

        registry.register("Name", string()).unwrap();
        registry.register("Age", integer()).unwrap();

        assert!(registry.contains("Name"));
        assert!(!registry.contains("Email"));
        assert!(registry.get("Age").is_some());
        assert_eq!(registry.names(), vec!["Age", "Name"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name() {
        let registry = CodecRegistry::new();
        registry.register("Name", string()).unwrap();

        let err = registry.register("Name", integer()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("Name".to_string()));
        assert_eq!(err.to_string(), "codec 'Name' already registered");
    }

    #[test]
    fn test_unknown_name() {
        let registry = CodecRegistry::new();
        let err = registry.decode("Missing", &json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "codec 'Missing' not found");
    }

    #[test]
    fn test_decode_failure_is_not_registry_error() {
        let registry = CodecRegistry::new();
        registry.register("Age", integer()).unwrap();

        let result = registry.decode("Age", &json!("old")).unwrap();
        let errors = result.into_result().unwrap_err();
        assert_eq!(errors.first().value, json!("old"));
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = CodecRegistry::new();
        let clone = registry.clone();
        clone.register("Name", string()).unwrap();
        assert!(registry.contains("Name"));
    }
}

//! Self-referential codecs.
//!
//! [`recursive`] hands the definition a handle to the codec being defined, so
//! trees and linked structures can refer to themselves. The handle holds a
//! weak reference; only the codec returned by [`recursive`] keeps the
//! definition alive, so a self-referential codec is freed like any other.
//!
//! The nesting limit is fixed when the codec is built, with
//! [`recursive_with_max_depth`], and shared read-only with every handle.

use std::sync::{Arc, OnceLock, Weak};

use serde::Serialize;
use stillwater::Validation;

use crate::codec::{Codec, Decoder, DynCodec, Encoder};
use crate::context::Context;
use crate::error::{Errors, ValidationError};
use crate::DecodeResult;

/// Nesting limit applied when decoding through a recursive codec.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The codec returned by [`recursive`] and handed to its definition.
pub type RecursiveCodec<I, A, O> = Codec<Recursive<I, A, O>, Recursive<I, A, O>>;

struct Slot<I, A, O> {
    definition: OnceLock<DynCodec<I, A, O>>,
    max_depth: usize,
}

enum Link<I, A, O> {
    Owner(Arc<Slot<I, A, O>>),
    Handle(Weak<Slot<I, A, O>>),
}

impl<I, A, O> Clone for Link<I, A, O> {
    fn clone(&self) -> Self {
        match self {
            Link::Owner(slot) => Link::Owner(Arc::clone(slot)),
            Link::Handle(slot) => Link::Handle(Weak::clone(slot)),
        }
    }
}

/// Decoder and encoder that defer to a lazily supplied definition.
///
/// Built by [`recursive`].
pub struct Recursive<I, A, O> {
    name: String,
    link: Link<I, A, O>,
}

impl<I, A, O> Clone for Recursive<I, A, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            link: self.link.clone(),
        }
    }
}

impl<I, A, O> std::fmt::Debug for Recursive<I, A, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recursive")
            .field("name", &self.name)
            .finish()
    }
}

impl<I, A, O> Recursive<I, A, O> {
    fn resolve(&self) -> Option<Arc<Slot<I, A, O>>> {
        match &self.link {
            Link::Owner(slot) => Some(Arc::clone(slot)),
            Link::Handle(slot) => slot.upgrade(),
        }
    }
}

impl<I, A, O> Decoder for Recursive<I, A, O>
where
    I: Serialize + 'static,
    A: 'static,
    O: 'static,
{
    type Input = I;
    type Output = A;

    fn validate(&self, input: &I, context: &Context) -> DecodeResult<A> {
        match self.resolve() {
            Some(slot) => {
                if context.len() > slot.max_depth {
                    return Validation::Failure(Errors::single(
                        ValidationError::capture(input, context)
                            .with_message(format!("maximum depth {} exceeded", slot.max_depth)),
                    ));
                }

                match slot.definition.get() {
                    Some(codec) => codec.validate(input, context),
                    None => Validation::Failure(Errors::single(
                        ValidationError::capture(input, context).with_message(format!(
                            "recursive codec '{}' used before its definition completed",
                            self.name
                        )),
                    )),
                }
            }
            None => Validation::Failure(Errors::single(
                ValidationError::capture(input, context).with_message(format!(
                    "recursive codec '{}' outlived its definition",
                    self.name
                )),
            )),
        }
    }
}

impl<I, A, O> Encoder for Recursive<I, A, O>
where
    I: 'static,
    A: 'static,
    O: 'static,
{
    type Input = A;
    type Output = O;

    /// # Panics
    ///
    /// Panics if called from inside the definition closure passed to
    /// [`recursive`], or through a handle that outlived the codec returned by
    /// it. Neither happens when the codec is used after construction.
    ///
    /// Handles stay weak so the definition is freed with its codec; there is
    /// no value to encode with once it is gone.
    fn encode(&self, value: &A) -> O {
        match self.resolve() {
            Some(slot) => match slot.definition.get() {
                Some(codec) => codec.encode(value),
                None => panic!(
                    "recursive codec '{}' encoded before its definition completed",
                    self.name
                ),
            },
            None => panic!("recursive codec '{}' outlived its definition", self.name),
        }
    }
}

/// A codec whose definition refers to itself.
///
/// `definition` receives a handle codec with the same name and must return
/// the full codec, typically a structural one that uses the handle for its
/// nested positions. The handle adds no context entries of its own.
///
/// # Panics
///
/// The handle must not be used to encode inside `definition`; see
/// [`Recursive::encode`](Encoder::encode).
///
/// # Example
///
/// ```rust
/// use rivet::{array, record, recursive, string, RecursiveCodec};
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Category {
///     name: String,
///     children: Vec<Category>,
/// }
///
/// let category = recursive("Category", |category: RecursiveCodec<Value, Category, Value>| {
///     record((("name", string()), ("children", array(category))))
///         .map(
///             "Category",
///             |(name, children)| Category {
///                 name: name.clone(),
///                 children: children.clone(),
///             },
///             |c: &Category| (c.name.clone(), c.children.clone()),
///         )
///         .erase()
/// });
///
/// let input = json!({"name": "root", "children": [{"name": "leaf", "children": []}]});
/// let decoded = category.decode(&input).into_result().unwrap();
/// assert_eq!(decoded.children[0].name, "leaf");
/// assert_eq!(category.encode(&decoded), input);
///
/// let bad = json!({"name": "root", "children": [{"name": 2, "children": []}]});
/// let errors = category.decode(&bad).into_result().unwrap_err();
/// assert_eq!(errors.first().context.to_string(), "children[0].name");
/// ```
pub fn recursive<I, A, O, F>(name: impl Into<String>, definition: F) -> RecursiveCodec<I, A, O>
where
    I: Serialize + 'static,
    A: 'static,
    O: 'static,
    F: FnOnce(RecursiveCodec<I, A, O>) -> DynCodec<I, A, O>,
{
    recursive_with_max_depth(name, DEFAULT_MAX_DEPTH, definition)
}

/// Like [`recursive`], but fails any decode that goes more than `max_depth`
/// context entries deep.
///
/// The limit belongs to the returned codec and its handles. Building another
/// codec with a different limit never affects this one.
pub fn recursive_with_max_depth<I, A, O, F>(
    name: impl Into<String>,
    max_depth: usize,
    definition: F,
) -> RecursiveCodec<I, A, O>
where
    I: Serialize + 'static,
    A: 'static,
    O: 'static,
    F: FnOnce(RecursiveCodec<I, A, O>) -> DynCodec<I, A, O>,
{
    let name = name.into();
    let slot = Arc::new(Slot {
        definition: OnceLock::new(),
        max_depth,
    });

    let handle = Recursive {
        name: name.clone(),
        link: Link::Handle(Arc::downgrade(&slot)),
    };
    let defined = definition(Codec::new(name.clone(), handle.clone(), handle));

    // The slot is private and freshly created, so this is the only write.
    let _ = slot.definition.set(defined);
    tracing::trace!(codec = %name, max_depth, "recursive codec defined");

    let owner = Recursive {
        name: name.clone(),
        link: Link::Owner(slot),
    };
    Codec::new(name, owner.clone(), owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{array, nullable, number, record, string};
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Category {
        name: String,
        children: Vec<Category>,
    }

    fn category() -> RecursiveCodec<Value, Category, Value> {
        recursive("Category", |category: RecursiveCodec<Value, Category, Value>| {
            record((("name", string()), ("children", array(category))))
                .map(
                    "Category",
                    |(name, children)| Category {
                        name: name.clone(),
                        children: children.clone(),
                    },
                    |c: &Category| (c.name.clone(), c.children.clone()),
                )
                .erase()
        })
    }

    #[test]
    fn test_decodes_nested_values() {
        let input = json!({
            "name": "root",
            "children": [
                {"name": "a", "children": []},
                {"name": "b", "children": [{"name": "c", "children": []}]}
            ]
        });

        let decoded = category().decode(&input).into_result().unwrap();
        assert_eq!(decoded.children.len(), 2);
        assert_eq!(decoded.children[1].children[0].name, "c");
    }

    #[test]
    fn test_round_trip() {
        let codec = category();
        let input = json!({"name": "root", "children": [{"name": "a", "children": []}]});

        let decoded = codec.decode(&input).into_result().unwrap();
        assert_eq!(codec.encode(&decoded), input);
    }

    #[test]
    fn test_nested_failure_paths() {
        let input = json!({
            "name": "root",
            "children": [{"name": "a", "children": [{"name": 3, "children": []}]}]
        });

        let errors = category().decode(&input).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first().context.to_string(),
            "children[0].children[0].name"
        );
    }

    #[test]
    fn test_handle_adds_no_context() {
        let errors = category().decode(&json!(5)).into_result().unwrap_err();
        assert!(errors.first().context.is_root());
        assert_eq!(errors.first().value, json!(5));
    }

    fn list(max_depth: usize) -> RecursiveCodec<Value, usize, Value> {
        recursive_with_max_depth("List", max_depth, |list: RecursiveCodec<Value, usize, Value>| {
            record((("next", nullable(list)),))
                .map("List", |_| 0usize, |_: &usize| (None,))
                .erase()
        })
    }

    #[test]
    fn test_max_depth() {
        let codec = list(4);

        let shallow = json!({"next": {"next": null}});
        assert!(codec.decode(&shallow).is_success());

        let deep = json!({"next": {"next": {"next": {"next": {"next": {"next": null}}}}}});
        let errors = codec.decode(&deep).into_result().unwrap_err();
        assert!(errors
            .first()
            .message
            .as_deref()
            .is_some_and(|m| m.contains("maximum depth")));
    }

    #[test]
    fn test_depth_limit_belongs_to_each_codec() {
        let four_deep = json!({"next": {"next": {"next": {"next": null}}}});
        let original = list(DEFAULT_MAX_DEPTH);
        let copy = original.clone();
        assert!(original.decode(&four_deep).is_success());

        let strict = list(1);
        assert!(strict.decode(&four_deep).is_failure());

        assert!(original.decode(&four_deep).is_success());
        assert!(copy.decode(&four_deep).is_success());
    }

    #[test]
    fn test_decode_inside_definition_fails_cleanly() {
        let codec = recursive("Early", |early: RecursiveCodec<Value, f64, Value>| {
            assert!(early.decode(&json!(1)).is_failure());
            number().map("Early", |n| *n, |n: &f64| *n).erase()
        });
        assert!(codec.decode(&json!(1)).is_success());
    }

    #[test]
    fn test_handle_does_not_keep_definition_alive() {
        let mut kept = None;
        let codec = recursive("Leaf", |leaf: RecursiveCodec<Value, f64, Value>| {
            kept = Some(leaf);
            number().erase()
        });
        drop(codec);

        let handle = kept.unwrap();
        let errors = handle.decode(&json!(1)).into_result().unwrap_err();
        assert!(errors
            .first()
            .message
            .as_deref()
            .is_some_and(|m| m.contains("outlived")));
    }

    #[test]
    #[should_panic(expected = "outlived its definition")]
    fn test_encode_through_dangling_handle_panics() {
        let mut kept = None;
        let codec = recursive("Leaf", |leaf: RecursiveCodec<Value, f64, Value>| {
            kept = Some(leaf);
            number().erase()
        });
        assert_eq!(codec.encode(&1.0), json!(1.0));
        drop(codec);

        if let Some(handle) = kept {
            handle.encode(&1.0);
        }
    }
}

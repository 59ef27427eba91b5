//! Decode contexts for locating failures in nested structures.
//!
//! This module provides [`Context`], [`ContextEntry`] and [`PathSegment`].
//! A context records every step a decode took on its way to a nested value:
//! which key or index it followed and which codec it handed the value to.

use std::fmt::{self, Display};

/// The key followed by one step of a decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g., `user`, `email`)
    Field(String),
    /// An array index or union member position (e.g., `[0]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// One step of a decode: the key that was followed and the codec that
/// received the value found there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextEntry {
    /// The key or index that was followed.
    pub key: PathSegment,
    /// Name of the codec the nested value was handed to.
    pub name: String,
}

/// The path a decode took to reach a value.
///
/// Contexts are never mutated. Extending one returns a new context, so two
/// sibling branches of the same decode (two fields of a record, two members of
/// a union) never see each other's entries.
///
/// # Example
///
/// ```rust
/// use rivet::Context;
///
/// let context = Context::root()
///     .push_field("users", "Array<User>")
///     .push_index(0, "User")
///     .push_field("email", "string");
///
/// assert_eq!(context.to_string(), "users[0].email");
/// assert_eq!(context.last().map(|e| e.name.as_str()), Some("string"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Context {
    entries: Vec<ContextEntry>,
}

impl Context {
    /// Creates an empty context, the one every top-level `decode` starts from.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new context with an entry appended.
    ///
    /// This method does not modify the original context; it returns a new one.
    pub fn push(&self, key: PathSegment, name: impl Into<String>) -> Self {
        let mut entries = self.entries.clone();
        entries.push(ContextEntry {
            key,
            name: name.into(),
        });
        Self { entries }
    }

    /// Returns a new context with a field entry appended.
    pub fn push_field(&self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.push(PathSegment::Field(key.into()), name)
    }

    /// Returns a new context with an index entry appended.
    pub fn push_index(&self, index: usize, name: impl Into<String>) -> Self {
        self.push(PathSegment::Index(index), name)
    }

    /// Returns true if this is the root context (no entries).
    pub fn is_root(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries in this context.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this context has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, outermost first.
    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    /// Returns an iterator over the keys followed, outermost first.
    pub fn keys(&self) -> impl Iterator<Item = &PathSegment> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Returns the context one step up, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.entries.is_empty() {
            None
        } else {
            Some(Self {
                entries: self.entries[..self.entries.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the innermost entry, or None if this is root.
    pub fn last(&self) -> Option<&ContextEntry> {
        self.entries.last()
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            match &entry.key {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

//! Member and Field Registries
//!
//! `MemberRegistry` is the insertion-ordered store behind every member
//! kind on a class emitter. It enforces no name uniqueness; duplicate
//! member names are the caller's responsibility. `FieldRegistry` is the
//! one name-keyed store: case-insensitive, last-write-wins, and the only
//! deliberately lenient lookup in the engine (an empty name is "not
//! found", never an error).

use rustc_hash::FxHashMap;

use crate::members::FieldReference;

/// Insertion-ordered collection of member emitters
#[derive(Debug, Default)]
pub struct MemberRegistry<T> {
    entries: Vec<T>,
}

impl<T> MemberRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry and return its index
    pub fn add(&mut self, entry: T) -> usize {
        let index = self.entries.len();
        self.entries.push(entry);
        index
    }

    /// Get an entry by index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Get a mutable entry by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Iterate entries mutably in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }
}

/// Case-insensitive field store with last-write-wins semantics
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: FxHashMap<String, FieldReference>,
}

impl FieldRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            fields: FxHashMap::default(),
        }
    }

    /// Register a field; an existing entry under the same case-folded
    /// name is overwritten
    pub fn insert(&mut self, field: FieldReference) {
        self.fields.insert(field.name.to_lowercase(), field);
    }

    /// Look up a field by name, ignoring case; an empty name is simply
    /// not found
    pub fn get(&self, name: &str) -> Option<&FieldReference> {
        if name.is_empty() {
            return None;
        }
        self.fields.get(&name.to_lowercase())
    }

    /// Whether a field with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether any registered field carries this token
    pub fn contains_token(&self, token: usize) -> bool {
        self.fields.values().any(|f| f.token == token)
    }

    /// Iterate every current entry exactly once
    pub fn values(&self) -> impl Iterator<Item = &FieldReference> {
        self.fields.values()
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

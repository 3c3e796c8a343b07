//! Custom Metadata Entries
//!
//! An `AttributeEntry` records one custom attribute to be stamped onto a
//! type, field, or property declaration: the attribute type plus its
//! positional and named construction values. The assembly engine stores
//! entries in declaration order and copies them verbatim onto sealed
//! descriptors; it never evaluates them.

use crate::type_ref::TypeRef;

/// A value carried inside a custom metadata entry
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
    /// A type reference value
    Type(TypeRef),
}

/// One custom attribute attached to a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    /// The attribute type being applied
    pub attribute_type: TypeRef,
    /// Positional construction values, in order
    pub positional: Vec<MetadataValue>,
    /// Named construction values, in declaration order
    pub named: Vec<(String, MetadataValue)>,
}

impl AttributeEntry {
    /// Create an entry with no construction values
    pub fn new(attribute_type: TypeRef) -> Self {
        Self {
            attribute_type,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Append a positional value
    pub fn with_value(mut self, value: MetadataValue) -> Self {
        self.positional.push(value);
        self
    }

    /// Append a named value
    pub fn with_named(mut self, name: &str, value: MetadataValue) -> Self {
        self.named.push((name.to_string(), value));
        self
    }
}

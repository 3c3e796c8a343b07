//! Meta-Method Model
//!
//! A `MetaMethod` describes one accessor method to be generated later:
//! the name it will carry on the proxy type, the external signature it
//! mirrors, and its attribute flags. The name can be switched to the
//! explicit-implementation form exactly once; repeating the switch is a
//! no-op.

use facade_core::{MethodAttributes, MethodDescriptor, TypeRef};

/// Descriptor of one accessor method awaiting generation
#[derive(Debug, Clone)]
pub struct MetaMethod {
    name: String,
    source: MethodDescriptor,
    attributes: MethodAttributes,
    explicit: bool,
}

impl MetaMethod {
    /// Create a meta-method mirroring an external signature
    pub fn new(source: MethodDescriptor) -> Self {
        Self {
            name: source.name.clone(),
            attributes: source.attributes,
            source,
            explicit: false,
        }
    }

    /// Create a meta-method with an attribute set differing from the source
    pub fn with_attributes(source: MethodDescriptor, attributes: MethodAttributes) -> Self {
        Self {
            name: source.name.clone(),
            attributes,
            source,
            explicit: false,
        }
    }

    /// Name the generated method will carry
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The external signature this accessor mirrors; rename does not
    /// touch it
    pub fn source(&self) -> &MethodDescriptor {
        &self.source
    }

    /// Declaring type of the mirrored signature
    pub fn declaring_type(&self) -> &TypeRef {
        &self.source.declaring_type
    }

    /// Attribute flags the generated method will carry
    pub fn attributes(&self) -> MethodAttributes {
        self.attributes
    }

    /// Whether the name has been switched to explicit-implementation form
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Switch the name to the explicit-implementation form
    /// `DeclaringType.Name`, qualified by the declaring type of the
    /// mirrored signature. Idempotent; only the first call renames.
    pub fn switch_to_explicit_implementation(&mut self) {
        if self.explicit {
            return;
        }
        self.name = format!("{}.{}", self.source.declaring_type.name, self.name);
        self.explicit = true;
    }
}

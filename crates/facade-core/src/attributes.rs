//! Member Attribute Flags
//!
//! Bitflag sets describing visibility and binding modifiers for types and
//! their members. Emitters take these at declaration time and carry them
//! unchanged into the sealed descriptors.

use bitflags::bitflags;

bitflags! {
    /// Flags for a type under construction
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TypeAttributes: u32 {
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const ABSTRACT  = 1 << 2;
        const SEALED    = 1 << 3;
        const INTERFACE = 1 << 4;
    }
}

bitflags! {
    /// Flags for constructors, methods, and accessor methods
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodAttributes: u32 {
        const PUBLIC       = 1 << 0;
        const PRIVATE      = 1 << 1;
        const PROTECTED    = 1 << 2;
        const STATIC       = 1 << 3;
        const VIRTUAL      = 1 << 4;
        const ABSTRACT     = 1 << 5;
        const FINAL        = 1 << 6;
        /// Hidden from casual name lookup; overload resolution sees the signature
        const HIDE_BY_SIG  = 1 << 7;
        /// Accessor methods (get_/set_/add_/remove_) carry this marker
        const SPECIAL_NAME = 1 << 8;
    }
}

impl MethodAttributes {
    /// Default attribute set for generated proxy methods
    pub const DEFAULT_VIRTUAL: MethodAttributes = MethodAttributes::PUBLIC
        .union(MethodAttributes::VIRTUAL)
        .union(MethodAttributes::HIDE_BY_SIG);
}

bitflags! {
    /// Flags for fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldAttributes: u32 {
        const PUBLIC         = 1 << 0;
        const PRIVATE        = 1 << 1;
        const PROTECTED      = 1 << 2;
        const STATIC         = 1 << 3;
        const READONLY       = 1 << 4;
        /// Excluded from serialization of proxy instances
        const NOT_SERIALIZED = 1 << 5;
    }
}

bitflags! {
    /// Flags for properties
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropertyAttributes: u32 {
        const NONE         = 0;
        const SPECIAL_NAME = 1 << 0;
    }
}

bitflags! {
    /// Flags for events
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventAttributes: u32 {
        const NONE         = 0;
        const SPECIAL_NAME = 1 << 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_virtual_set() {
        let attrs = MethodAttributes::DEFAULT_VIRTUAL;
        assert!(attrs.contains(MethodAttributes::PUBLIC));
        assert!(attrs.contains(MethodAttributes::VIRTUAL));
        assert!(attrs.contains(MethodAttributes::HIDE_BY_SIG));
        assert!(!attrs.contains(MethodAttributes::STATIC));
    }

    #[test]
    fn test_static_field_or() {
        let attrs = FieldAttributes::PUBLIC | FieldAttributes::STATIC;
        assert!(attrs.contains(FieldAttributes::STATIC));
        assert!(attrs.contains(FieldAttributes::PUBLIC));
    }
}

//! Type References
//!
//! `TypeRef` is the immutable description of a type as seen by the
//! assembly engine: a concrete class or interface, a primitive, an array,
//! or an unbound generic parameter waiting to be substituted. Types under
//! construction are *not* `TypeRef`s; they become one only after sealing.

use std::fmt;

/// Type kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Primitive types (number, boolean, string, void, ...)
    Primitive,
    /// Class types
    Class,
    /// Interface types
    Interface,
    /// Array types
    Array,
    /// An unbound generic parameter (e.g. `T`)
    GenericParam,
}

/// Immutable description of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Type kind
    pub kind: TypeKind,
    /// Simple type name (without generic arguments)
    pub name: String,
    /// Element type (for arrays)
    pub element_type: Option<Box<TypeRef>>,
    /// Generic arguments; entries may themselves be unbound parameters
    pub generic_args: Vec<TypeRef>,
    /// Position in the declaring parameter list (for generic parameters)
    pub position: Option<usize>,
}

impl TypeRef {
    /// Create a primitive type reference
    pub fn primitive(name: &str) -> Self {
        Self {
            kind: TypeKind::Primitive,
            name: name.to_string(),
            element_type: None,
            generic_args: Vec::new(),
            position: None,
        }
    }

    /// Create a class type reference
    pub fn class(name: &str) -> Self {
        Self {
            kind: TypeKind::Class,
            name: name.to_string(),
            element_type: None,
            generic_args: Vec::new(),
            position: None,
        }
    }

    /// Create an interface type reference
    pub fn interface(name: &str) -> Self {
        Self {
            kind: TypeKind::Interface,
            name: name.to_string(),
            element_type: None,
            generic_args: Vec::new(),
            position: None,
        }
    }

    /// Create an array type reference
    pub fn array(element_type: TypeRef) -> Self {
        Self {
            kind: TypeKind::Array,
            name: format!("{}[]", element_type.name),
            element_type: Some(Box::new(element_type)),
            generic_args: Vec::new(),
            position: None,
        }
    }

    /// Create an unbound generic parameter placeholder
    pub fn generic_param(name: &str, position: usize) -> Self {
        Self {
            kind: TypeKind::GenericParam,
            name: name.to_string(),
            element_type: None,
            generic_args: Vec::new(),
            position: Some(position),
        }
    }

    /// Attach generic arguments, producing a constructed generic type
    pub fn with_generic_args(mut self, args: Vec<TypeRef>) -> Self {
        self.generic_args = args;
        self
    }

    /// The `void` pseudo-type used for method return slots
    pub fn void() -> Self {
        Self::primitive("void")
    }

    /// Whether this reference is an unbound generic parameter
    pub fn is_generic_parameter(&self) -> bool {
        self.kind == TypeKind::GenericParam
    }

    /// Whether this reference carries generic arguments
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Render the full display name, including generic arguments
    pub fn display_name(&self) -> String {
        if self.generic_args.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.generic_args.iter().map(|a| a.display_name()).collect();
        format!("{}<{}>", self.name, args.join(","))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_ref() {
        let ty = TypeRef::primitive("number");
        assert_eq!(ty.kind, TypeKind::Primitive);
        assert_eq!(ty.name, "number");
        assert!(!ty.is_generic());
        assert!(!ty.is_generic_parameter());
    }

    #[test]
    fn test_array_type_ref() {
        let ty = TypeRef::array(TypeRef::primitive("string"));
        assert_eq!(ty.kind, TypeKind::Array);
        assert_eq!(ty.name, "string[]");
        assert_eq!(ty.element_type.as_ref().unwrap().name, "string");
    }

    #[test]
    fn test_generic_param_placeholder() {
        let ty = TypeRef::generic_param("T", 0);
        assert!(ty.is_generic_parameter());
        assert_eq!(ty.position, Some(0));
    }

    #[test]
    fn test_display_name_with_args() {
        let ty = TypeRef::class("Map").with_generic_args(vec![
            TypeRef::primitive("string"),
            TypeRef::generic_param("V", 1),
        ]);
        assert!(ty.is_generic());
        assert_eq!(ty.display_name(), "Map<string,V>");
    }

    #[test]
    fn test_equality_includes_kind() {
        assert_eq!(TypeRef::class("Foo"), TypeRef::class("Foo"));
        assert_ne!(TypeRef::class("Foo"), TypeRef::interface("Foo"));
    }
}

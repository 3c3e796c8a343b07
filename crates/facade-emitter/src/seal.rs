//! Sealing Boundary
//!
//! Finalization ends with a one-time seal: the assembled descriptor is
//! handed to a `TypeHost`, the injected environment responsible for
//! turning it into a loadable type. The host is also the authority on
//! whether a debugger is attached, which drives the diagnostic
//! translation of one recognized sealing fault.

use thiserror::Error;

use facade_core::{AttributeEntry, TypeAttributes, TypeKind, TypeRef};

use crate::members::{SealedConstructor, SealedEvent, SealedField, SealedMethod, SealedProperty};

/// Native fault code raised by the recognized debugger defect when
/// sealing generic type definitions with constrained generic method
/// parameters
pub const SEAL_FAULT_GENERIC_CONSTRAINT: u32 = 0x8007_000B;

/// Environment-level sealing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    /// The host rejected the type image
    #[error("bad image format (native code {code:#010X})")]
    BadImage { code: u32 },

    /// Any other host-side failure
    #[error("{0}")]
    Host(String),
}

/// Immutable descriptor of a sealed, instantiable type
#[derive(Debug, Clone)]
pub struct SealedType {
    /// Type name
    pub name: String,
    /// Type attribute flags
    pub attributes: TypeAttributes,
    /// Base type, absent for interfaces and root classes
    pub base_type: Option<TypeRef>,
    /// Generic parameter placeholders, in declaration order
    pub generic_parameters: Vec<TypeRef>,
    /// Declared fields
    pub fields: Vec<SealedField>,
    /// Declared properties, in registration order
    pub properties: Vec<SealedProperty>,
    /// Declared events, in registration order
    pub events: Vec<SealedEvent>,
    /// Declared constructors, in registration order
    pub constructors: Vec<SealedConstructor>,
    /// Declared methods, in registration order
    pub methods: Vec<SealedMethod>,
    /// Type-level custom metadata entries
    pub custom_attributes: Vec<AttributeEntry>,
    /// Nested sealed types, in registration order
    pub nested: Vec<SealedType>,
}

impl SealedType {
    /// Whether the sealed definition is an interface
    pub fn is_interface(&self) -> bool {
        self.attributes.contains(TypeAttributes::INTERFACE)
    }

    /// Whether this is a generic type definition
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Number of declared constructors, type initializer excluded
    pub fn constructor_count(&self) -> usize {
        self.constructors
            .iter()
            .filter(|c| !c.is_type_initializer)
            .count()
    }

    /// Render the display name, including generic parameters
    pub fn display_name(&self) -> String {
        self.type_ref().display_name()
    }

    /// A type reference to the sealed type
    pub fn type_ref(&self) -> TypeRef {
        let mut ty = TypeRef {
            kind: if self.is_interface() {
                TypeKind::Interface
            } else {
                TypeKind::Class
            },
            name: self.name.clone(),
            element_type: None,
            generic_args: Vec::new(),
            position: None,
        };
        ty.generic_args = self.generic_parameters.clone();
        ty
    }
}

/// Injected environment that performs the final seal
pub trait TypeHost {
    /// Turn the assembled descriptor into a loadable type
    fn seal(&mut self, sealed: SealedType) -> Result<SealedType, SealError>;

    /// Whether a debugger is attached to the hosting process
    fn debugger_attached(&self) -> bool {
        false
    }
}

/// Default host: sealing is a pure acceptance step
#[derive(Debug, Default)]
pub struct InProcessHost;

impl TypeHost for InProcessHost {
    fn seal(&mut self, sealed: SealedType) -> Result<SealedType, SealError> {
        Ok(sealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_sealed(attributes: TypeAttributes) -> SealedType {
        SealedType {
            name: "Probe".to_string(),
            attributes,
            base_type: None,
            generic_parameters: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            custom_attributes: Vec::new(),
            nested: Vec::new(),
        }
    }

    #[test]
    fn test_in_process_host_accepts() {
        let mut host = InProcessHost;
        let sealed = host.seal(empty_sealed(TypeAttributes::PUBLIC)).unwrap();
        assert_eq!(sealed.name, "Probe");
        assert!(!host.debugger_attached());
    }

    #[test]
    fn test_interface_flag() {
        let sealed = empty_sealed(TypeAttributes::PUBLIC | TypeAttributes::INTERFACE);
        assert!(sealed.is_interface());
        assert_eq!(sealed.type_ref().kind, TypeKind::Interface);
    }

    #[test]
    fn test_display_name_with_generics() {
        let mut sealed = empty_sealed(TypeAttributes::PUBLIC);
        sealed.generic_parameters = vec![
            TypeRef::generic_param("T", 0),
            TypeRef::generic_param("U", 1),
        ];
        assert!(sealed.is_generic_definition());
        assert_eq!(sealed.display_name(), "Probe<T,U>");
    }
}

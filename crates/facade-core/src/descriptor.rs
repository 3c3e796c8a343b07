//! External Method Signatures
//!
//! `MethodDescriptor` describes a method that already exists outside the
//! type under construction, typically on a source interface or base type
//! being proxied. Emitters consume descriptors when copying generic
//! parameters and when resolving generic arguments; they never mutate
//! them.

use crate::attributes::MethodAttributes;
use crate::type_ref::TypeRef;

/// Signature of an externally declared method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// The type that declares this method
    pub declaring_type: TypeRef,
    /// Return type
    pub return_type: TypeRef,
    /// Parameter types in order
    pub parameters: Vec<TypeRef>,
    /// Generic parameter names declared by the method itself
    pub generic_parameters: Vec<String>,
    /// Declared attribute flags
    pub attributes: MethodAttributes,
}

impl MethodDescriptor {
    /// Create a descriptor with no parameters and a void return
    pub fn new(name: &str, declaring_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            declaring_type,
            return_type: TypeRef::void(),
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            attributes: MethodAttributes::DEFAULT_VIRTUAL,
        }
    }

    /// Set the return type
    pub fn returns(mut self, return_type: TypeRef) -> Self {
        self.return_type = return_type;
        self
    }

    /// Append a parameter type
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    /// Declare a generic parameter on the method
    pub fn with_generic_param(mut self, name: &str) -> Self {
        self.generic_parameters.push(name.to_string());
        self
    }

    /// Set the attribute flags
    pub fn with_attributes(mut self, attributes: MethodAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether the method declares its own generic parameters
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// The method's generic arguments as unbound placeholder references
    pub fn generic_arguments(&self) -> Vec<TypeRef> {
        self.generic_parameters
            .iter()
            .enumerate()
            .map(|(i, name)| TypeRef::generic_param(name, i))
            .collect()
    }
}

/// A positional argument slot in a signature being declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentReference {
    /// Argument type
    pub ty: TypeRef,
    /// Position in the parameter list; assigned by `initialize_arguments`
    pub position: usize,
}

impl ArgumentReference {
    /// Create an argument slot with an unassigned position
    pub fn new(ty: TypeRef) -> Self {
        Self { ty, position: 0 }
    }
}

/// Assign positions to argument slots and collect their type list
pub fn initialize_arguments(args: &mut [ArgumentReference]) -> Vec<TypeRef> {
    for (i, arg) in args.iter_mut().enumerate() {
        arg.position = i;
    }
    args.iter().map(|a| a.ty.clone()).collect()
}

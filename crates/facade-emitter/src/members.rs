//! Member Emitters
//!
//! One emitter per declared member, each owning its code block and
//! satisfying the same capability: `ensure_valid` (body-shape check,
//! possibly synthesizing the default body) followed by `generate`
//! (materialize the member into an immutable sealed record). The class
//! emitter drives these in a fixed order during finalization; nothing
//! here inspects body contents beyond the shape check.

use facade_core::{
    initialize_arguments, ArgumentReference, AttributeEntry, EventAttributes, FieldAttributes,
    MethodAttributes, PropertyAttributes, TypeRef,
};

use crate::code::{opcode, CodeBlock};
use crate::error::{EmitError, EmitResult};

/// Validate-then-generate capability shared by every member kind
pub trait MemberEmitter {
    /// The immutable record produced at generation time
    type Sealed;

    /// Body-shape sanity check; may synthesize a default body
    fn ensure_valid(&mut self) -> EmitResult<()>;

    /// Materialize the member into its sealed record
    fn generate(&self) -> Self::Sealed;
}

/// Reference to a field declared on a type under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    /// Identity token scoped to the declaring emitter
    pub(crate) token: usize,
    /// Field name
    pub name: String,
    /// Declared field type
    pub ty: TypeRef,
    /// Declared attribute flags
    pub attributes: FieldAttributes,
}

impl FieldReference {
    /// Whether the field is static
    pub fn is_static(&self) -> bool {
        self.attributes.contains(FieldAttributes::STATIC)
    }
}

/// Sealed field record
#[derive(Debug, Clone)]
pub struct SealedField {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeRef,
    /// Attribute flags
    pub attributes: FieldAttributes,
    /// Custom metadata entries, in attachment order
    pub custom_attributes: Vec<AttributeEntry>,
}

/// Sealed constructor record
#[derive(Debug, Clone)]
pub struct SealedConstructor {
    /// Parameter types in order
    pub parameters: Vec<TypeRef>,
    /// Attribute flags
    pub attributes: MethodAttributes,
    /// Whether this is the type initializer
    pub is_type_initializer: bool,
    /// Generated body
    pub bytecode: Vec<u8>,
}

/// Sealed method record
#[derive(Debug, Clone)]
pub struct SealedMethod {
    /// Method name
    pub name: String,
    /// Attribute flags
    pub attributes: MethodAttributes,
    /// Return type
    pub return_type: TypeRef,
    /// Parameter types in order
    pub parameters: Vec<TypeRef>,
    /// Generated body
    pub bytecode: Vec<u8>,
}

/// Sealed property record
#[derive(Debug, Clone)]
pub struct SealedProperty {
    /// Property name
    pub name: String,
    /// Attribute flags
    pub attributes: PropertyAttributes,
    /// Value type
    pub ty: TypeRef,
    /// Getter accessor, when declared
    pub getter: Option<SealedMethod>,
    /// Setter accessor, when declared
    pub setter: Option<SealedMethod>,
    /// Custom metadata entries, in attachment order
    pub custom_attributes: Vec<AttributeEntry>,
}

/// Sealed event record
#[derive(Debug, Clone)]
pub struct SealedEvent {
    /// Event name
    pub name: String,
    /// Attribute flags
    pub attributes: EventAttributes,
    /// Handler type
    pub ty: TypeRef,
    /// Add accessor, when declared
    pub add_method: Option<SealedMethod>,
    /// Remove accessor, when declared
    pub remove_method: Option<SealedMethod>,
}

/// Emitter for one constructor declaration
#[derive(Debug)]
pub struct ConstructorEmitter {
    args: Vec<ArgumentReference>,
    attributes: MethodAttributes,
    is_type_initializer: bool,
    code: CodeBlock,
}

impl ConstructorEmitter {
    /// Create an instance constructor over the given argument slots
    pub fn new(mut args: Vec<ArgumentReference>) -> Self {
        initialize_arguments(&mut args);
        Self {
            args,
            attributes: MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG,
            is_type_initializer: false,
            code: CodeBlock::new(),
        }
    }

    /// Create the one-time static type initializer
    pub fn type_initializer() -> Self {
        Self {
            args: Vec::new(),
            attributes: MethodAttributes::PRIVATE
                | MethodAttributes::STATIC
                | MethodAttributes::SPECIAL_NAME,
            is_type_initializer: true,
            code: CodeBlock::new(),
        }
    }

    /// Declared argument slots
    pub fn arguments(&self) -> &[ArgumentReference] {
        &self.args
    }

    /// Whether this is the type initializer
    pub fn is_type_initializer(&self) -> bool {
        self.is_type_initializer
    }

    /// Body under construction
    pub fn code_mut(&mut self) -> &mut CodeBlock {
        &mut self.code
    }
}

impl MemberEmitter for ConstructorEmitter {
    type Sealed = SealedConstructor;

    fn ensure_valid(&mut self) -> EmitResult<()> {
        // An untouched constructor body defaults to a base-call chain.
        if self.code.is_empty() && !self.is_type_initializer {
            self.code.emit(opcode::LOAD_THIS);
            self.code.emit(opcode::CALL_BASE);
            self.code.emit_return_void();
        }
        let member = if self.is_type_initializer {
            "type initializer".to_string()
        } else {
            "constructor".to_string()
        };
        self.code.ensure_valid(&member)
    }

    fn generate(&self) -> SealedConstructor {
        SealedConstructor {
            parameters: self.args.iter().map(|a| a.ty.clone()).collect(),
            attributes: self.attributes,
            is_type_initializer: self.is_type_initializer,
            bytecode: self.code.bytecode().to_vec(),
        }
    }
}

/// Emitter for one method declaration
#[derive(Debug)]
pub struct MethodEmitter {
    name: String,
    attributes: MethodAttributes,
    return_type: TypeRef,
    parameters: Vec<TypeRef>,
    code: CodeBlock,
}

impl MethodEmitter {
    /// Create a method emitter from the canonical declaration form
    pub fn new(
        name: &str,
        attributes: MethodAttributes,
        return_type: TypeRef,
        parameters: &[TypeRef],
    ) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            return_type,
            parameters: parameters.to_vec(),
            code: CodeBlock::new(),
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attribute flags
    pub fn attributes(&self) -> MethodAttributes {
        self.attributes
    }

    /// Declared return type
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Declared parameter types
    pub fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    /// Body under construction
    pub fn code_mut(&mut self) -> &mut CodeBlock {
        &mut self.code
    }
}

impl MemberEmitter for MethodEmitter {
    type Sealed = SealedMethod;

    fn ensure_valid(&mut self) -> EmitResult<()> {
        self.code.ensure_valid(&format!("method '{}'", self.name))
    }

    fn generate(&self) -> SealedMethod {
        SealedMethod {
            name: self.name.clone(),
            attributes: self.attributes,
            return_type: self.return_type.clone(),
            parameters: self.parameters.clone(),
            bytecode: self.code.bytecode().to_vec(),
        }
    }
}

/// Emitter for one property declaration, owning its accessor emitters
#[derive(Debug)]
pub struct PropertyEmitter {
    name: String,
    attributes: PropertyAttributes,
    ty: TypeRef,
    getter: Option<MethodEmitter>,
    setter: Option<MethodEmitter>,
    custom_attributes: Vec<AttributeEntry>,
}

impl PropertyEmitter {
    /// Create a property emitter
    pub fn new(name: &str, attributes: PropertyAttributes, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            ty,
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type
    pub fn property_type(&self) -> &TypeRef {
        &self.ty
    }

    /// Declare the getter accessor under the conventional `get_` name;
    /// at most one per property
    pub fn create_get_method(
        &mut self,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        let name = format!("get_{}", self.name);
        self.create_get_method_named(&name, attributes)
    }

    /// Declare the getter accessor under an explicit name
    pub fn create_get_method_named(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        if self.getter.is_some() {
            return Err(EmitError::AccessorExists {
                member: format!("property '{}'", self.name),
                accessor: "get",
            });
        }
        let emitter = MethodEmitter::new(
            name,
            attributes | MethodAttributes::SPECIAL_NAME,
            self.ty.clone(),
            &[],
        );
        Ok(self.getter.insert(emitter))
    }

    /// Declare the setter accessor under the conventional `set_` name;
    /// at most one per property
    pub fn create_set_method(
        &mut self,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        let name = format!("set_{}", self.name);
        self.create_set_method_named(&name, attributes)
    }

    /// Declare the setter accessor under an explicit name
    pub fn create_set_method_named(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        if self.setter.is_some() {
            return Err(EmitError::AccessorExists {
                member: format!("property '{}'", self.name),
                accessor: "set",
            });
        }
        let emitter = MethodEmitter::new(
            name,
            attributes | MethodAttributes::SPECIAL_NAME,
            TypeRef::void(),
            std::slice::from_ref(&self.ty),
        );
        Ok(self.setter.insert(emitter))
    }

    /// Getter emitter, when declared
    pub fn get_method_mut(&mut self) -> Option<&mut MethodEmitter> {
        self.getter.as_mut()
    }

    /// Setter emitter, when declared
    pub fn set_method_mut(&mut self) -> Option<&mut MethodEmitter> {
        self.setter.as_mut()
    }

    /// Attach a custom metadata entry
    pub fn define_custom_attribute(&mut self, entry: AttributeEntry) {
        self.custom_attributes.push(entry);
    }
}

impl MemberEmitter for PropertyEmitter {
    type Sealed = SealedProperty;

    fn ensure_valid(&mut self) -> EmitResult<()> {
        if let Some(getter) = &mut self.getter {
            getter.ensure_valid()?;
        }
        if let Some(setter) = &mut self.setter {
            setter.ensure_valid()?;
        }
        Ok(())
    }

    fn generate(&self) -> SealedProperty {
        SealedProperty {
            name: self.name.clone(),
            attributes: self.attributes,
            ty: self.ty.clone(),
            getter: self.getter.as_ref().map(MethodEmitter::generate),
            setter: self.setter.as_ref().map(MethodEmitter::generate),
            custom_attributes: self.custom_attributes.clone(),
        }
    }
}

/// Emitter for one event declaration, owning its accessor emitters
#[derive(Debug)]
pub struct EventEmitter {
    name: String,
    attributes: EventAttributes,
    ty: TypeRef,
    add_method: Option<MethodEmitter>,
    remove_method: Option<MethodEmitter>,
}

impl EventEmitter {
    /// Create an event emitter
    pub fn new(name: &str, attributes: EventAttributes, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            ty,
            add_method: None,
            remove_method: None,
        }
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the add accessor; at most one per event
    pub fn create_add_method(
        &mut self,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        if self.add_method.is_some() {
            return Err(EmitError::AccessorExists {
                member: format!("event '{}'", self.name),
                accessor: "add",
            });
        }
        let emitter = MethodEmitter::new(
            &format!("add_{}", self.name),
            attributes | MethodAttributes::SPECIAL_NAME,
            TypeRef::void(),
            std::slice::from_ref(&self.ty),
        );
        Ok(self.add_method.insert(emitter))
    }

    /// Declare the remove accessor; at most one per event
    pub fn create_remove_method(
        &mut self,
        attributes: MethodAttributes,
    ) -> EmitResult<&mut MethodEmitter> {
        if self.remove_method.is_some() {
            return Err(EmitError::AccessorExists {
                member: format!("event '{}'", self.name),
                accessor: "remove",
            });
        }
        let emitter = MethodEmitter::new(
            &format!("remove_{}", self.name),
            attributes | MethodAttributes::SPECIAL_NAME,
            TypeRef::void(),
            std::slice::from_ref(&self.ty),
        );
        Ok(self.remove_method.insert(emitter))
    }
}

impl MemberEmitter for EventEmitter {
    type Sealed = SealedEvent;

    fn ensure_valid(&mut self) -> EmitResult<()> {
        if let Some(add) = &mut self.add_method {
            add.ensure_valid()?;
        }
        if let Some(remove) = &mut self.remove_method {
            remove.ensure_valid()?;
        }
        Ok(())
    }

    fn generate(&self) -> SealedEvent {
        SealedEvent {
            name: self.name.clone(),
            attributes: self.attributes,
            ty: self.ty.clone(),
            add_method: self.add_method.as_ref().map(MethodEmitter::generate),
            remove_method: self.remove_method.as_ref().map(MethodEmitter::generate),
        }
    }
}

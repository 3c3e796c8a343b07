//! Class Emitter
//!
//! The orchestrator of one type-construction session. A `ClassEmitter`
//! owns the type under construction and every member registry, exposes
//! the declaration API, and runs the two-phase finalization protocol:
//! validate every member in a fixed order, generate, seal through the
//! injected host, then recursively build nested types. One emitter models
//! exactly one session; it is plain mutable state with no internal
//! synchronization and must not be shared across threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use facade_core::{
    initialize_arguments, ArgumentReference, AttributeEntry, EventAttributes, FieldAttributes,
    MethodAttributes, MethodDescriptor, PropertyAttributes, TypeAttributes, TypeRef,
};

use crate::error::{EmitError, EmitResult};
use crate::generics::GenericParameterBinder;
use crate::members::{
    ConstructorEmitter, EventEmitter, FieldReference, MemberEmitter, MethodEmitter,
    PropertyEmitter, SealedField,
};
use crate::registry::{FieldRegistry, MemberRegistry};
use crate::seal::{SealError, SealedType, TypeHost, SEAL_FAULT_GENERIC_CONSTRAINT};

/// Global counter for field identity tokens
static NEXT_FIELD_TOKEN: AtomicUsize = AtomicUsize::new(1);

/// Generate a unique field token
fn generate_field_token() -> usize {
    NEXT_FIELD_TOKEN.fetch_add(1, Ordering::Relaxed)
}

const DEBUGGER_GENERIC_CONSTRAINT_MESSAGE: &str = "This is a facade generation error: sealing \
     failed because an attached debugger defect rejects generic type definitions whose generic \
     methods constrain their generic arguments. The same build succeeds without the debugger \
     attached.";

/// Handle to a declared constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorId(usize);

/// Handle to a declared method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(usize);

/// Handle to a declared property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(usize);

/// Handle to a declared event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(usize);

/// Handle to a declared nested type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NestedId(usize);

/// Finalization states of a construction session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Accepting declarations
    Open,
    /// Running member validation
    Validating,
    /// Generating member bodies and sealing
    Generating,
    /// Sealed successfully; terminal
    Finalized,
    /// A build aborted; the emitter is inspectable but unusable
    Failed,
}

impl BuildState {
    fn name(self) -> &'static str {
        match self {
            BuildState::Open => "open",
            BuildState::Validating => "validating",
            BuildState::Generating => "generating",
            BuildState::Finalized => "finalized",
            BuildState::Failed => "failed",
        }
    }
}

/// The mutable, not-yet-finalized representation of the type
#[derive(Debug, Clone)]
pub struct TypeUnderConstruction {
    /// Type name
    pub name: String,
    /// Type attribute flags
    pub attributes: TypeAttributes,
    /// Base type; never present for interfaces
    pub base_type: Option<TypeRef>,
}

impl TypeUnderConstruction {
    /// Whether the definition is an interface
    pub fn is_interface(&self) -> bool {
        self.attributes.contains(TypeAttributes::INTERFACE)
    }
}

/// Orchestrator of one type-construction session
pub struct ClassEmitter {
    tuc: TypeUnderConstruction,
    constructors: MemberRegistry<ConstructorEmitter>,
    methods: MemberRegistry<MethodEmitter>,
    properties: MemberRegistry<PropertyEmitter>,
    events: MemberRegistry<EventEmitter>,
    nested: MemberRegistry<ClassEmitter>,
    fields: FieldRegistry,
    field_metadata: FxHashMap<usize, Vec<AttributeEntry>>,
    generics: GenericParameterBinder,
    type_initializer: Option<ConstructorId>,
    custom_attributes: Vec<AttributeEntry>,
    state: BuildState,
}

impl ClassEmitter {
    /// Create an emitter for a new type definition
    pub fn new(name: &str, attributes: TypeAttributes, base_type: Option<TypeRef>) -> Self {
        Self {
            tuc: TypeUnderConstruction {
                name: name.to_string(),
                attributes,
                base_type,
            },
            constructors: MemberRegistry::new(),
            methods: MemberRegistry::new(),
            properties: MemberRegistry::new(),
            events: MemberRegistry::new(),
            nested: MemberRegistry::new(),
            fields: FieldRegistry::new(),
            field_metadata: FxHashMap::default(),
            generics: GenericParameterBinder::new(),
            type_initializer: None,
            custom_attributes: Vec::new(),
            state: BuildState::Open,
        }
    }

    /// Create an emitter for a public class extending `base_type`
    pub fn class(name: &str, base_type: TypeRef) -> Self {
        Self::new(name, TypeAttributes::PUBLIC, Some(base_type))
    }

    /// Create an emitter for a public interface definition
    pub fn interface(name: &str) -> Self {
        Self::new(
            name,
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        )
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.tuc.name
    }

    /// Whether the underlying definition is an interface
    pub fn is_interface(&self) -> bool {
        self.tuc.is_interface()
    }

    /// The type under construction
    pub fn type_under_construction(&self) -> &TypeUnderConstruction {
        &self.tuc
    }

    /// Current finalization state
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Base type of the definition; interfaces have none, by error
    pub fn base_type(&self) -> EmitResult<Option<&TypeRef>> {
        if self.is_interface() {
            return Err(EmitError::InterfaceBaseType);
        }
        Ok(self.tuc.base_type.as_ref())
    }

    /// Render the display name, including bound generic parameters
    pub fn display_name(&self) -> String {
        let params = self.generics.parameters();
        if params.is_empty() {
            return self.tuc.name.clone();
        }
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        format!("{}<{}>", self.tuc.name, names.join(","))
    }

    fn ensure_open(&self) -> EmitResult<()> {
        if self.state != BuildState::Open {
            return Err(EmitError::InvalidState {
                expected: BuildState::Open.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Declare a no-argument constructor
    pub fn create_default_constructor(&mut self) -> EmitResult<ConstructorId> {
        self.create_constructor(Vec::new())
    }

    /// Declare a constructor over the given argument slots
    pub fn create_constructor(
        &mut self,
        args: Vec<ArgumentReference>,
    ) -> EmitResult<ConstructorId> {
        self.ensure_open()?;
        if self.is_interface() {
            return Err(EmitError::InterfaceConstructor);
        }
        trace!(ty = %self.tuc.name, arity = args.len(), "declare constructor");
        Ok(ConstructorId(
            self.constructors.add(ConstructorEmitter::new(args)),
        ))
    }

    /// Declare the one-time static type initializer; at most one per type
    pub fn create_type_initializer(&mut self) -> EmitResult<ConstructorId> {
        self.ensure_open()?;
        if self.type_initializer.is_some() {
            return Err(EmitError::TypeInitializerExists);
        }
        let id = ConstructorId(self.constructors.add(ConstructorEmitter::type_initializer()));
        self.type_initializer = Some(id);
        Ok(id)
    }

    /// The recorded type initializer
    pub fn type_initializer(&self) -> EmitResult<ConstructorId> {
        self.type_initializer.ok_or(EmitError::TypeInitializerUnset)
    }

    /// Constructor emitter behind a handle
    pub fn constructor_mut(&mut self, id: ConstructorId) -> Option<&mut ConstructorEmitter> {
        self.constructors.get_mut(id.0)
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Declare a method; the canonical form all conveniences funnel into
    pub fn create_method(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
        return_type: TypeRef,
        parameters: &[TypeRef],
    ) -> EmitResult<MethodId> {
        self.ensure_open()?;
        trace!(ty = %self.tuc.name, method = name, "declare method");
        Ok(MethodId(self.methods.add(MethodEmitter::new(
            name,
            attributes,
            return_type,
            parameters,
        ))))
    }

    /// Declare a method from argument references instead of a type list
    pub fn create_method_from_args(
        &mut self,
        name: &str,
        attributes: MethodAttributes,
        return_type: TypeRef,
        mut args: Vec<ArgumentReference>,
    ) -> EmitResult<MethodId> {
        let parameters = initialize_arguments(&mut args);
        self.create_method(name, attributes, return_type, &parameters)
    }

    /// Declare a void method with the default proxy-method attributes
    pub fn create_void_method(
        &mut self,
        name: &str,
        args: Vec<ArgumentReference>,
    ) -> EmitResult<MethodId> {
        self.create_method_from_args(
            name,
            MethodAttributes::DEFAULT_VIRTUAL,
            TypeRef::void(),
            args,
        )
    }

    /// Method emitter behind a handle
    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodEmitter> {
        self.methods.get_mut(id.0)
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Declare a public serializable instance field
    pub fn create_field(&mut self, name: &str, ty: TypeRef) -> EmitResult<FieldReference> {
        self.create_field_with_attributes(name, ty, FieldAttributes::PUBLIC)
    }

    /// Declare a public instance field, optionally excluded from
    /// serialization of proxy instances
    pub fn create_field_serializable(
        &mut self,
        name: &str,
        ty: TypeRef,
        serializable: bool,
    ) -> EmitResult<FieldReference> {
        let mut attributes = FieldAttributes::PUBLIC;
        if !serializable {
            attributes |= FieldAttributes::NOT_SERIALIZED;
        }
        self.create_field_with_attributes(name, ty, attributes)
    }

    /// Declare a field with explicit attribute flags.
    ///
    /// Re-registering a name (compared case-insensitively) overwrites the
    /// registry entry; references handed out earlier keep pointing at the
    /// old declaration.
    pub fn create_field_with_attributes(
        &mut self,
        name: &str,
        ty: TypeRef,
        attributes: FieldAttributes,
    ) -> EmitResult<FieldReference> {
        self.ensure_open()?;
        let reference = FieldReference {
            token: generate_field_token(),
            name: name.to_string(),
            ty,
            attributes,
        };
        trace!(ty = %self.tuc.name, field = name, "declare field");
        self.fields.insert(reference.clone());
        Ok(reference)
    }

    /// Declare a public static field
    pub fn create_static_field(&mut self, name: &str, ty: TypeRef) -> EmitResult<FieldReference> {
        self.create_static_field_with_attributes(name, ty, FieldAttributes::PUBLIC)
    }

    /// Declare a static field with explicit attribute flags; the static
    /// flag is always forced on
    pub fn create_static_field_with_attributes(
        &mut self,
        name: &str,
        ty: TypeRef,
        attributes: FieldAttributes,
    ) -> EmitResult<FieldReference> {
        self.create_field_with_attributes(name, ty, attributes | FieldAttributes::STATIC)
    }

    /// Look up a field by name, ignoring case; empty names are not found
    pub fn get_field(&self, name: &str) -> Option<FieldReference> {
        self.fields.get(name).cloned()
    }

    /// Every currently registered field, each exactly once
    pub fn all_fields(&self) -> Vec<FieldReference> {
        self.fields.values().cloned().collect()
    }

    // ========================================================================
    // Properties, events, nested types
    // ========================================================================

    /// Declare a property
    pub fn create_property(
        &mut self,
        name: &str,
        attributes: PropertyAttributes,
        ty: TypeRef,
    ) -> EmitResult<PropertyId> {
        self.ensure_open()?;
        trace!(ty = %self.tuc.name, property = name, "declare property");
        Ok(PropertyId(
            self.properties.add(PropertyEmitter::new(name, attributes, ty)),
        ))
    }

    /// Property emitter behind a handle
    pub fn property_mut(&mut self, id: PropertyId) -> Option<&mut PropertyEmitter> {
        self.properties.get_mut(id.0)
    }

    /// Declare an event
    pub fn create_event(
        &mut self,
        name: &str,
        attributes: EventAttributes,
        ty: TypeRef,
    ) -> EmitResult<EventId> {
        self.ensure_open()?;
        trace!(ty = %self.tuc.name, event = name, "declare event");
        Ok(EventId(self.events.add(EventEmitter::new(name, attributes, ty))))
    }

    /// Event emitter behind a handle
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut EventEmitter> {
        self.events.get_mut(id.0)
    }

    /// Declare a nested type and return a handle to its own emitter
    pub fn create_nested_class(
        &mut self,
        name: &str,
        attributes: TypeAttributes,
        base_type: Option<TypeRef>,
    ) -> EmitResult<NestedId> {
        self.ensure_open()?;
        Ok(NestedId(
            self.nested.add(ClassEmitter::new(name, attributes, base_type)),
        ))
    }

    /// Nested class emitter behind a handle
    pub fn nested_mut(&mut self, id: NestedId) -> Option<&mut ClassEmitter> {
        self.nested.get_mut(id.0)
    }

    // ========================================================================
    // Custom metadata
    // ========================================================================

    /// Attach a custom metadata entry to the type itself
    pub fn define_metadata(&mut self, entry: AttributeEntry) -> EmitResult<()> {
        self.ensure_open()?;
        self.custom_attributes.push(entry);
        Ok(())
    }

    /// Attach a batch of custom metadata entries to the type
    pub fn add_custom_attributes<I>(&mut self, entries: I) -> EmitResult<()>
    where
        I: IntoIterator<Item = AttributeEntry>,
    {
        self.ensure_open()?;
        self.custom_attributes.extend(entries);
        Ok(())
    }

    /// Attach a custom metadata entry to a previously created field.
    ///
    /// Fails when the reference was not handed out by this emitter or has
    /// been overwritten by a later declaration under the same name.
    pub fn define_field_metadata(
        &mut self,
        field: &FieldReference,
        entry: AttributeEntry,
    ) -> EmitResult<()> {
        self.ensure_open()?;
        if !self.fields.contains_token(field.token) {
            return Err(EmitError::ForeignFieldReference(field.name.clone()));
        }
        self.field_metadata.entry(field.token).or_default().push(entry);
        Ok(())
    }

    // ========================================================================
    // Generic parameters
    // ========================================================================

    /// Establish the generic parameter binding set; at most once
    pub fn set_generic_parameters(&mut self, names: &[&str]) -> EmitResult<()> {
        self.ensure_open()?;
        self.generics.bind(names)
    }

    /// Copy the generic parameter list of an external method onto the
    /// type; subject to the same set-once rule
    pub fn copy_generic_parameters_from_method(
        &mut self,
        method: &MethodDescriptor,
    ) -> EmitResult<()> {
        self.ensure_open()?;
        self.generics.copy_from_method(method)
    }

    /// The bound placeholder for a generic parameter name
    pub fn get_generic_argument(&self, name: &str) -> EmitResult<TypeRef> {
        self.generics.get(name)
    }

    /// Substitute the generic arguments of an external generic type
    pub fn resolve_generic_arguments_for_type(
        &self,
        generic_type: &TypeRef,
    ) -> EmitResult<Vec<TypeRef>> {
        self.generics.resolve_for_type(generic_type)
    }

    /// Substitute the generic arguments of an external generic method
    pub fn resolve_generic_arguments_for_method(
        &self,
        method: &MethodDescriptor,
    ) -> EmitResult<Vec<TypeRef>> {
        self.generics.resolve_for_method(method)
    }

    /// Bound generic parameter placeholders, in declaration order
    pub fn generic_parameters(&self) -> &[TypeRef] {
        self.generics.parameters()
    }

    /// Whether the type under construction is a generic definition
    pub fn is_generic_definition(&self) -> bool {
        !self.generics.parameters().is_empty()
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    /// Finalize the type: validate and generate every member, seal
    /// through the host, then build nested types depth-first.
    ///
    /// Any failure aborts the build and leaves the emitter in the
    /// `Failed` state; already-committed declarations are not rolled
    /// back, and the only recovery is a fresh emitter.
    pub fn build_type(&mut self, host: &mut dyn TypeHost) -> EmitResult<SealedType> {
        self.ensure_open()?;
        match self.run_build(host) {
            Ok(sealed) => {
                self.state = BuildState::Finalized;
                debug!(ty = %self.tuc.name, "type sealed");
                Ok(sealed)
            }
            Err(err) => {
                self.state = BuildState::Failed;
                debug!(ty = %self.tuc.name, error = %err, "build failed");
                Err(err)
            }
        }
    }

    fn run_build(&mut self, host: &mut dyn TypeHost) -> EmitResult<SealedType> {
        self.state = BuildState::Validating;
        debug!(ty = %self.tuc.name, "validating members");

        if !self.is_interface() && self.constructors.is_empty() {
            trace!(ty = %self.tuc.name, "synthesizing default constructor");
            self.constructors.add(ConstructorEmitter::new(Vec::new()));
        }

        // Fixed validation order: properties, events, constructors, methods.
        validate_all(&mut self.properties)?;
        validate_all(&mut self.events)?;
        validate_all(&mut self.constructors)?;
        validate_all(&mut self.methods)?;

        self.state = BuildState::Generating;
        debug!(ty = %self.tuc.name, "generating members");

        let sealed = SealedType {
            name: self.tuc.name.clone(),
            attributes: self.tuc.attributes,
            base_type: self.tuc.base_type.clone(),
            generic_parameters: self.generics.parameters().to_vec(),
            fields: self.generate_fields(),
            properties: generate_all(&self.properties),
            events: generate_all(&self.events),
            constructors: generate_all(&self.constructors),
            methods: generate_all(&self.methods),
            custom_attributes: self.custom_attributes.clone(),
            nested: Vec::new(),
        };

        let mut sealed = match host.seal(sealed) {
            Ok(sealed) => sealed,
            Err(err) => return Err(self.translate_seal_error(err, host)),
        };

        // The outer type is sealed; nested failures propagate from here.
        for nested in self.nested.iter_mut() {
            let child = nested.build_type(host)?;
            sealed.nested.push(child);
        }

        Ok(sealed)
    }

    fn generate_fields(&self) -> Vec<SealedField> {
        self.fields
            .values()
            .map(|f| SealedField {
                name: f.name.clone(),
                ty: f.ty.clone(),
                attributes: f.attributes,
                custom_attributes: self
                    .field_metadata
                    .get(&f.token)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Best-effort diagnostic translation of a recognized sealing fault.
    /// Everything else propagates unchanged; the build fails either way.
    fn translate_seal_error(&self, err: SealError, host: &dyn TypeHost) -> EmitError {
        if let SealError::BadImage { code } = err {
            if host.debugger_attached()
                && code == SEAL_FAULT_GENERIC_CONSTRAINT
                && self.is_generic_definition()
            {
                return EmitError::Generation {
                    message: DEBUGGER_GENERIC_CONSTRAINT_MESSAGE.to_string(),
                    proxy_type: Some(self.display_name()),
                };
            }
        }
        EmitError::Sealing(err)
    }
}

fn validate_all<T: MemberEmitter>(registry: &mut MemberRegistry<T>) -> EmitResult<()> {
    for member in registry.iter_mut() {
        member.ensure_valid()?;
    }
    Ok(())
}

fn generate_all<T: MemberEmitter>(registry: &MemberRegistry<T>) -> Vec<T::Sealed> {
    registry.iter().map(|m| m.generate()).collect()
}

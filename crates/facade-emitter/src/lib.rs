//! Dynamic type assembly engine for proxy generation.
//!
//! The engine turns declarative member descriptions into sealed,
//! loadable type descriptors. A `ClassEmitter` drives one construction
//! session: members are declared through typed handles while the session
//! is open, then `build_type` validates every member in a fixed order,
//! generates the immutable sealed records, and hands the result to the
//! injected `TypeHost` for the final one-time seal.
//!
//! The meta layer (`MetaMethod`, `MetaProperty`) sits above the emitters
//! and models proxied members before they are materialized onto a class
//! emitter.

pub mod class_emitter;
pub mod code;
pub mod error;
pub mod generics;
pub mod members;
pub mod meta_method;
pub mod meta_property;
pub mod registry;
pub mod seal;

pub use class_emitter::{
    BuildState, ClassEmitter, ConstructorId, EventId, MethodId, NestedId, PropertyId,
    TypeUnderConstruction,
};
pub use code::{opcode, CodeBlock};
pub use error::{EmitError, EmitResult};
pub use generics::GenericParameterBinder;
pub use members::{
    ConstructorEmitter, EventEmitter, FieldReference, MemberEmitter, MethodEmitter,
    PropertyEmitter, SealedConstructor, SealedEvent, SealedField, SealedMethod, SealedProperty,
};
pub use meta_method::MetaMethod;
pub use meta_property::MetaProperty;
pub use registry::{FieldRegistry, MemberRegistry};
pub use seal::{
    InProcessHost, SealError, SealedType, TypeHost, SEAL_FAULT_GENERIC_CONSTRAINT,
};

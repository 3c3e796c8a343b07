//! Shared type descriptors for the facade type-assembly engine.
//!
//! This crate holds the immutable data carriers that both the proxy
//! generator and the emitter layer exchange: type references, member
//! attribute flags, external method signatures, and custom metadata
//! entries. It deliberately contains no mutable builder state; everything
//! that assembles a type lives in `facade-emitter`.

mod attributes;
mod descriptor;
mod metadata;
mod type_ref;

pub use attributes::{
    EventAttributes, FieldAttributes, MethodAttributes, PropertyAttributes, TypeAttributes,
};
pub use descriptor::{initialize_arguments, ArgumentReference, MethodDescriptor};
pub use metadata::{AttributeEntry, MetadataValue};
pub use type_ref::{TypeKind, TypeRef};

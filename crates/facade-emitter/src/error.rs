//! Emitter Error Taxonomy
//!
//! Every failure surfaced by the assembly engine is an `EmitError`.
//! Usage and protocol errors are fatal for the operation that raised
//! them; nothing is retried or rolled back. A build failure leaves the
//! emitter inspectable but no longer finalizable.

use thiserror::Error;

use crate::seal::SealError;

/// Assembly engine result
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors raised by the type assembly engine
#[derive(Debug, Error)]
pub enum EmitError {
    /// Constructor declaration attempted on an interface definition
    #[error("Interfaces cannot have constructors")]
    InterfaceConstructor,

    /// Base type queried on an interface definition
    #[error("This emitter represents an interface; interfaces have no base types")]
    InterfaceBaseType,

    /// Second type initializer declaration
    #[error("Type already has a type initializer; at most one is allowed")]
    TypeInitializerExists,

    /// Type initializer queried before one was declared
    #[error("Type initializer has not been declared")]
    TypeInitializerUnset,

    /// Generic parameters bound more than once on the same emitter
    #[error("Generic parameters are already bound; they may be set at most once per emitter")]
    GenericParametersAlreadyBound,

    /// Generic parameter name not present in the local binding set
    #[error("Generic parameter '{0}' is not bound on this emitter")]
    UnboundGenericParameter(String),

    /// A member body failed its shape check during finalization
    #[error("Invalid code block in {member}: {reason}")]
    InvalidCodeBlock { member: String, reason: String },

    /// Accessor declared twice on the same property or event
    #[error("{member} already has a {accessor} accessor")]
    AccessorExists { member: String, accessor: &'static str },

    /// Metadata attached through a field reference of another emitter
    #[error("Field reference '{0}' does not belong to this emitter")]
    ForeignFieldReference(String),

    /// Absent getter or setter descriptor accessed on a meta-property
    #[error("Property '{property}' has no {accessor} accessor")]
    AccessorMissing {
        property: String,
        accessor: &'static str,
    },

    /// Second materialization of a meta-property
    #[error("Property '{0}' is already materialized; it is illegal to materialize it twice")]
    AlreadyMaterialized(String),

    /// Materialized handle accessed before materialization
    #[error("Property '{0}' is not materialized; call materialize_on first")]
    NotMaterialized(String),

    /// Explicit-implementation rename requested after materialization
    #[error("Property '{0}' is already materialized; rename must happen before materialization")]
    RenameAfterMaterialize(String),

    /// Operation invoked in the wrong build state
    #[error("Emitter is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// Environment-level sealing failure, propagated unchanged
    #[error("Sealing failed: {0}")]
    Sealing(#[from] SealError),

    /// Diagnostic translation of a recognized sealing fault
    #[error("{message}")]
    Generation {
        message: String,
        /// Display name of the offending type, when known
        proxy_type: Option<String>,
    },
}

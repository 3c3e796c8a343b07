//! Generic Parameter Binder
//!
//! Maps generic parameter names to the placeholder references owned by
//! one type under construction. The binding set is established at most
//! once per emitter, either from an explicit name list or by copying the
//! generic parameter list of an external method signature. Substitution
//! is one-level and non-recursive: each argument slot is independently
//! either a bound placeholder of the same name or an already-concrete
//! argument passed through unchanged.

use rustc_hash::FxHashMap;

use facade_core::{MethodDescriptor, TypeRef};

use crate::error::{EmitError, EmitResult};

/// Name-keyed substitution table scoped to one class emitter
#[derive(Debug, Default)]
pub struct GenericParameterBinder {
    by_name: FxHashMap<String, TypeRef>,
    params: Vec<TypeRef>,
    bound: bool,
}

impl GenericParameterBinder {
    /// Create an empty, unbound binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a binding set has been established
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Establish the binding set from a list of parameter names.
    ///
    /// Fails if a binding set already exists, regardless of arguments.
    pub fn bind(&mut self, names: &[&str]) -> EmitResult<()> {
        if self.bound {
            return Err(EmitError::GenericParametersAlreadyBound);
        }
        self.bound = true;
        for (position, name) in names.iter().enumerate() {
            let placeholder = TypeRef::generic_param(name, position);
            self.by_name.insert((*name).to_string(), placeholder.clone());
            self.params.push(placeholder);
        }
        Ok(())
    }

    /// Establish the binding set by copying the generic parameter list of
    /// an external method signature onto the type. Subject to the same
    /// set-once rule as `bind`.
    pub fn copy_from_method(&mut self, method: &MethodDescriptor) -> EmitResult<()> {
        if self.bound {
            return Err(EmitError::GenericParametersAlreadyBound);
        }
        let names: Vec<&str> = method.generic_parameters.iter().map(String::as_str).collect();
        self.bind(&names)
    }

    /// Look up the bound placeholder for a parameter name
    pub fn get(&self, name: &str) -> EmitResult<TypeRef> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| EmitError::UnboundGenericParameter(name.to_string()))
    }

    /// The bound placeholders in declaration order
    pub fn parameters(&self) -> &[TypeRef] {
        &self.params
    }

    /// Substitute the generic argument list of an external generic type
    pub fn resolve_for_type(&self, generic_type: &TypeRef) -> EmitResult<Vec<TypeRef>> {
        self.resolve(&generic_type.generic_args)
    }

    /// Substitute the generic argument list of an external generic method
    pub fn resolve_for_method(&self, method: &MethodDescriptor) -> EmitResult<Vec<TypeRef>> {
        self.resolve(&method.generic_arguments())
    }

    fn resolve(&self, args: &[TypeRef]) -> EmitResult<Vec<TypeRef>> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            if arg.is_generic_parameter() {
                resolved.push(self.get(&arg.name)?);
            } else {
                resolved.push(arg.clone());
            }
        }
        Ok(resolved)
    }
}

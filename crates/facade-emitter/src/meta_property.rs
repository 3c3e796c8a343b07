//! Meta-Property Model
//!
//! A `MetaProperty` merges the getter and setter halves of a proxied
//! property into one descriptor that is later materialized onto a class
//! emitter. Identity is deliberately asymmetric: equality compares the
//! value type and the current name (ignoring case, accessor presence
//! ignored), while the hash combines the accessor source signatures in
//! an order-sensitive way. The hash therefore stays stable across an
//! explicit-implementation rename while equality does not; meta
//! properties must not be rehashed across a rename.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use facade_core::{AttributeEntry, PropertyAttributes, TypeRef};

use crate::class_emitter::{ClassEmitter, PropertyId};
use crate::error::{EmitError, EmitResult};
use crate::meta_method::MetaMethod;

/// Merged getter/setter descriptor of one property awaiting generation
#[derive(Debug, Clone)]
pub struct MetaProperty {
    name: String,
    ty: TypeRef,
    declaring_type: TypeRef,
    attributes: PropertyAttributes,
    getter: Option<MetaMethod>,
    setter: Option<MetaMethod>,
    custom_attributes: Vec<AttributeEntry>,
    materialized: Option<PropertyId>,
    explicit: bool,
}

impl MetaProperty {
    /// Create a meta-property with no accessors yet, declared by
    /// `declaring_type`
    pub fn new(name: &str, ty: TypeRef, declaring_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            declaring_type,
            attributes: PropertyAttributes::NONE,
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
            materialized: None,
            explicit: false,
        }
    }

    /// Set the property attribute flags
    pub fn with_attributes(mut self, attributes: PropertyAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach the getter half
    pub fn with_getter(mut self, getter: MetaMethod) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Attach the setter half
    pub fn with_setter(mut self, setter: MetaMethod) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Record a custom metadata entry to stamp onto the generated property
    pub fn add_custom_attribute(&mut self, entry: AttributeEntry) {
        self.custom_attributes.push(entry);
    }

    /// Current property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type
    pub fn property_type(&self) -> &TypeRef {
        &self.ty
    }

    /// The type that declared this property
    pub fn declaring_type(&self) -> &TypeRef {
        &self.declaring_type
    }

    /// Whether a getter half is present
    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    /// Whether a setter half is present
    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }

    /// The getter descriptor; an error when the property is write-only
    pub fn getter(&self) -> EmitResult<&MetaMethod> {
        self.getter.as_ref().ok_or_else(|| EmitError::AccessorMissing {
            property: self.name.clone(),
            accessor: "get",
        })
    }

    /// The setter descriptor; an error when the property is read-only
    pub fn setter(&self) -> EmitResult<&MetaMethod> {
        self.setter.as_ref().ok_or_else(|| EmitError::AccessorMissing {
            property: self.name.clone(),
            accessor: "set",
        })
    }

    /// Handle of the generated property; an error before materialization
    pub fn materialized(&self) -> EmitResult<PropertyId> {
        self.materialized
            .ok_or_else(|| EmitError::NotMaterialized(self.name.clone()))
    }

    /// Generate the concrete property on `emitter`, stamping every
    /// recorded metadata entry and declaring the present accessors.
    /// Legal at most once per meta-property.
    pub fn materialize_on(&mut self, emitter: &mut ClassEmitter) -> EmitResult<PropertyId> {
        if self.materialized.is_some() {
            return Err(EmitError::AlreadyMaterialized(self.name.clone()));
        }

        let id = emitter.create_property(&self.name, self.attributes, self.ty.clone())?;
        let property = emitter
            .property_mut(id)
            .ok_or_else(|| EmitError::NotMaterialized(self.name.clone()))?;

        for entry in &self.custom_attributes {
            property.define_custom_attribute(entry.clone());
        }
        if let Some(getter) = &self.getter {
            property.create_get_method_named(getter.name(), getter.attributes())?;
        }
        if let Some(setter) = &self.setter {
            property.create_set_method_named(setter.name(), setter.attributes())?;
        }

        self.materialized = Some(id);
        Ok(id)
    }

    /// Switch the property and its accessors to the explicit
    /// implementation name `DeclaringType.Name`. Each accessor qualifies
    /// with its own declaring type; getter and setter may originate from
    /// different interfaces. Must precede materialization; repeating the
    /// switch is a no-op. The setter is renamed before the getter, each
    /// under its own idempotence guard.
    pub fn switch_to_explicit_implementation(&mut self) -> EmitResult<()> {
        if self.materialized.is_some() {
            return Err(EmitError::RenameAfterMaterialize(self.name.clone()));
        }
        if self.explicit {
            return Ok(());
        }
        self.name = format!("{}.{}", self.declaring_type.name, self.name);
        self.explicit = true;

        if let Some(setter) = &mut self.setter {
            setter.switch_to_explicit_implementation();
        }
        if let Some(getter) = &mut self.getter {
            getter.switch_to_explicit_implementation();
        }
        Ok(())
    }

    fn accessor_identity(method: Option<&MetaMethod>) -> u64 {
        match method {
            Some(method) => {
                let mut hasher = DefaultHasher::new();
                method.source().hash(&mut hasher);
                hasher.finish()
            }
            None => 0,
        }
    }

    /// The order-sensitive accessor-identity hash. Stable across a
    /// rename, unlike equality.
    pub fn identity_hash(&self) -> u64 {
        Self::accessor_identity(self.getter.as_ref())
            .wrapping_mul(397)
            ^ Self::accessor_identity(self.setter.as_ref())
    }
}

impl PartialEq for MetaProperty {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.name.to_lowercase() == other.name.to_lowercase()
    }
}

impl Eq for MetaProperty {}

impl Hash for MetaProperty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facade_core::{MetadataValue, MethodAttributes, MethodDescriptor};

    fn accessor(name: &str, source_type: &str) -> MetaMethod {
        MetaMethod::new(
            MethodDescriptor::new(name, TypeRef::interface(source_type))
                .with_attributes(MethodAttributes::DEFAULT_VIRTUAL),
        )
    }

    fn name_property() -> MetaProperty {
        MetaProperty::new(
            "Name",
            TypeRef::primitive("string"),
            TypeRef::interface("INamed"),
        )
        .with_getter(accessor("get_Name", "INamed"))
        .with_setter(accessor("set_Name", "INamed"))
    }

    fn bare_property(name: &str, ty: TypeRef) -> MetaProperty {
        MetaProperty::new(name, ty, TypeRef::interface("INamed"))
    }

    #[test]
    fn test_equality_ignores_case_and_accessors() {
        let full = name_property();
        let read_only = bare_property("name", TypeRef::primitive("string"))
            .with_getter(accessor("get_Name", "INamed"));

        assert_eq!(full, read_only);
        assert_ne!(full, bare_property("Name", TypeRef::primitive("number")));
        assert_ne!(full, bare_property("Title", TypeRef::primitive("string")));
    }

    #[test]
    fn test_hash_is_order_sensitive_over_accessors() {
        let forward = name_property();
        let swapped = bare_property("Name", TypeRef::primitive("string"))
            .with_getter(accessor("set_Name", "INamed"))
            .with_setter(accessor("get_Name", "INamed"));

        assert_ne!(forward.identity_hash(), swapped.identity_hash());
    }

    #[test]
    fn test_hash_stable_across_rename_while_equality_changes() {
        let original = name_property();
        let mut renamed = name_property();
        renamed.switch_to_explicit_implementation().unwrap();

        assert_ne!(original, renamed);
        assert_eq!(original.identity_hash(), renamed.identity_hash());
    }

    #[test]
    fn test_missing_accessor_is_an_error() {
        let read_only = bare_property("Name", TypeRef::primitive("string"))
            .with_getter(accessor("get_Name", "INamed"));

        assert!(read_only.can_read());
        assert!(!read_only.can_write());
        assert!(read_only.getter().is_ok());
        assert!(matches!(
            read_only.setter(),
            Err(EmitError::AccessorMissing { accessor: "set", .. })
        ));
    }

    #[test]
    fn test_rename_cascades_to_accessors() {
        let mut property = name_property();
        property.switch_to_explicit_implementation().unwrap();

        assert_eq!(property.name(), "INamed.Name");
        assert_eq!(property.getter().unwrap().name(), "INamed.get_Name");
        assert_eq!(property.setter().unwrap().name(), "INamed.set_Name");

        // A second switch changes nothing.
        property.switch_to_explicit_implementation().unwrap();
        assert_eq!(property.name(), "INamed.Name");
    }

    #[test]
    fn test_rename_qualifies_each_accessor_with_its_own_declaring_type() {
        let mut property = MetaProperty::new(
            "Name",
            TypeRef::primitive("string"),
            TypeRef::interface("IReadable"),
        )
        .with_getter(accessor("get_Name", "IReadable"))
        .with_setter(accessor("set_Name", "IWritable"));

        property.switch_to_explicit_implementation().unwrap();

        assert_eq!(property.name(), "IReadable.Name");
        assert_eq!(property.getter().unwrap().name(), "IReadable.get_Name");
        assert_eq!(property.setter().unwrap().name(), "IWritable.set_Name");
    }

    #[test]
    fn test_materialize_once() {
        let mut emitter = ClassEmitter::class("Proxy", TypeRef::class("Object"));
        let mut property = name_property();
        property.add_custom_attribute(
            AttributeEntry::new(TypeRef::class("Obsolete"))
                .with_value(MetadataValue::Str("use Title".to_string())),
        );

        assert!(matches!(
            property.materialized(),
            Err(EmitError::NotMaterialized(name)) if name == "Name"
        ));

        let id = property.materialize_on(&mut emitter).unwrap();
        assert_eq!(property.materialized().unwrap(), id);

        assert!(matches!(
            property.materialize_on(&mut emitter),
            Err(EmitError::AlreadyMaterialized(name)) if name == "Name"
        ));
    }

    #[test]
    fn test_rename_after_materialize_fails() {
        let mut emitter = ClassEmitter::class("Proxy", TypeRef::class("Object"));
        let mut property = name_property();
        property.materialize_on(&mut emitter).unwrap();

        assert!(matches!(
            property.switch_to_explicit_implementation(),
            Err(EmitError::RenameAfterMaterialize(name)) if name == "Name"
        ));
    }

    #[test]
    fn test_attribute_overrides_reach_the_sealed_property() {
        use crate::seal::InProcessHost;

        let source = MethodDescriptor::new("get_Name", TypeRef::interface("INamed"))
            .returns(TypeRef::primitive("string"));
        let mut property = MetaProperty::new(
            "Name",
            TypeRef::primitive("string"),
            TypeRef::interface("INamed"),
        )
        .with_attributes(PropertyAttributes::SPECIAL_NAME)
        .with_getter(MetaMethod::with_attributes(
            source,
            MethodAttributes::PUBLIC | MethodAttributes::FINAL,
        ));

        let mut emitter = ClassEmitter::class("Proxy", TypeRef::class("Object"));
        property.materialize_on(&mut emitter).unwrap();

        let mut host = InProcessHost;
        let sealed = emitter.build_type(&mut host).unwrap();
        let generated = &sealed.properties[0];
        assert!(generated.attributes.contains(PropertyAttributes::SPECIAL_NAME));

        let getter = generated.getter.as_ref().unwrap();
        assert!(getter.attributes.contains(MethodAttributes::FINAL));
        assert!(getter.attributes.contains(MethodAttributes::SPECIAL_NAME));
        assert!(!getter.attributes.contains(MethodAttributes::VIRTUAL));
    }

    #[test]
    fn test_materialized_property_carries_accessors() {
        use crate::seal::InProcessHost;

        let mut emitter = ClassEmitter::class("Proxy", TypeRef::class("Object"));
        let mut property = name_property();
        property.materialize_on(&mut emitter).unwrap();

        let mut host = InProcessHost;
        let sealed = emitter.build_type(&mut host).unwrap();
        assert_eq!(sealed.properties.len(), 1);
        let generated = &sealed.properties[0];
        assert_eq!(generated.name, "Name");
        assert_eq!(generated.getter.as_ref().unwrap().name, "get_Name");
        assert_eq!(generated.setter.as_ref().unwrap().name, "set_Name");
    }
}

//! End-to-end assembly tests: declare a full proxy type, build it
//! through a host, and inspect the sealed descriptor.

use facade_core::{
    ArgumentReference, AttributeEntry, EventAttributes, FieldAttributes, MetadataValue,
    MethodAttributes, MethodDescriptor, TypeAttributes, TypeRef,
};
use facade_emitter::{
    opcode, BuildState, ClassEmitter, EmitError, InProcessHost, MetaMethod, MetaProperty,
    SealError, SealedType, TypeHost, SEAL_FAULT_GENERIC_CONSTRAINT,
};

/// Host that rejects every seal with a configurable fault.
struct FaultingHost {
    code: u32,
    debugger: bool,
}

impl TypeHost for FaultingHost {
    fn seal(&mut self, _sealed: SealedType) -> Result<SealedType, SealError> {
        Err(SealError::BadImage { code: self.code })
    }

    fn debugger_attached(&self) -> bool {
        self.debugger
    }
}

fn interceptor_field_type() -> TypeRef {
    TypeRef::array(TypeRef::class("Interceptor"))
}

#[test]
fn test_full_proxy_assembly() {
    let mut emitter = ClassEmitter::class("CustomerProxy", TypeRef::class("Customer"));

    // Backing state for the interception pipeline.
    let interceptors = emitter
        .create_field("__interceptors", interceptor_field_type())
        .unwrap();
    emitter
        .define_field_metadata(
            &interceptors,
            AttributeEntry::new(TypeRef::class("NonSerialized")),
        )
        .unwrap();

    // Constructor taking the interceptor array.
    let ctor = emitter
        .create_constructor(vec![ArgumentReference::new(interceptor_field_type())])
        .unwrap();
    {
        let code = emitter.constructor_mut(ctor).unwrap().code_mut();
        code.emit(opcode::LOAD_THIS);
        code.emit(opcode::CALL_BASE);
        code.emit_with(opcode::LOAD_ARG, 0);
        code.emit_with(opcode::STORE_FIELD, 0);
        code.emit_return_void();
    }

    // A forwarded virtual method.
    let method = emitter
        .create_method(
            "GetName",
            MethodAttributes::DEFAULT_VIRTUAL,
            TypeRef::primitive("string"),
            &[],
        )
        .unwrap();
    {
        let code = emitter.method_mut(method).unwrap().code_mut();
        code.emit(opcode::LOAD_THIS);
        code.emit(opcode::INVOKE_INTERCEPTOR);
        code.emit_return();
    }

    // An event with both accessors left to default bodies.
    let event = emitter
        .create_event("Changed", EventAttributes::NONE, TypeRef::class("EventHandler"))
        .unwrap();
    {
        let ev = emitter.event_mut(event).unwrap();
        ev.create_add_method(MethodAttributes::DEFAULT_VIRTUAL).unwrap();
        ev.create_remove_method(MethodAttributes::DEFAULT_VIRTUAL).unwrap();
    }

    emitter
        .define_metadata(
            AttributeEntry::new(TypeRef::class("XmlInclude"))
                .with_value(MetadataValue::Type(TypeRef::class("Customer"))),
        )
        .unwrap();

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();

    assert_eq!(sealed.name, "CustomerProxy");
    assert_eq!(sealed.base_type, Some(TypeRef::class("Customer")));
    assert_eq!(emitter.state(), BuildState::Finalized);

    assert_eq!(sealed.fields.len(), 1);
    assert_eq!(sealed.fields[0].name, "__interceptors");
    assert_eq!(sealed.fields[0].custom_attributes.len(), 1);

    assert_eq!(sealed.constructor_count(), 1);
    assert_eq!(sealed.methods.len(), 1);
    assert_eq!(sealed.methods[0].name, "GetName");
    assert!(sealed.methods[0]
        .bytecode
        .ends_with(&[opcode::RETURN]));

    assert_eq!(sealed.events.len(), 1);
    let changed = &sealed.events[0];
    assert_eq!(changed.add_method.as_ref().unwrap().name, "add_Changed");
    assert_eq!(
        changed.add_method.as_ref().unwrap().bytecode,
        vec![opcode::RETURN_VOID]
    );

    assert_eq!(sealed.custom_attributes.len(), 1);
}

#[test]
fn test_interface_assembly_has_no_constructors() {
    let mut emitter = ClassEmitter::interface("ICustomer");
    emitter
        .create_method(
            "GetName",
            MethodAttributes::PUBLIC | MethodAttributes::ABSTRACT,
            TypeRef::primitive("string"),
            &[],
        )
        .unwrap();

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();

    assert!(sealed.is_interface());
    assert_eq!(sealed.constructor_count(), 0);
    assert_eq!(sealed.methods.len(), 1);
}

#[test]
fn test_generic_proxy_round_trip() {
    let mut emitter = ClassEmitter::class("RepositoryProxy", TypeRef::class("Repository"));
    emitter.set_generic_parameters(&["TEntity", "TKey"]).unwrap();

    let entity = emitter.get_generic_argument("TEntity").unwrap();
    let key = emitter.get_generic_argument("TKey").unwrap();
    emitter
        .create_method(
            "FindById",
            MethodAttributes::DEFAULT_VIRTUAL,
            entity.clone(),
            &[key],
        )
        .unwrap();

    // Substitution over an external generic signature.
    let external = TypeRef::interface("IRepository").with_generic_args(vec![
        TypeRef::generic_param("TEntity", 0),
        TypeRef::primitive("number"),
    ]);
    let resolved = emitter.resolve_generic_arguments_for_type(&external).unwrap();
    assert_eq!(resolved[0], entity);
    assert_eq!(resolved[1], TypeRef::primitive("number"));

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();
    assert!(sealed.is_generic_definition());
    assert_eq!(sealed.display_name(), "RepositoryProxy<TEntity,TKey>");
    assert_eq!(sealed.methods[0].return_type.name, "TEntity");
}

#[test]
fn test_explicit_implementation_flow() {
    let mut emitter = ClassEmitter::class("CustomerProxy", TypeRef::class("Customer"));

    let descriptor = |name: &str| {
        MethodDescriptor::new(name, TypeRef::interface("INamed"))
            .returns(TypeRef::primitive("string"))
    };

    let mut property = MetaProperty::new(
        "Name",
        TypeRef::primitive("string"),
        TypeRef::interface("INamed"),
    )
    .with_getter(MetaMethod::new(descriptor("get_Name")))
    .with_setter(MetaMethod::new(descriptor("set_Name")));

    property.switch_to_explicit_implementation().unwrap();
    property.materialize_on(&mut emitter).unwrap();

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();

    let generated = &sealed.properties[0];
    assert_eq!(generated.name, "INamed.Name");
    assert_eq!(generated.getter.as_ref().unwrap().name, "INamed.get_Name");
    assert_eq!(generated.setter.as_ref().unwrap().name, "INamed.set_Name");
}

#[test]
fn test_recognized_seal_fault_translated_under_debugger() {
    let mut emitter = ClassEmitter::class("GenericProxy", TypeRef::class("Service"));
    emitter.set_generic_parameters(&["T"]).unwrap();

    let mut host = FaultingHost {
        code: SEAL_FAULT_GENERIC_CONSTRAINT,
        debugger: true,
    };
    let err = emitter.build_type(&mut host).unwrap_err();

    match err {
        EmitError::Generation { message, proxy_type } => {
            assert!(message.contains("debugger"));
            assert_eq!(proxy_type.as_deref(), Some("GenericProxy<T>"));
        }
        other => panic!("expected translated generation error, got {other}"),
    }
    assert_eq!(emitter.state(), BuildState::Failed);
}

#[test]
fn test_recognized_fault_without_debugger_propagates() {
    let mut emitter = ClassEmitter::class("GenericProxy", TypeRef::class("Service"));
    emitter.set_generic_parameters(&["T"]).unwrap();

    let mut host = FaultingHost {
        code: SEAL_FAULT_GENERIC_CONSTRAINT,
        debugger: false,
    };
    assert!(matches!(
        emitter.build_type(&mut host),
        Err(EmitError::Sealing(SealError::BadImage {
            code: SEAL_FAULT_GENERIC_CONSTRAINT
        }))
    ));
}

#[test]
fn test_recognized_fault_on_non_generic_type_propagates() {
    let mut emitter = ClassEmitter::class("PlainProxy", TypeRef::class("Service"));
    let mut host = FaultingHost {
        code: SEAL_FAULT_GENERIC_CONSTRAINT,
        debugger: true,
    };
    assert!(matches!(
        emitter.build_type(&mut host),
        Err(EmitError::Sealing(SealError::BadImage { .. }))
    ));
}

#[test]
fn test_unrecognized_fault_propagates_under_debugger() {
    let mut emitter = ClassEmitter::class("GenericProxy", TypeRef::class("Service"));
    emitter.set_generic_parameters(&["T"]).unwrap();

    let mut host = FaultingHost {
        code: 0x8000_4005,
        debugger: true,
    };
    assert!(matches!(
        emitter.build_type(&mut host),
        Err(EmitError::Sealing(SealError::BadImage { code: 0x8000_4005 }))
    ));
}

#[test]
fn test_nested_type_assembly() {
    let mut emitter = ClassEmitter::class("OuterProxy", TypeRef::class("Outer"));
    let inner = emitter
        .create_nested_class(
            "Invocation",
            TypeAttributes::PRIVATE | TypeAttributes::SEALED,
            Some(TypeRef::class("AbstractInvocation")),
        )
        .unwrap();
    emitter
        .nested_mut(inner)
        .unwrap()
        .create_field_with_attributes(
            "target",
            TypeRef::class("Outer"),
            FieldAttributes::PRIVATE | FieldAttributes::READONLY,
        )
        .unwrap();

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();

    assert_eq!(sealed.nested.len(), 1);
    let invocation = &sealed.nested[0];
    assert_eq!(invocation.name, "Invocation");
    assert_eq!(invocation.fields.len(), 1);
    assert!(invocation.fields[0]
        .attributes
        .contains(FieldAttributes::READONLY));
}

#[test]
fn test_type_initializer_in_sealed_output() {
    let mut emitter = ClassEmitter::class("CachedProxy", TypeRef::class("Service"));
    let cctor = emitter.create_type_initializer().unwrap();
    {
        let code = emitter.constructor_mut(cctor).unwrap().code_mut();
        code.emit_with(opcode::STORE_FIELD, 0);
        code.emit_return_void();
    }

    let mut host = InProcessHost;
    let sealed = emitter.build_type(&mut host).unwrap();

    // The initializer occupies the constructor registry, so no default
    // constructor is synthesized alongside it.
    assert_eq!(sealed.constructors.len(), 1);
    assert_eq!(sealed.constructor_count(), 0);
    let initializer = &sealed.constructors[0];
    assert!(initializer.is_type_initializer);
    assert!(initializer.attributes.contains(MethodAttributes::STATIC));
}

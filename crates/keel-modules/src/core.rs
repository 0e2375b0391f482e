//! Primitive components and the comparison protocols.
//!
//! Every other module builds on the components registered here, so this
//! module must be installed first.

use std::cmp::Ordering;
use std::slice;

use keel_core::{
    ComponentId, Generic, Modifiers, RegistrationError, RuntimeError, ScopeId, Type, builtins,
};
use keel_registry::{CallContext, Function, TypeSystem, Value};

use crate::{Module, returning, signature};

pub fn module() -> Module {
    Module::new("core", install)
}

fn install(types: &mut TypeSystem, scope: ScopeId) -> Result<(), RegistrationError> {
    types.create_class("Void", Modifiers::DEFAULT, vec![], scope)?;
    let boolean_id = types.create_class("Boolean", Modifiers::DEFAULT, vec![], scope)?;
    types.create_class("Number", Modifiers::ABSTRACT, vec![], scope)?;
    let integer = types.create_class("Integer", Modifiers::DEFAULT, vec![], scope)?;
    types.create_class("Decimal", Modifiers::DEFAULT, vec![], scope)?;
    let string = types.create_class("String", Modifiers::DEFAULT, vec![], scope)?;

    let boolean = Type::named(boolean_id);
    let integer = Type::named(integer);
    let string = Type::named(string);

    install_any(types, &string)?;
    let equatable = install_equatable(types, scope, &boolean)?;
    install_comparable(types, scope, &integer, &boolean)?;
    let hashable = install_hashable(types, scope, &integer)?;
    install_boolean(types, boolean_id, &integer, &string, equatable, hashable)
}

// =============================================================================
// ANY
// =============================================================================

/// Default textual form: the name of the object's type.
fn install_any(types: &mut TypeSystem, string: &Type) -> Result<(), RegistrationError> {
    let scope = types.component(builtins::ANY).scope();
    let to_string = signature("toString", &[("this", Type::any())], string.clone());
    types.define_function(
        scope,
        Function::native(to_string, |ctx| {
            let name = ctx.types().display(&ctx.this()?.ty).to_string();
            Ok(returning(ctx, Value::string(name)))
        }),
    )
}

// =============================================================================
// PROTOCOLS
// =============================================================================

/// Create a protocol interface with one generic parameter `T`.
///
/// Returns the component, its `Self<T>` reference and `T`.
fn protocol(
    types: &mut TypeSystem,
    scope: ScopeId,
    name: &str,
) -> Result<(ComponentId, Type, Type), RegistrationError> {
    let id = types.create_interface(name, vec![Generic::unbounded("T")], scope)?;
    let this = types.component(id).reference();
    Ok((id, this, Type::generic("T", Type::any())))
}

/// `Equatable<T>`: `==` declared, `!=` derived from it.
fn install_equatable(
    types: &mut TypeSystem,
    scope: ScopeId,
    boolean: &Type,
) -> Result<ComponentId, RegistrationError> {
    let (id, this, t) = protocol(types, scope, "Equatable")?;
    let members = types.component(id).scope();
    let parameters = [("this", this), ("other", t)];

    types.define_function(
        members,
        Function::declare(signature("==", &parameters, boolean.clone())),
    )?;
    types.define_function(
        members,
        Function::native(signature("!=", &parameters, boolean.clone()), |ctx| {
            let equal = ctx.this()?.equals(ctx.types(), ctx.argument(1)?)?;
            Ok(returning(ctx, Value::Boolean(!equal)))
        }),
    )?;
    Ok(id)
}

/// `Comparable<T>`: `<=>` declared, the ordering operators derived from it.
fn install_comparable(
    types: &mut TypeSystem,
    scope: ScopeId,
    integer: &Type,
    boolean: &Type,
) -> Result<ComponentId, RegistrationError> {
    let (id, this, t) = protocol(types, scope, "Comparable")?;
    let members = types.component(id).scope();
    let parameters = [("this", this), ("other", t)];

    types.define_function(
        members,
        Function::declare(signature("<=>", &parameters, integer.clone())),
    )?;

    let operators: [(&str, fn(Ordering) -> bool); 4] = [
        ("<", Ordering::is_lt),
        ("<=", Ordering::is_le),
        (">", Ordering::is_gt),
        (">=", Ordering::is_ge),
    ];
    for (name, test) in operators {
        types.define_function(
            members,
            Function::native(signature(name, &parameters, boolean.clone()), move |ctx| {
                let ordering = compare(ctx)?;
                Ok(returning(ctx, Value::Boolean(test(ordering))))
            }),
        )?;
    }
    Ok(id)
}

/// Dispatch `<=>` on the receiver's runtime type.
fn compare(ctx: &CallContext<'_>) -> Result<Ordering, RuntimeError> {
    let this = ctx.this()?;
    let other = ctx.argument(1)?;
    let method = this
        .methods(ctx.types(), "<=>", slice::from_ref(&other.ty))
        .ok_or_else(|| RuntimeError::MissingProtocol {
            protocol: "<=>",
            ty: ctx.types().display(&this.ty).to_string(),
        })?;
    let result = method.invoke(ctx.types(), slice::from_ref(other))?;
    Ok(result.as_integer()?.cmp(&0))
}

/// `Hashable<T>`: `hash` declared.
fn install_hashable(
    types: &mut TypeSystem,
    scope: ScopeId,
    integer: &Type,
) -> Result<ComponentId, RegistrationError> {
    let (id, this, _) = protocol(types, scope, "Hashable")?;
    let members = types.component(id).scope();
    types.define_function(
        members,
        Function::declare(signature("hash", &[("this", this)], integer.clone())),
    )?;
    Ok(id)
}

// =============================================================================
// BOOLEAN
// =============================================================================

fn install_boolean(
    types: &mut TypeSystem,
    id: ComponentId,
    integer: &Type,
    string: &Type,
    equatable: ComponentId,
    hashable: ComponentId,
) -> Result<(), RegistrationError> {
    let boolean = &Type::named(id);
    let members = types.component(id).scope();
    let this = ("this", boolean.clone());
    let other = ("other", boolean.clone());

    types.define_function(
        members,
        Function::native(
            signature("==", &[this.clone(), other], boolean.clone()),
            |ctx| {
                let equal = ctx.this()?.as_boolean()? == ctx.argument(1)?.as_boolean()?;
                Ok(returning(ctx, Value::Boolean(equal)))
            },
        ),
    )?;
    types.define_function(
        members,
        Function::native(signature("!", &[this.clone()], boolean.clone()), |ctx| {
            Ok(returning(ctx, Value::Boolean(!ctx.this()?.as_boolean()?)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("hash", &[this.clone()], integer.clone()), |ctx| {
            let hash = i64::from(ctx.this()?.as_boolean()?);
            Ok(returning(ctx, Value::Integer(hash)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("toString", &[this], string.clone()), |ctx| {
            let text = ctx.this()?.as_boolean()?.to_string();
            Ok(returning(ctx, Value::string(text)))
        }),
    )?;

    types.inherit(id, Type::reference(equatable, vec![boolean.clone()]))?;
    types.inherit(id, Type::reference(hashable, vec![boolean.clone()]))
}

//! `String` behavior.

use std::hash::{Hash, Hasher};

use keel_core::{RegistrationError, ScopeId, Type};
use keel_registry::{Function, TypeSystem, Value};
use rustc_hash::FxHasher;

use crate::{Module, require, returning, signature};

pub fn module() -> Module {
    Module::new("string", install)
}

fn install(types: &mut TypeSystem, scope: ScopeId) -> Result<(), RegistrationError> {
    let string = require(types, scope, "String")?;
    let integer = Type::named(require(types, scope, "Integer")?);
    let boolean = Type::named(require(types, scope, "Boolean")?);
    let protocols = [
        require(types, scope, "Comparable")?,
        require(types, scope, "Equatable")?,
        require(types, scope, "Hashable")?,
    ];

    let members = types.component(string).scope();
    let ty = Type::named(string);
    let this = ("this", ty.clone());
    let binary = [this.clone(), ("other", ty.clone())];

    types.define_function(
        members,
        Function::native(signature("<=>", &binary, integer.clone()), |ctx| {
            let ordering = ctx.this()?.as_str()?.cmp(ctx.argument(1)?.as_str()?);
            Ok(returning(ctx, Value::Integer(ordering as i64)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("==", &binary, boolean), |ctx| {
            let equal = ctx.this()?.as_str()? == ctx.argument(1)?.as_str()?;
            Ok(returning(ctx, Value::Boolean(equal)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("hash", &[this.clone()], integer.clone()), |ctx| {
            let mut hasher = FxHasher::default();
            ctx.this()?.as_str()?.hash(&mut hasher);
            Ok(returning(ctx, Value::Integer(hasher.finish() as i64)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("+", &binary, ty.clone()), |ctx| {
            let joined = [ctx.this()?.as_str()?, ctx.argument(1)?.as_str()?].concat();
            Ok(returning(ctx, Value::string(joined)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("size", &[this.clone()], integer), |ctx| {
            let size = ctx.this()?.as_str()?.chars().count();
            Ok(returning(ctx, Value::Integer(size as i64)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("toString", &[this], ty.clone()), |ctx| {
            Ok(ctx.this()?.clone())
        }),
    )?;

    for protocol in protocols {
        types.inherit(string, Type::reference(protocol, vec![ty.clone()]))?;
    }
    Ok(())
}

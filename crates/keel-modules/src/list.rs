//! The `List<T>` component.
//!
//! Lists are shared, mutable sequences. Element results are typed by the
//! resolved signature, so `get` on a `List<Integer>` returns `Integer`.
//!
//! | member          | signature                          |
//! |-----------------|------------------------------------|
//! | `size`          | property, `Integer`                |
//! | `first`         | property, `T`, read/write          |
//! | `get`           | `(Integer): T`                     |
//! | `set`           | `(Integer, T): Void`               |
//! | `+`             | `(List<T>): List<T>`               |
//! | `==`, `!=`      | element-wise equality              |
//! | `toString`      | `[a, b, c]`                        |

use keel_core::{Generic, Modifiers, RegistrationError, RuntimeError, ScopeId, Type};
use keel_registry::{Function, Object, TypeSystem, Value};

use crate::{Module, require, returning, signature};

pub fn module() -> Module {
    Module::new("list", install)
}

fn install(types: &mut TypeSystem, scope: ScopeId) -> Result<(), RegistrationError> {
    let integer = Type::named(require(types, scope, "Integer")?);
    let boolean = Type::named(require(types, scope, "Boolean")?);
    let string = Type::named(require(types, scope, "String")?);
    let void = Type::named(require(types, scope, "Void")?);
    let equatable = require(types, scope, "Equatable")?;

    let generics = vec![Generic::unbounded("T")];
    let list = types.create_class("List", Modifiers::DEFAULT, generics, scope)?;
    let members = types.component(list).scope();
    let ty = types.component(list).reference();
    let t = Type::generic("T", Type::any());
    let this = ("this", ty.clone());
    let index = ("index", integer.clone());

    types.define_function(
        members,
        Function::native(signature("size", &[this.clone()], integer.clone()), |ctx| {
            let size = ctx.this()?.as_list()?.borrow().len();
            Ok(returning(ctx, Value::Integer(size as i64)))
        }),
    )?;

    types.define_function(
        members,
        Function::native(signature("first", &[this.clone()], t.clone()), |ctx| {
            element(ctx.this()?, 0)
        }),
    )?;
    types.define_function(
        members,
        Function::native(
            signature("first", &[this.clone(), ("value", t.clone())], void.clone()),
            |ctx| {
                store(ctx.this()?, 0, ctx.argument(1)?.clone())?;
                Ok(returning(ctx, Value::Void))
            },
        ),
    )?;

    types.define_function(
        members,
        Function::native(
            signature("get", &[this.clone(), index.clone()], t.clone()),
            |ctx| element(ctx.this()?, ctx.argument(1)?.as_integer()?),
        ),
    )?;
    types.define_function(
        members,
        Function::native(
            signature("set", &[this.clone(), index, ("value", t)], void),
            |ctx| {
                let value = ctx.argument(2)?.clone();
                store(ctx.this()?, ctx.argument(1)?.as_integer()?, value)?;
                Ok(returning(ctx, Value::Void))
            },
        ),
    )?;

    let binary = [this.clone(), ("other", ty.clone())];
    types.define_function(
        members,
        Function::native(signature("+", &binary, ty.clone()), |ctx| {
            let mut items = ctx.this()?.as_list()?.borrow().clone();
            items.extend(ctx.argument(1)?.as_list()?.borrow().iter().cloned());
            Ok(returning(ctx, Value::list(items)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("==", &binary, boolean), |ctx| {
            let left = ctx.this()?.as_list()?.borrow();
            let right = ctx.argument(1)?.as_list()?.borrow();
            let mut equal = left.len() == right.len();
            for (a, b) in left.iter().zip(right.iter()) {
                if !equal {
                    break;
                }
                equal = a.equals(ctx.types(), b)?;
            }
            Ok(returning(ctx, Value::Boolean(equal)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("toString", &[this], string), |ctx| {
            let items = ctx.this()?.as_list()?.borrow();
            let parts = items
                .iter()
                .map(|item| item.to_display_string(ctx.types()))
                .collect::<Result<Vec<_>, _>>()?;
            let text = format!("[{}]", parts.join(", "));
            Ok(returning(ctx, Value::string(text)))
        }),
    )?;

    types.inherit(list, Type::reference(equatable, vec![ty]))
}

/// Convert a script index into a position in a list of `length` items.
fn position(index: i64, length: usize) -> Result<usize, RuntimeError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .ok_or(RuntimeError::IndexOutOfBounds { index, length })
}

fn element(list: &Object, index: i64) -> Result<Object, RuntimeError> {
    let items = list.as_list()?.borrow();
    let at = position(index, items.len())?;
    Ok(items[at].clone())
}

fn store(list: &Object, index: i64, value: Object) -> Result<(), RuntimeError> {
    let mut items = list.as_list()?.borrow_mut();
    let at = position(index, items.len())?;
    items[at] = value;
    Ok(())
}

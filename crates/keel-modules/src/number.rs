//! Numeric behavior for `Number`, `Integer` and `Decimal`.
//!
//! Comparison, equality and hashing are defined once on `Number` and work
//! across integer and decimal payloads, so `1 == 1.0` and both hash alike.
//! Arithmetic is defined per concrete type.

use std::cmp::Ordering;

use keel_core::{ComponentId, RegistrationError, RuntimeError, ScopeId, Type};
use keel_registry::{Function, Object, TypeSystem, Value};
use ordered_float::OrderedFloat;

use crate::{Module, require, returning, signature};

pub fn module() -> Module {
    Module::new("number", install)
}

fn install(types: &mut TypeSystem, scope: ScopeId) -> Result<(), RegistrationError> {
    let number = require(types, scope, "Number")?;
    let integer = require(types, scope, "Integer")?;
    let decimal = require(types, scope, "Decimal")?;
    let boolean = Type::named(require(types, scope, "Boolean")?);
    let string = Type::named(require(types, scope, "String")?);
    let comparable = require(types, scope, "Comparable")?;
    let equatable = require(types, scope, "Equatable")?;
    let hashable = require(types, scope, "Hashable")?;

    install_number(types, number, &Type::named(integer), &boolean)?;
    for protocol in [comparable, equatable, hashable] {
        types.inherit(number, Type::reference(protocol, vec![Type::named(number)]))?;
    }

    install_integer(types, integer, &string)?;
    install_decimal(types, decimal, &string)?;
    types.inherit(integer, Type::named(number))?;
    types.inherit(decimal, Type::named(number))
}

// =============================================================================
// NUMBER
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Integer(i64),
    Decimal(f64),
}

impl Numeric {
    fn of(object: &Object) -> Result<Self, RuntimeError> {
        match &object.value {
            Value::Integer(v) => Ok(Numeric::Integer(*v)),
            Value::Decimal(v) => Ok(Numeric::Decimal(v.into_inner())),
            other => Err(RuntimeError::TypeMismatch {
                expected: "number".into(),
                actual: other.kind_name().into(),
            }),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(v) => v as f64,
            Numeric::Decimal(v) => v,
        }
    }

    fn compare(self, other: Numeric) -> Ordering {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a.cmp(&b),
            (a, b) => OrderedFloat(a.as_f64()).cmp(&OrderedFloat(b.as_f64())),
        }
    }

    /// Integral decimals hash like the equal integer.
    fn hash(self) -> i64 {
        match self {
            Numeric::Integer(v) => v,
            Numeric::Decimal(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => v as i64,
            Numeric::Decimal(v) => v.to_bits() as i64,
        }
    }
}

fn install_number(
    types: &mut TypeSystem,
    number: ComponentId,
    integer: &Type,
    boolean: &Type,
) -> Result<(), RegistrationError> {
    let members = types.component(number).scope();
    let ty = Type::named(number);
    let binary = [("this", ty.clone()), ("other", ty.clone())];

    types.define_function(
        members,
        Function::native(signature("<=>", &binary, integer.clone()), |ctx| {
            let ordering = Numeric::of(ctx.this()?)?.compare(Numeric::of(ctx.argument(1)?)?);
            Ok(returning(ctx, Value::Integer(ordering as i64)))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("==", &binary, boolean.clone()), |ctx| {
            let ordering = Numeric::of(ctx.this()?)?.compare(Numeric::of(ctx.argument(1)?)?);
            Ok(returning(ctx, Value::Boolean(ordering.is_eq())))
        }),
    )?;
    types.define_function(
        members,
        Function::native(signature("hash", &[("this", ty)], integer.clone()), |ctx| {
            let hash = Numeric::of(ctx.this()?)?.hash();
            Ok(returning(ctx, Value::Integer(hash)))
        }),
    )
}

// =============================================================================
// INTEGER
// =============================================================================

fn install_integer(
    types: &mut TypeSystem,
    integer: ComponentId,
    string: &Type,
) -> Result<(), RegistrationError> {
    let members = types.component(integer).scope();
    let ty = Type::named(integer);
    let binary = [("this", ty.clone()), ("other", ty.clone())];

    let operators: [(&'static str, fn(i64, i64) -> Option<i64>); 4] = [
        ("+", i64::checked_add),
        ("-", i64::checked_sub),
        ("*", i64::checked_mul),
        ("/", i64::checked_div),
    ];
    for (name, apply) in operators {
        types.define_function(
            members,
            Function::native(signature(name, &binary, ty.clone()), move |ctx| {
                let a = ctx.this()?.as_integer()?;
                let b = ctx.argument(1)?.as_integer()?;
                let result = apply(a, b).ok_or_else(|| match (name, b) {
                    ("/", 0) => RuntimeError::native("division by zero"),
                    _ => RuntimeError::native(format!("integer overflow in {a} {name} {b}")),
                })?;
                Ok(returning(ctx, Value::Integer(result)))
            }),
        )?;
    }

    types.define_function(
        members,
        Function::native(signature("-", &[("this", ty.clone())], ty.clone()), |ctx| {
            let value = ctx.this()?.as_integer()?;
            let overflow = || RuntimeError::native(format!("integer overflow in -{value}"));
            let negated = value.checked_neg().ok_or_else(overflow)?;
            Ok(returning(ctx, Value::Integer(negated)))
        }),
    )?;
    let to_string = signature("toString", &[("this", ty)], string.clone());
    types.define_function(
        members,
        Function::native(to_string, |ctx| {
            let text = ctx.this()?.as_integer()?.to_string();
            Ok(returning(ctx, Value::string(text)))
        }),
    )
}

// =============================================================================
// DECIMAL
// =============================================================================

fn install_decimal(
    types: &mut TypeSystem,
    decimal: ComponentId,
    string: &Type,
) -> Result<(), RegistrationError> {
    let members = types.component(decimal).scope();
    let ty = Type::named(decimal);
    let binary = [("this", ty.clone()), ("other", ty.clone())];

    let operators: [(&str, fn(f64, f64) -> f64); 4] = [
        ("+", |a, b| a + b),
        ("-", |a, b| a - b),
        ("*", |a, b| a * b),
        ("/", |a, b| a / b),
    ];
    for (name, apply) in operators {
        types.define_function(
            members,
            Function::native(signature(name, &binary, ty.clone()), move |ctx| {
                let a = ctx.this()?.as_decimal()?;
                let b = ctx.argument(1)?.as_decimal()?;
                Ok(returning(ctx, Value::decimal(apply(a, b))))
            }),
        )?;
    }

    types.define_function(
        members,
        Function::native(signature("-", &[("this", ty.clone())], ty.clone()), |ctx| {
            Ok(returning(ctx, Value::decimal(-ctx.this()?.as_decimal()?)))
        }),
    )?;
    let to_string = signature("toString", &[("this", ty)], string.clone());
    types.define_function(
        members,
        Function::native(to_string, |ctx| {
            let text = ctx.this()?.as_decimal()?.to_string();
            Ok(returning(ctx, Value::string(text)))
        }),
    )
}

//! Runtime values.
//!
//! An [`Object`] pairs a static [`Type`] with a [`Value`] payload. Objects
//! are how host code and native implementations exchange data; behavior is
//! never attached to the payload, it is found by resolving methods on the
//! object's type.
//!
//! Container payloads are shared (`Rc<RefCell<..>>`) so that mutation
//! through a method or property is visible through every handle.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::slice;

use keel_core::{RuntimeError, Type};
use ordered_float::OrderedFloat;

use crate::member::{BoundMethod, BoundProperty};
use crate::type_system::{FrozenTypeSystem, TypeSystem};

// ============================================================================
// Value
// ============================================================================

/// The payload of an object.
#[derive(Clone)]
pub enum Value {
    Void,
    Boolean(bool),
    Integer(i64),
    Decimal(OrderedFloat<f64>),
    String(Rc<str>),
    List(Rc<RefCell<Vec<Object>>>),
    Struct(Rc<RefCell<BTreeMap<String, Object>>>),
    /// Opaque host data.
    Native(Rc<dyn Any>),
}

impl Value {
    pub fn decimal(value: f64) -> Self {
        Value::Decimal(OrderedFloat(value))
    }

    pub fn string(value: impl AsRef<str>) -> Self {
        Value::String(Rc::from(value.as_ref()))
    }

    pub fn list(items: Vec<Object>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn structure(fields: BTreeMap<String, Object>) -> Self {
        Value::Struct(Rc::new(RefCell::new(fields)))
    }

    pub fn native<T: Any>(value: T) -> Self {
        Value::Native(Rc::new(value))
    }

    /// A short name for the payload shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Struct(_) => "struct",
            Value::Native(_) => "native",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Boolean(v) => write!(f, "Boolean({v})"),
            Value::Integer(v) => write!(f, "Integer({v})"),
            Value::Decimal(v) => write!(f, "Decimal({v})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(&items.borrow()).finish(),
            Value::Struct(fields) => f.debug_tuple("Struct").field(&fields.borrow()).finish(),
            Value::Native(_) => write!(f, "Native(...)"),
        }
    }
}

// ============================================================================
// Object
// ============================================================================

/// A typed runtime value.
#[derive(Debug, Clone)]
pub struct Object {
    pub ty: Type,
    pub value: Value,
}

fn mismatch(expected: &str, actual: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.kind_name().to_string(),
    }
}

impl Object {
    pub fn new(ty: Type, value: Value) -> Self {
        Self { ty, value }
    }

    pub fn as_boolean(&self) -> Result<bool, RuntimeError> {
        match &self.value {
            Value::Boolean(v) => Ok(*v),
            other => Err(mismatch("boolean", other)),
        }
    }

    pub fn as_integer(&self) -> Result<i64, RuntimeError> {
        match &self.value {
            Value::Integer(v) => Ok(*v),
            other => Err(mismatch("integer", other)),
        }
    }

    pub fn as_decimal(&self) -> Result<f64, RuntimeError> {
        match &self.value {
            Value::Decimal(v) => Ok(v.into_inner()),
            other => Err(mismatch("decimal", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, RuntimeError> {
        match &self.value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_list(&self) -> Result<&Rc<RefCell<Vec<Object>>>, RuntimeError> {
        match &self.value {
            Value::List(items) => Ok(items),
            other => Err(mismatch("list", other)),
        }
    }

    pub fn as_struct(&self) -> Result<&Rc<RefCell<BTreeMap<String, Object>>>, RuntimeError> {
        match &self.value {
            Value::Struct(fields) => Ok(fields),
            other => Err(mismatch("struct", other)),
        }
    }

    /// Downcast opaque host data.
    pub fn as_native<T: Any>(&self) -> Result<&T, RuntimeError> {
        match &self.value {
            Value::Native(data) => data
                .downcast_ref::<T>()
                .ok_or_else(|| mismatch(std::any::type_name::<T>(), &self.value)),
            other => Err(mismatch(std::any::type_name::<T>(), other)),
        }
    }

    // ==========================================================================
    // Members
    // ==========================================================================

    /// Resolve method `name` on this object's type and bind it to `self`.
    pub fn methods(
        &self,
        types: &TypeSystem,
        name: &str,
        arguments: &[Type],
    ) -> Option<BoundMethod> {
        types
            .methods(&self.ty, name, arguments)
            .map(|method| method.bind(self.clone()))
    }

    /// Resolve property `name` on this object's type and bind it to `self`.
    pub fn properties(&self, types: &TypeSystem, name: &str) -> Option<BoundProperty> {
        types
            .properties(&self.ty, name)
            .map(|property| property.bind(self.clone()))
    }

    // ==========================================================================
    // Protocols
    // ==========================================================================

    /// `self == other` through the `==` method; `false` if there is none.
    pub fn equals(&self, types: &TypeSystem, other: &Object) -> Result<bool, RuntimeError> {
        match self.methods(types, "==", slice::from_ref(&other.ty)) {
            Some(method) => method.invoke(types, slice::from_ref(other))?.as_boolean(),
            None => Ok(false),
        }
    }

    /// The result of the `hash` method.
    ///
    /// The result must be typed as the `Integer` visible from the root scope.
    pub fn hash_code(&self, types: &TypeSystem) -> Result<i64, RuntimeError> {
        let hash = self.protocol(types, "hash")?;
        let integer = types.lookup_type(types.root_scope(), "Integer");
        if !integer.is_some_and(|integer| types.is_subtype(&hash.ty, integer)) {
            return Err(RuntimeError::TypeMismatch {
                expected: "Integer".to_string(),
                actual: types.display(&hash.ty).to_string(),
            });
        }
        hash.as_integer()
    }

    /// The result of the `toString` method.
    pub fn to_display_string(&self, types: &TypeSystem) -> Result<String, RuntimeError> {
        Ok(self.protocol(types, "toString")?.as_str()?.to_string())
    }

    fn protocol(&self, types: &TypeSystem, name: &'static str) -> Result<Object, RuntimeError> {
        if let Some(component) = types.foreign_component(&self.ty) {
            return Err(RuntimeError::ForeignComponent { component });
        }
        let method = self
            .methods(types, name, &[])
            .ok_or_else(|| RuntimeError::MissingProtocol {
                protocol: name,
                ty: types.display(&self.ty).to_string(),
            })?;
        method.invoke(types, &[])
    }
}

// ============================================================================
// Hashable
// ============================================================================

/// An object usable as a hash map key.
///
/// The hash is computed once through the `hash` method; equality goes
/// through the `==` method, and an error while comparing counts as unequal.
#[derive(Debug, Clone)]
pub struct Hashable {
    object: Object,
    hash: i64,
    types: FrozenTypeSystem,
}

impl Hashable {
    pub fn new(object: Object, types: &FrozenTypeSystem) -> Result<Self, RuntimeError> {
        let hash = object.hash_code(types)?;
        Ok(Self {
            object,
            hash,
            types: types.clone(),
        })
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn into_object(self) -> Object {
        self.object
    }
}

impl Hash for Hashable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.hash);
    }
}

impl PartialEq for Hashable {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self
                .object
                .equals(&self.types, &other.object)
                .unwrap_or(false)
    }
}

impl Eq for Hashable {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{Function, FunctionDecl, VariableDecl};
    use crate::test_fixtures::Lattice;
    use rustc_hash::FxHashSet;

    #[test]
    fn payload_accessors_report_mismatches() {
        let l = Lattice::new();
        let object = Object::new(l.integer(), Value::Integer(4));
        assert_eq!(object.as_integer().unwrap(), 4);
        assert_eq!(
            object.as_str().unwrap_err(),
            RuntimeError::TypeMismatch {
                expected: "string".into(),
                actual: "integer".into()
            }
        );

        let text = Object::new(Type::any(), Value::string("hi"));
        assert_eq!(text.as_str().unwrap(), "hi");
        let decimal = Object::new(l.decimal(), Value::decimal(1.5));
        assert_eq!(decimal.as_decimal().unwrap(), 1.5);
    }

    #[test]
    fn native_payloads_downcast() {
        struct Handle(u8);
        let object = Object::new(Type::any(), Value::native(Handle(9)));
        assert_eq!(object.as_native::<Handle>().unwrap().0, 9);
        assert!(object.as_native::<String>().is_err());
    }

    #[test]
    fn lists_share_their_storage() {
        let l = Lattice::new();
        let list = Object::new(l.list(l.integer()), Value::list(vec![]));
        let alias = list.clone();
        alias
            .as_list()
            .unwrap()
            .borrow_mut()
            .push(Object::new(l.integer(), Value::Integer(1)));
        assert_eq!(list.as_list().unwrap().borrow().len(), 1);
    }

    /// Integers with `==` and `hash` defined by payload.
    fn hashable_integers() -> (FrozenTypeSystem, Type) {
        let mut l = Lattice::new();
        let integer = l.integer();
        let scope = l.types.component(l.integer).scope();

        let equals = FunctionDecl::new(
            "==",
            vec![
                VariableDecl::new("this", integer.clone()),
                VariableDecl::new("other", integer.clone()),
            ],
            Type::any(),
        );
        l.types
            .define_function(
                scope,
                Function::native(equals, |ctx| {
                    let equal = ctx.this()?.as_integer()? == ctx.argument(1)?.as_integer()?;
                    Ok(Object::new(ctx.returns().clone(), Value::Boolean(equal)))
                }),
            )
            .unwrap();

        let hash = FunctionDecl::new(
            "hash",
            vec![VariableDecl::new("this", integer.clone())],
            integer.clone(),
        );
        l.types
            .define_function(
                scope,
                Function::native(hash, |ctx| {
                    let parity = Value::Integer(ctx.this()?.as_integer()? % 2);
                    Ok(Object::new(ctx.returns().clone(), parity))
                }),
            )
            .unwrap();

        (l.types.freeze(), integer)
    }

    #[test]
    fn hashable_uses_protocol_methods() {
        let (types, integer) = hashable_integers();
        let key = |n| {
            let object = Object::new(integer.clone(), Value::Integer(n));
            Hashable::new(object, &types).unwrap()
        };

        let mut set = FxHashSet::default();
        set.insert(key(1));
        set.insert(key(3));
        set.insert(key(1));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&key(3)));
        assert!(!set.contains(&key(5)));
    }

    #[test]
    fn missing_protocols() {
        let l = Lattice::new();
        let object = Object::new(l.decimal(), Value::decimal(1.0));
        let err = object.hash_code(&l.types).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::MissingProtocol {
                protocol: "hash",
                ty: "Decimal".into()
            }
        );
        assert!(!object.equals(&l.types, &object).unwrap());
        assert!(Hashable::new(object, &l.types.freeze()).is_err());
    }

    #[test]
    fn hash_results_must_be_integers() {
        let mut l = Lattice::new();
        let decimal = l.decimal();
        let scope = l.types.component(l.decimal).scope();
        let hash = FunctionDecl::new(
            "hash",
            vec![VariableDecl::new("this", decimal.clone())],
            decimal.clone(),
        );
        l.types
            .define_function(
                scope,
                Function::native(hash, |ctx| {
                    Ok(Object::new(ctx.returns().clone(), Value::Integer(1)))
                }),
            )
            .unwrap();

        let object = Object::new(decimal, Value::decimal(0.5));
        assert_eq!(
            object.hash_code(&l.types).unwrap_err(),
            RuntimeError::TypeMismatch {
                expected: "Integer".into(),
                actual: "Decimal".into()
            }
        );
    }

    #[test]
    fn objects_from_other_layers_are_rejected() {
        let base = Lattice::new().types.freeze();
        let mut layer = base.extend();
        let root = layer.root_scope();
        let point = layer.create_struct("Point", vec![], root).unwrap();
        let object = Object::new(Type::named(point), Value::Void);

        assert!(object.methods(&base, "hash", &[]).is_none());
        assert!(!object.equals(&base, &object).unwrap());
        assert_eq!(
            Hashable::new(object, &base).unwrap_err(),
            RuntimeError::ForeignComponent { component: point }
        );
    }
}

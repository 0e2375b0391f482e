//! Method and property lookup on types.
//!
//! A method of a type is a function in the type's member scope whose first
//! parameter is the receiver. A property `p` is a getter method `p` with no
//! further arguments, plus an optional setter `p` taking one argument of the
//! getter's return type.
//!
//! Member lookup searches only the member scope itself (never its lexical
//! parents) and falls back to the member scope of `Any`, so every type gets
//! the methods declared there. `Dynamic` accepts every member with any
//! arguments, typed `Dynamic`.

use keel_core::{RuntimeError, Type, builtins};

use crate::function::{Function, FunctionDecl, VariableDecl};
use crate::object::Object;
use crate::type_system::TypeSystem;

impl TypeSystem {
    /// The member scope used for lookups on `ty`.
    pub fn member_scope(&self, ty: &Type) -> keel_core::ScopeId {
        match ty {
            Type::Reference(r) => self.component(r.component).scope(),
            Type::Generic(g) => self.member_scope(&g.bound),
            Type::Variant(v) => self.member_scope(&v.choice()),
            Type::Tuple(_) => self.component(builtins::TUPLE).scope(),
            Type::Struct(_) => self.component(builtins::STRUCT).scope(),
        }
    }

    /// Resolve `name` applied to `arguments` among the members of `ty`.
    ///
    /// `arguments` includes the receiver. Types naming components this arena
    /// did not issue have no members.
    pub fn type_functions(&self, ty: &Type, name: &str, arguments: &[Type]) -> Option<Function> {
        let foreign = |t: &Type| self.foreign_component(t).is_some();
        if foreign(ty) || arguments.iter().any(foreign) {
            return None;
        }
        if ty.is_dynamic() {
            return Some(dynamic_signature(name, arguments.len()));
        }
        let scope = self.member_scope(ty);
        self.resolve_function_in(scope, name, arguments, true)
            .or_else(|| {
                let any = self.component(builtins::ANY).scope();
                if scope == any {
                    None
                } else {
                    self.resolve_function_in(any, name, arguments, true)
                }
            })
    }

    /// Resolve method `name` on a receiver of type `ty`.
    pub fn methods(&self, ty: &Type, name: &str, arguments: &[Type]) -> Option<Method> {
        let mut full = Vec::with_capacity(arguments.len() + 1);
        full.push(ty.clone());
        full.extend_from_slice(arguments);
        self.type_functions(ty, name, &full).and_then(Method::new)
    }

    /// Resolve property `name` on a receiver of type `ty`.
    pub fn properties(&self, ty: &Type, name: &str) -> Option<Property> {
        let getter = self.methods(ty, name, &[])?;
        let setter = self.methods(ty, name, &[getter.returns().clone()]);
        Some(Property {
            name: name.to_string(),
            getter,
            setter,
        })
    }
}

/// `name(Dynamic, ...): Dynamic` with `arity` parameters.
fn dynamic_signature(name: &str, arity: usize) -> Function {
    let parameters = (0..arity)
        .map(|i| VariableDecl::new(format!("arg{i}"), Type::dynamic()))
        .collect();
    Function::declare(FunctionDecl::new(name, parameters, Type::dynamic()))
}

// ============================================================================
// Methods
// ============================================================================

/// A function whose first parameter is the receiver.
#[derive(Debug, Clone)]
pub struct Method {
    function: Function,
}

impl Method {
    /// Wrap `function`; `None` if it has no receiver parameter.
    pub fn new(function: Function) -> Option<Self> {
        (function.arity() >= 1).then_some(Self { function })
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn receiver(&self) -> &Type {
        &self.function.parameters()[0].ty
    }

    /// Parameters after the receiver.
    pub fn parameters(&self) -> &[VariableDecl] {
        &self.function.parameters()[1..]
    }

    pub fn returns(&self) -> &Type {
        self.function.returns()
    }

    pub fn bind(&self, receiver: Object) -> BoundMethod {
        BoundMethod {
            method: self.clone(),
            receiver,
        }
    }
}

/// A method with its receiver attached.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    method: Method,
    receiver: Object,
}

impl BoundMethod {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn receiver(&self) -> &Object {
        &self.receiver
    }

    /// Call with `arguments`, not counting the receiver.
    pub fn invoke(
        &self,
        types: &TypeSystem,
        arguments: &[Object],
    ) -> Result<Object, RuntimeError> {
        let mut all = Vec::with_capacity(arguments.len() + 1);
        all.push(self.receiver.clone());
        all.extend_from_slice(arguments);
        self.method.function.invoke(types, &all)
    }
}

// ============================================================================
// Properties
// ============================================================================

/// A getter and optional setter pair.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    getter: Method,
    setter: Option<Method>,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property type, i.e. the getter's return type.
    pub fn ty(&self) -> &Type {
        self.getter.returns()
    }

    pub fn getter(&self) -> &Method {
        &self.getter
    }

    pub fn setter(&self) -> Option<&Method> {
        self.setter.as_ref()
    }

    pub fn is_mutable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn bind(&self, receiver: Object) -> BoundProperty {
        BoundProperty {
            property: self.clone(),
            receiver,
        }
    }
}

/// A property with its receiver attached.
#[derive(Debug, Clone)]
pub struct BoundProperty {
    property: Property,
    receiver: Object,
}

impl BoundProperty {
    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn get(&self, types: &TypeSystem) -> Result<Object, RuntimeError> {
        self.property
            .getter
            .bind(self.receiver.clone())
            .invoke(types, &[])
    }

    pub fn set(&self, types: &TypeSystem, value: Object) -> Result<Object, RuntimeError> {
        let setter = self
            .property
            .setter
            .as_ref()
            .ok_or_else(|| RuntimeError::ImmutableProperty {
                name: self.property.name.clone(),
            })?;
        setter.bind(self.receiver.clone()).invoke(types, &[value])
    }
}

//! A program layered on a [`Library`](crate::Library).
//!
//! The program owns a mutable type system extending the library's frozen
//! one. Its scope is a child of the library root, so library names resolve
//! from it while its own definitions stay local.

use keel_core::{ComponentId, RegistrationError, ScopeId, Type};
use keel_registry::{FrozenTypeSystem, Function, TypeSystem, Variable};

#[derive(Debug)]
pub struct Program {
    types: TypeSystem,
    scope: ScopeId,
}

impl Program {
    pub(crate) fn new(types: TypeSystem) -> Self {
        let scope = types.root_scope();
        Self { types, scope }
    }

    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeSystem {
        &mut self.types
    }

    /// The program scope.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn lookup_type(&self, name: &str) -> Option<&Type> {
        self.types.lookup_type(self.scope, name)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.types.lookup_variable(self.scope, name)
    }

    pub fn define_function(&mut self, function: Function) -> Result<(), RegistrationError> {
        self.types.define_function(self.scope, function)
    }

    pub fn define_variable(&mut self, variable: Variable) -> Result<(), RegistrationError> {
        self.types.define_variable(self.scope, variable)
    }

    /// Record that `component` inherits `supertype`.
    pub fn inherit(
        &mut self,
        component: ComponentId,
        supertype: Type,
    ) -> Result<(), RegistrationError> {
        self.types.inherit(component, supertype)
    }

    /// Resolve a free function call from the program scope.
    pub fn resolve_function(&self, name: &str, arguments: &[Type]) -> Option<Function> {
        self.types.resolve_function(self.scope, name, arguments)
    }

    /// Freeze the program, for example to key host maps with
    /// [`Hashable`](keel_registry::Hashable).
    pub fn freeze(self) -> FrozenTypeSystem {
        self.types.freeze()
    }
}

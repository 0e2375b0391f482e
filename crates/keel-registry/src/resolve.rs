//! Scope-chain lookup, overload resolution and definitions.
//!
//! Lookups walk from a scope to the root through parent links and return the
//! first match; a nearer scope shadows everything above it. Function
//! resolution picks the first applicable overload, nearest scope first and
//! then in registration order. Because overloads within a scope are pairwise
//! disjoint, at most one candidate in a scope can apply to a given argument
//! list, so the order rarely matters.

use keel_core::{Bindings, RegistrationError, ScopeId, Type};
use tracing::trace;

use crate::function::{Function, Variable};
use crate::scope::Scope;
use crate::type_system::TypeSystem;

/// Iterator over a scope and its ancestors.
pub struct ScopeChain<'a> {
    types: &'a TypeSystem,
    next: Option<ScopeId>,
}

impl<'a> Iterator for ScopeChain<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<&'a Scope> {
        let scope = self.types.scope(self.next?);
        self.next = scope.parent();
        Some(scope)
    }
}

impl TypeSystem {
    /// `scope` followed by each of its ancestors up to the root.
    pub fn scope_chain(&self, scope: ScopeId) -> ScopeChain<'_> {
        ScopeChain {
            types: self,
            next: Some(scope),
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        self.scope_chain(scope).find_map(|s| s.variable(name))
    }

    pub fn lookup_type(&self, scope: ScopeId, name: &str) -> Option<&Type> {
        self.scope_chain(scope).find_map(|s| s.type_alias(name))
    }

    /// Every overload named `name` with `arity` parameters, nearest scope first.
    ///
    /// With `current` set only `scope` itself is searched.
    pub fn lookup_functions(
        &self,
        scope: ScopeId,
        name: &str,
        arity: usize,
        current: bool,
    ) -> Vec<&Function> {
        let depth = if current { 1 } else { usize::MAX };
        self.scope_chain(scope)
            .take(depth)
            .flat_map(|s| s.functions_with_arity(name, arity))
            .collect()
    }

    /// Resolve a call to `name` with `arguments` from `scope` outwards.
    ///
    /// The returned function has its generics bound from the arguments.
    pub fn resolve_function(
        &self,
        scope: ScopeId,
        name: &str,
        arguments: &[Type],
    ) -> Option<Function> {
        self.resolve_function_in(scope, name, arguments, false)
    }

    /// Like [`resolve_function`](Self::resolve_function), optionally limited
    /// to `scope` itself.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_function_in(
        &self,
        scope: ScopeId,
        name: &str,
        arguments: &[Type],
        current: bool,
    ) -> Option<Function> {
        let resolved = self
            .lookup_functions(scope, name, arguments.len(), current)
            .into_iter()
            .find_map(|candidate| self.instantiate(candidate, arguments));

        match &resolved {
            Some(function) => trace!(
                name,
                %scope,
                signature = %self.display_signature(function.declaration()),
                "resolved function"
            ),
            None => trace!(
                name,
                %scope,
                arity = arguments.len(),
                "no applicable overload"
            ),
        }
        resolved
    }

    /// Every overload applicable to `arguments`, nearest scope first.
    pub fn applicable_functions(
        &self,
        scope: ScopeId,
        name: &str,
        arguments: &[Type],
    ) -> Vec<Function> {
        self.lookup_functions(scope, name, arguments.len(), false)
            .into_iter()
            .filter_map(|candidate| self.instantiate(candidate, arguments))
            .collect()
    }

    /// Bind `candidate` to `arguments` if every argument fits its parameter.
    fn instantiate(&self, candidate: &Function, arguments: &[Type]) -> Option<Function> {
        let mut bindings = Bindings::new();
        let applies = arguments
            .iter()
            .zip(candidate.parameters())
            .all(|(argument, parameter)| {
                self.is_subtype_bound(argument, &parameter.ty, &mut bindings)
            });
        applies.then(|| candidate.bind(&bindings.resolved()))
    }

    // ==========================================================================
    // Definitions
    // ==========================================================================

    /// Define `variable` in `scope`, replacing any previous one of that name.
    pub fn define_variable(
        &mut self,
        scope: ScopeId,
        variable: Variable,
    ) -> Result<(), RegistrationError> {
        let target = self.scope_mut(scope)?;
        target.accepts(variable.is_definition(), variable.name())?;
        target.insert_variable(variable);
        Ok(())
    }

    /// Define a type alias in `scope`. Aliases always shadow.
    pub fn define_type(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        ty: Type,
    ) -> Result<(), RegistrationError> {
        self.scope_mut(scope)?.insert_type(name.into(), ty);
        Ok(())
    }

    /// Define `function` in `scope` under its own name.
    pub fn define_function(
        &mut self,
        scope: ScopeId,
        function: Function,
    ) -> Result<(), RegistrationError> {
        let key = function.name().to_string();
        self.define_function_as(scope, key, function)
    }

    /// Define `function` in `scope` under `key`.
    ///
    /// The new overload must be disjoint from every overload already under
    /// `key` with the same arity.
    pub fn define_function_as(
        &mut self,
        scope: ScopeId,
        key: impl Into<String>,
        function: Function,
    ) -> Result<(), RegistrationError> {
        let key = key.into();
        let target = self.scope_mut(scope)?;
        target.accepts(function.is_definition(), function.name())?;

        let conflict = self
            .scope(scope)
            .functions_with_arity(&key, function.arity())
            .find(|existing| {
                !self.signatures_disjoint(existing.declaration(), function.declaration())
            });
        if let Some(existing) = conflict {
            return Err(RegistrationError::NonDisjointOverload {
                existing: self.display_signature(existing.declaration()).to_string(),
                new: self.display_signature(function.declaration()).to_string(),
            });
        }

        trace!(
            key = key.as_str(),
            %scope,
            signature = %self.display_signature(function.declaration()),
            "defined function"
        );
        self.scope_mut(scope)?.insert_function(key, function);
        Ok(())
    }
}

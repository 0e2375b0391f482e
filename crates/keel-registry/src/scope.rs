//! Symbol tables.
//!
//! A [`Scope`] hosts three independent namespaces:
//!
//! - variables: name -> [`Variable`], shadowed by the nearest enclosing scope
//! - functions: (name, arity) -> overloads, kept in registration order
//! - types: name -> [`Type`] alias
//!
//! Scopes form a tree through parent indices into the arena. Lookups that
//! walk the chain and definitions that need the subtype relation live on
//! [`TypeSystem`](crate::TypeSystem); this module only stores entries.

use std::collections::BTreeMap;
use std::fmt;

use keel_core::{RegistrationError, ScopeId, Type};
use rustc_hash::FxHashMap;

use crate::function::{Function, Variable};

/// Whether a scope holds implementations or just signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Signatures only; also accepts definitions.
    Declaration,
    /// Fully implemented entries only.
    Definition,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Declaration => write!(f, "declaration"),
            ScopeKind::Definition => write!(f, "definition"),
        }
    }
}

/// A node in the scope tree.
#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    kind: ScopeKind,
    parent: Option<ScopeId>,

    variables: FxHashMap<String, Variable>,

    /// Overloads by name; each bucket holds every arity in registration order.
    functions: BTreeMap<String, Vec<Function>>,

    types: FxHashMap<String, Type>,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            parent,
            variables: FxHashMap::default(),
            functions: BTreeMap::new(),
            types: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    // ==========================================================================
    // Local Lookup
    // ==========================================================================

    /// A variable defined directly in this scope.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// A type alias defined directly in this scope.
    pub fn type_alias(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Overloads registered directly in this scope under `name` and `arity`.
    pub fn functions_with_arity<'a>(
        &'a self,
        name: &str,
        arity: usize,
    ) -> impl Iterator<Item = &'a Function> + 'a {
        self.functions
            .get(name)
            .into_iter()
            .flatten()
            .filter(move |f| f.arity() == arity)
    }

    /// Every function in this scope with the key it is registered under.
    pub fn functions(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.functions
            .iter()
            .flat_map(|(key, overloads)| {
                overloads.iter().map(move |f| (key.as_str(), f))
            })
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn function_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    // ==========================================================================
    // Storage
    // ==========================================================================

    /// Reject signature-only entries in a definition scope.
    pub(crate) fn accepts(
        &self,
        is_definition: bool,
        name: &str,
    ) -> Result<(), RegistrationError> {
        if self.kind == ScopeKind::Definition && !is_definition {
            return Err(RegistrationError::DeclarationInDefinitionScope {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.name().to_string(), variable);
    }

    pub(crate) fn insert_type(&mut self, name: String, ty: Type) {
        self.types.insert(name, ty);
    }

    pub(crate) fn insert_function(&mut self, key: String, function: Function) {
        self.functions.entry(key).or_default().push(function);
    }
}

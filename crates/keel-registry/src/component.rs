//! Component declarations.
//!
//! A [`Component`] is a named type declaration (struct, class or interface)
//! and the unit of inheritance. It owns a member [`Scope`](crate::Scope) in
//! the arena, a list of generic parameters, and the list of supertypes added
//! through [`TypeSystem::inherit`](crate::TypeSystem::inherit).

use std::fmt;

use keel_core::{ComponentId, Generic, Modifiers, ScopeId, Type};

/// The kind of a component, which decides what it may inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// May inherit only the builtin `Struct` type or interfaces.
    Struct,
    /// May inherit only `VIRTUAL` or `ABSTRACT` components.
    Class,
    /// May inherit only `Any` or other interfaces. Always abstract.
    Interface,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Struct => write!(f, "struct"),
            ComponentKind::Class => write!(f, "class"),
            ComponentKind::Interface => write!(f, "interface"),
        }
    }
}

/// A named type declaration.
#[derive(Debug, Clone)]
pub struct Component {
    id: ComponentId,
    kind: ComponentKind,
    name: String,
    modifiers: Modifiers,
    generics: Vec<Generic>,
    pub(crate) inherits: Vec<Type>,
    scope: ScopeId,
}

impl Component {
    pub(crate) fn new(
        id: ComponentId,
        kind: ComponentKind,
        name: String,
        modifiers: Modifiers,
        generics: Vec<Generic>,
        scope: ScopeId,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            modifiers,
            generics,
            inherits: Vec::new(),
            scope,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Declared generic parameters.
    pub fn generics(&self) -> &[Generic] {
        &self.generics
    }

    /// Supertypes, in the order they were inherited.
    pub fn inherits(&self) -> &[Type] {
        &self.inherits
    }

    /// The member scope.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    /// This component applied to its own generic parameters (`List<T>`).
    pub fn reference(&self) -> Type {
        Type::reference(
            self.id,
            self.generics.iter().map(Generic::to_type).collect(),
        )
    }

    /// This component applied to `generics`.
    pub fn apply(&self, generics: Vec<Type>) -> Type {
        Type::reference(self.id, generics)
    }
}

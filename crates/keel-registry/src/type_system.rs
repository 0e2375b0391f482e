//! The component and scope arena.
//!
//! [`TypeSystem`] owns every [`Component`] and [`Scope`] and hands out
//! [`ComponentId`]/[`ScopeId`] indices into its tables. Types refer to
//! components by id only, so cyclic structures (a component whose methods
//! mention the component itself) need no shared ownership.
//!
//! ## Layers
//!
//! A finished arena is frozen into a [`FrozenTypeSystem`], a cheap shared
//! handle. [`TypeSystem::extend`] starts a new mutable layer on top of a
//! frozen one: ids continue after the base, the new layer gets its own root
//! scope whose parent is the base root, and any attempt to mutate a base
//! entry fails with `FrozenScope`/`FrozenComponent`. This is how a standard
//! library is built once and shared by many programs.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use keel_core::{ComponentId, Generic, Modifiers, RegistrationError, ScopeId, Type, builtins};
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::component::{Component, ComponentKind};
use crate::display::{SignatureDisplay, TypeDisplay};
use crate::function::FunctionDecl;
use crate::scope::{Scope, ScopeKind};

/// Mutable arena of components and scopes.
#[derive(Debug)]
pub struct TypeSystem {
    base: Option<FrozenTypeSystem>,
    component_offset: usize,
    scope_offset: usize,

    components: Vec<Component>,
    scopes: Vec<Scope>,

    /// Local inheritance edges, component -> supertype component.
    pub(crate) hierarchy: DiGraphMap<ComponentId, ()>,

    root: ScopeId,
}

impl TypeSystem {
    /// A fresh arena holding only the root scope and the builtin components.
    pub fn new() -> Self {
        let mut types = Self {
            base: None,
            component_offset: 0,
            scope_offset: 0,
            components: Vec::new(),
            scopes: Vec::new(),
            hierarchy: DiGraphMap::new(),
            root: builtins::ROOT_SCOPE,
        };
        types.root = types.allocate_scope(ScopeKind::Definition, None);

        let builtin = [
            (ComponentKind::Interface, "Any", Modifiers::ABSTRACT, vec![]),
            (ComponentKind::Class, "Dynamic", Modifiers::VIRTUAL, vec![]),
            (
                ComponentKind::Class,
                "Tuple",
                Modifiers::VIRTUAL,
                vec![Generic::unbounded("T")],
            ),
            (
                ComponentKind::Class,
                "Struct",
                Modifiers::VIRTUAL,
                vec![Generic::unbounded("T")],
            ),
        ];
        for (kind, name, modifiers, generics) in builtin {
            let id = types.allocate_component(kind, name, modifiers, generics, types.root);
            let reference = types.components[id.index()].reference();
            types.scopes[0].insert_type(name.to_string(), reference);
        }
        debug_assert_eq!(types.components.len(), builtins::COUNT);

        types
    }

    /// A new mutable layer on top of `base`.
    pub fn extend(base: &FrozenTypeSystem) -> Self {
        let mut types = Self {
            base: Some(base.clone()),
            component_offset: base.component_count(),
            scope_offset: base.scope_count(),
            components: Vec::new(),
            scopes: Vec::new(),
            hierarchy: DiGraphMap::new(),
            root: base.root_scope(),
        };
        types.root = types.allocate_scope(ScopeKind::Definition, Some(base.root_scope()));
        debug!(
            components = types.component_offset,
            scopes = types.scope_offset,
            "extended frozen type system"
        );
        types
    }

    /// Make this layer immutable and shareable.
    pub fn freeze(self) -> FrozenTypeSystem {
        FrozenTypeSystem(Rc::new(self))
    }

    /// The base this layer extends, if any.
    pub fn base(&self) -> Option<&FrozenTypeSystem> {
        self.base.as_ref()
    }

    /// The root scope of this layer.
    pub fn root_scope(&self) -> ScopeId {
        self.root
    }

    /// Total number of components across all layers.
    pub fn component_count(&self) -> usize {
        self.component_offset + self.components.len()
    }

    /// Total number of scopes across all layers.
    pub fn scope_count(&self) -> usize {
        self.scope_offset + self.scopes.len()
    }

    // ==========================================================================
    // Access
    // ==========================================================================

    /// Look up a component.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena or one of its bases.
    pub fn component(&self, id: ComponentId) -> &Component {
        match (&self.base, id.index().checked_sub(self.component_offset)) {
            (_, Some(local)) => &self.components[local],
            (Some(base), None) => base.component(id),
            (None, None) => unreachable!("component offset is zero without a base"),
        }
    }

    /// Look up a scope.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena or one of its bases.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        match (&self.base, id.index().checked_sub(self.scope_offset)) {
            (_, Some(local)) => &self.scopes[local],
            (Some(base), None) => base.scope(id),
            (None, None) => unreachable!("scope offset is zero without a base"),
        }
    }

    pub fn get_component(&self, id: ComponentId) -> Option<&Component> {
        (id.index() < self.component_count()).then(|| self.component(id))
    }

    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        (id.index() < self.scope_count()).then(|| self.scope(id))
    }

    /// The first component referenced by `ty` that this arena and its bases
    /// did not issue.
    pub fn foreign_component(&self, ty: &Type) -> Option<ComponentId> {
        let field = |f: &keel_core::Field| self.foreign_component(&f.ty);
        match ty {
            Type::Reference(r) => (r.component.index() >= self.component_count())
                .then_some(r.component)
                .or_else(|| r.generics.iter().find_map(|g| self.foreign_component(g))),
            Type::Generic(g) => self.foreign_component(&g.bound),
            Type::Variant(v) => [&v.lower, &v.upper]
                .into_iter()
                .flatten()
                .find_map(|bound| self.foreign_component(bound)),
            Type::Tuple(t) => t.fields.iter().find_map(field),
            Type::Struct(s) => s.fields.values().find_map(field),
        }
    }

    /// Every component owned by this layer.
    pub fn local_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub(crate) fn component_mut(
        &mut self,
        id: ComponentId,
    ) -> Result<&mut Component, RegistrationError> {
        match id.index().checked_sub(self.component_offset) {
            Some(local) => Ok(&mut self.components[local]),
            None => Err(RegistrationError::FrozenComponent {
                component: self.component(id).name().to_string(),
            }),
        }
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope, RegistrationError> {
        match id.index().checked_sub(self.scope_offset) {
            Some(local) => Ok(&mut self.scopes[local]),
            None => Err(RegistrationError::FrozenScope {
                scope: id.to_string(),
            }),
        }
    }

    // ==========================================================================
    // Construction
    // ==========================================================================

    /// Create a scope nested in `parent`.
    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        self.allocate_scope(kind, parent)
    }

    /// Create a component and register its name in `parent`.
    ///
    /// The member scope is a declaration scope when the component is
    /// abstract and a definition scope otherwise. Interfaces are always
    /// abstract, whatever `modifiers` say.
    pub fn create_component(
        &mut self,
        kind: ComponentKind,
        name: impl Into<String>,
        modifiers: Modifiers,
        generics: Vec<Generic>,
        parent: ScopeId,
    ) -> Result<ComponentId, RegistrationError> {
        let name = name.into();
        self.scope_mut(parent)?;

        let id = self.allocate_component(kind, &name, modifiers, generics, parent);
        let reference = self.component(id).reference();
        self.scope_mut(parent)?.insert_type(name, reference);
        Ok(id)
    }

    pub fn create_struct(
        &mut self,
        name: impl Into<String>,
        generics: Vec<Generic>,
        parent: ScopeId,
    ) -> Result<ComponentId, RegistrationError> {
        self.create_component(
            ComponentKind::Struct,
            name,
            Modifiers::DEFAULT,
            generics,
            parent,
        )
    }

    pub fn create_class(
        &mut self,
        name: impl Into<String>,
        modifiers: Modifiers,
        generics: Vec<Generic>,
        parent: ScopeId,
    ) -> Result<ComponentId, RegistrationError> {
        self.create_component(ComponentKind::Class, name, modifiers, generics, parent)
    }

    pub fn create_interface(
        &mut self,
        name: impl Into<String>,
        generics: Vec<Generic>,
        parent: ScopeId,
    ) -> Result<ComponentId, RegistrationError> {
        self.create_component(
            ComponentKind::Interface,
            name,
            Modifiers::ABSTRACT,
            generics,
            parent,
        )
    }

    fn allocate_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new((self.scope_offset + self.scopes.len()) as u32);
        self.scopes.push(Scope::new(id, kind, parent));
        id
    }

    fn allocate_component(
        &mut self,
        kind: ComponentKind,
        name: &str,
        modifiers: Modifiers,
        generics: Vec<Generic>,
        parent: ScopeId,
    ) -> ComponentId {
        let modifiers = match kind {
            ComponentKind::Interface => Modifiers::ABSTRACT,
            _ => modifiers,
        };
        let scope_kind = if modifiers.is_abstract() {
            ScopeKind::Declaration
        } else {
            ScopeKind::Definition
        };
        let scope = self.allocate_scope(scope_kind, Some(parent));

        let id = ComponentId::new((self.component_offset + self.components.len()) as u32);
        self.components.push(Component::new(
            id,
            kind,
            name.to_string(),
            modifiers,
            generics,
            scope,
        ));
        self.hierarchy.add_node(id);

        debug!(component = name, %kind, %id, "created component");
        id
    }

    // ==========================================================================
    // Display
    // ==========================================================================

    /// Render `ty` using component names.
    pub fn display<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay::new(self, ty)
    }

    /// Render a signature as `name(A, B): R`.
    pub fn display_signature<'a>(&'a self, declaration: &'a FunctionDecl) -> SignatureDisplay<'a> {
        SignatureDisplay::new(self, declaration)
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Frozen Layers
// ============================================================================

/// An immutable, cheaply clonable type system.
#[derive(Clone)]
pub struct FrozenTypeSystem(Rc<TypeSystem>);

impl FrozenTypeSystem {
    /// Start a new mutable layer on top of this one.
    pub fn extend(&self) -> TypeSystem {
        TypeSystem::extend(self)
    }
}

impl Deref for FrozenTypeSystem {
    type Target = TypeSystem;

    fn deref(&self) -> &TypeSystem {
        &self.0
    }
}

impl fmt::Debug for FrozenTypeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenTypeSystem")
            .field("components", &self.component_count())
            .field("scopes", &self.scope_count())
            .finish()
    }
}

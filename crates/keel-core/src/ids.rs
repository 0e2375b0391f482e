//! Arena indices.
//!
//! Components and scopes live in an arena owned by the registry. Everything
//! else refers to them through these copyable indices, so a
//! `Type::Reference` never owns its component and scope parent links never
//! form ownership cycles.

use std::fmt;

/// Index of a component in the component arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create an id from a raw arena index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Index of a scope in the scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Create an id from a raw arena index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Components every type system is created with, in arena order.
///
/// A fresh `TypeSystem` allocates these before anything else, so their ids
/// are fixed.
pub mod builtins {
    use super::{ComponentId, ScopeId};

    /// Top of the nominal lattice.
    pub const ANY: ComponentId = ComponentId::new(0);
    /// Universal sub- and supertype for untyped interop.
    pub const DYNAMIC: ComponentId = ComponentId::new(1);
    /// Nominal base of anonymous tuple types, `Tuple<T>`.
    pub const TUPLE: ComponentId = ComponentId::new(2);
    /// Nominal base of anonymous struct types, `Struct<T>`.
    pub const STRUCT: ComponentId = ComponentId::new(3);

    /// Root scope of a fresh type system.
    pub const ROOT_SCOPE: ScopeId = ScopeId::new(0);

    /// Number of builtin components.
    pub const COUNT: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_dense() {
        assert_eq!(builtins::ANY.index(), 0);
        assert_eq!(builtins::DYNAMIC.index(), 1);
        assert_eq!(builtins::TUPLE.index(), 2);
        assert_eq!(builtins::STRUCT.index(), 3);
        assert_eq!(builtins::COUNT, 4);
    }

    #[test]
    fn display() {
        assert_eq!(ComponentId::new(7).to_string(), "component#7");
        assert_eq!(ScopeId::new(2).to_string(), "scope#2");
    }
}

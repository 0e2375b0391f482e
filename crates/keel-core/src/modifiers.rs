//! Inheritance modifiers.

use std::fmt;

/// How a component (or function) may be inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Inheritance {
    /// Sealed: classes may not inherit from it.
    #[default]
    Default,
    /// Open for inheritance, fully implemented.
    Virtual,
    /// Open for inheritance, may declare members without implementing them.
    Abstract,
}

impl fmt::Display for Inheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inheritance::Default => write!(f, "default"),
            Inheritance::Virtual => write!(f, "virtual"),
            Inheritance::Abstract => write!(f, "abstract"),
        }
    }
}

/// Modifiers attached to a component or function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Inheritance mode.
    pub inheritance: Inheritance,
}

impl Modifiers {
    pub const DEFAULT: Modifiers = Modifiers::new(Inheritance::Default);
    pub const VIRTUAL: Modifiers = Modifiers::new(Inheritance::Virtual);
    pub const ABSTRACT: Modifiers = Modifiers::new(Inheritance::Abstract);

    /// Create modifiers with the given inheritance mode.
    pub const fn new(inheritance: Inheritance) -> Self {
        Self { inheritance }
    }

    /// Whether this is `ABSTRACT`.
    pub fn is_abstract(&self) -> bool {
        self.inheritance == Inheritance::Abstract
    }

    /// Whether other classes may inherit from the owner (`VIRTUAL` or `ABSTRACT`).
    pub fn is_inheritable(&self) -> bool {
        matches!(
            self.inheritance,
            Inheritance::Virtual | Inheritance::Abstract
        )
    }
}

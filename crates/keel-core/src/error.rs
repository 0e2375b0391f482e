//! Error types.
//!
//! ## Error Hierarchy
//!
//! ```text
//! KeelError (top-level wrapper)
//! ├── RegistrationError - component/scope construction errors (fatal)
//! └── RuntimeError      - invocation and protocol errors
//! ```
//!
//! Lookups that simply find nothing (an unknown function, a type with no
//! such property) are not errors: they return `None`, and turning a miss into
//! a user-facing diagnostic is the analyzer's job. Subtype checks never fail,
//! they answer `false`.

use thiserror::Error;

use crate::ids::ComponentId;

/// Convenience alias for results carrying a [`KeelError`].
pub type Result<T> = std::result::Result<T, KeelError>;

// ============================================================================
// Top-level
// ============================================================================

/// Any error produced by the type system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeelError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while building components and populating scopes.
///
/// These indicate a malformed standard library or an invalid program and
/// abort setup at the point of construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The component kind does not allow this supertype.
    #[error("'{component}' cannot inherit '{supertype}': {reason}")]
    IllegalInheritance {
        component: String,
        supertype: String,
        reason: &'static str,
    },

    /// Adding this supertype would close an inheritance cycle.
    #[error("'{component}' cannot inherit '{supertype}': inheritance cycle")]
    InheritanceCycle {
        component: String,
        supertype: String,
    },

    /// Only references to components can be inherited.
    #[error("'{component}' cannot inherit non-reference type '{supertype}'")]
    InvalidSupertype {
        component: String,
        supertype: String,
    },

    /// A new overload is not disjoint with an existing one.
    #[error("overload '{new}' conflicts with existing '{existing}'")]
    NonDisjointOverload { existing: String, new: String },

    /// A non-abstract component inherits a declaration it does not implement.
    #[error("'{component}' must implement '{function}'")]
    MissingImplementation { component: String, function: String },

    /// Signature-only entries cannot be placed in a definition scope.
    #[error("cannot declare '{name}' without an implementation in a definition scope")]
    DeclarationInDefinitionScope { name: String },

    /// The scope belongs to a frozen layer.
    #[error("{scope} is frozen")]
    FrozenScope { scope: String },

    /// The component belongs to a frozen layer.
    #[error("component '{component}' is frozen")]
    FrozenComponent { component: String },

    /// A type required during registration was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised while invoking functions on runtime objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The function is a signature without an implementation.
    #[error("'{function}' has no implementation")]
    Unimplemented { function: String },

    /// Wrong number of arguments passed to an implementation.
    #[error("'{function}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// A payload did not have the expected shape.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A required protocol method is not defined for the type.
    #[error("'{protocol}' is not defined for {ty}")]
    MissingProtocol { protocol: &'static str, ty: String },

    /// Assignment through a property without a setter.
    #[error("property '{name}' is not mutable")]
    ImmutableProperty { name: String },

    /// The type names a component issued by some other type system.
    #[error("{component} does not belong to this type system")]
    ForeignComponent { component: ComponentId },

    /// Index outside the bounds of a list or tuple.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    /// Raised by a host implementation.
    #[error("{0}")]
    Native(String),
}

impl RuntimeError {
    /// Shorthand for a host implementation error.
    pub fn native(message: impl Into<String>) -> Self {
        RuntimeError::Native(message.into())
    }
}

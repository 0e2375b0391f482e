//! Core types for the keel type system.
//!
//! This crate holds the leaf value types shared by every other crate:
//!
//! - [`ids`]: stable arena indices for components and scopes
//! - [`modifiers`]: inheritance modes for components and functions
//! - [`ty`]: the closed [`Type`] sum type and its structural pieces
//! - [`bindings`]: generic substitution maps and variant erasure
//! - [`error`]: the registration/runtime error hierarchy
//!
//! Nothing here knows how components relate to each other; subtyping and
//! resolution live in `keel-registry`, which owns the component arena.

pub mod bindings;
pub mod error;
pub mod ids;
pub mod modifiers;
pub mod ty;

pub use bindings::Bindings;
pub use error::{KeelError, RegistrationError, Result, RuntimeError};
pub use ids::{ComponentId, ScopeId, builtins};
pub use modifiers::{Inheritance, Modifiers};
pub use ty::{Field, Generic, Reference, Struct, Tuple, Type, Variant};

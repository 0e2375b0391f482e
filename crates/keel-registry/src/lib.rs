//! Component arena, scopes and type relations.
//!
//! This crate owns everything that needs the component table to answer:
//!
//! - [`TypeSystem`]: the arena of components and scopes, frozen into a
//!   shareable [`FrozenTypeSystem`] once built
//! - the subtype relation with generic inference
//! - overload resolution and disjointness
//! - inheritance and member propagation
//! - method/property lookup on types and the [`Object`] runtime bridge
//!
//! # Example
//!
//! ```
//! use keel_core::{Modifiers, Type};
//! use keel_registry::TypeSystem;
//!
//! let mut types = TypeSystem::new();
//! let root = types.root_scope();
//! let number = types.create_class("Number", Modifiers::ABSTRACT, vec![], root).unwrap();
//! let integer = types.create_class("Integer", Modifiers::DEFAULT, vec![], root).unwrap();
//! types.inherit(integer, Type::named(number)).unwrap();
//!
//! assert!(types.is_subtype(&Type::named(integer), &Type::named(number)));
//! ```

mod component;
mod disjoint;
mod display;
mod function;
mod inherit;
mod member;
mod object;
mod resolve;
mod scope;
mod subtype;
mod type_system;

#[cfg(test)]
mod test_fixtures;

pub use component::{Component, ComponentKind};
pub use display::{SignatureDisplay, TypeDisplay};
pub use function::{
    CallContext, Function, FunctionDecl, FunctionDef, NativeFn, Variable, VariableDecl,
};
pub use member::{BoundMethod, BoundProperty, Method, Property};
pub use object::{Hashable, Object, Value};
pub use resolve::ScopeChain;
pub use scope::{Scope, ScopeKind};
pub use type_system::{FrozenTypeSystem, TypeSystem};

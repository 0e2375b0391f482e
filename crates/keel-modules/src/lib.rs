//! Standard library modules for the keel type system.
//!
//! - **core** - primitive components (`Void`, `Boolean`, `Number`, `Integer`,
//!   `Decimal`, `String`), the `Equatable`/`Comparable`/`Hashable` protocols
//!   and the default `Any.toString`
//! - **number** - numeric comparison, hashing and arithmetic
//! - **string** - string comparison, concatenation and `size`
//! - **list** - the `List<T>` component
//!
//! # Usage
//!
//! Each module provides a function that returns a [`Module`], installed into
//! a scope in dependency order:
//!
//! ```
//! use keel_registry::TypeSystem;
//!
//! let mut types = TypeSystem::new();
//! let root = types.root_scope();
//! for module in keel_modules::default_modules() {
//!     module.install(&mut types, root).unwrap();
//! }
//! assert!(types.lookup_type(root, "List").is_some());
//! ```

pub mod core;
pub mod list;
pub mod number;
pub mod string;

use std::fmt;

use keel_core::{ComponentId, RegistrationError, ScopeId, Type};
use keel_registry::{CallContext, FunctionDecl, Object, TypeSystem, Value, VariableDecl};
use tracing::debug;

/// Populates a scope with components and functions.
pub type Installer = fn(&mut TypeSystem, ScopeId) -> Result<(), RegistrationError>;

/// A named unit of standard library registration.
#[derive(Clone, Copy)]
pub struct Module {
    name: &'static str,
    install: Installer,
}

impl Module {
    pub const fn new(name: &'static str, install: Installer) -> Self {
        Self { name, install }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register this module's contents in `scope`.
    pub fn install(
        &self,
        types: &mut TypeSystem,
        scope: ScopeId,
    ) -> Result<(), RegistrationError> {
        debug!(module = self.name, %scope, "installing module");
        (self.install)(types, scope)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module").field("name", &self.name).finish()
    }
}

/// Every standard module, in dependency order.
pub fn default_modules() -> Vec<Module> {
    vec![
        core::module(),
        number::module(),
        string::module(),
        list::module(),
    ]
}

// ============================================================================
// Registration Helpers
// ============================================================================

/// Find a component registered by an earlier module.
pub(crate) fn require(
    types: &TypeSystem,
    scope: ScopeId,
    name: &str,
) -> Result<ComponentId, RegistrationError> {
    types
        .lookup_type(scope, name)
        .and_then(Type::component)
        .ok_or_else(|| RegistrationError::TypeNotFound(name.to_string()))
}

/// A signature from `(name, type)` parameter pairs.
pub(crate) fn signature(name: &str, parameters: &[(&str, Type)], returns: Type) -> FunctionDecl {
    FunctionDecl::new(
        name,
        parameters
            .iter()
            .map(|(name, ty)| VariableDecl::new(*name, ty.clone()))
            .collect(),
        returns,
    )
}

/// A result object typed by the resolved signature.
pub(crate) fn returning(ctx: &CallContext<'_>, value: Value) -> Object {
    Object::new(ctx.returns().clone(), value)
}

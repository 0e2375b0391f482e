//! The initialized, frozen standard library.
//!
//! A `Library` owns the type system produced by installing modules into a
//! fresh root scope. It is immutable once built; programs layer on top of it
//! through [`Library::program`].
//!
//! # Example
//!
//! ```
//! use keel::Library;
//!
//! let library = Library::with_default_modules().unwrap();
//! let mut program = library.program();
//! let scope = program.scope();
//! let point = program.types_mut().create_struct("Point", vec![], scope).unwrap();
//! assert_eq!(program.types().component(point).name(), "Point");
//! ```

use std::cell::OnceCell;

use keel_core::{RegistrationError, ScopeId, Type};
use keel_modules::{Module, default_modules};
use keel_registry::{FrozenTypeSystem, TypeSystem};
use tracing::debug;

use crate::program::Program;

/// A frozen type system with its installed modules.
#[derive(Debug, Clone)]
pub struct Library {
    types: FrozenTypeSystem,
    modules: Vec<&'static str>,
}

impl Library {
    /// Start configuring a library.
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    /// Build a library with every standard module installed.
    ///
    /// # Errors
    ///
    /// Returns an error if a module fails to register.
    pub fn with_default_modules() -> Result<Self, RegistrationError> {
        default_modules()
            .into_iter()
            .fold(Self::builder(), LibraryBuilder::install)
            .build()
    }

    pub fn types(&self) -> &FrozenTypeSystem {
        &self.types
    }

    pub fn root_scope(&self) -> ScopeId {
        self.types.root_scope()
    }

    /// Names of the installed modules, in installation order.
    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    /// Look a type up by name in the library root.
    pub fn lookup_type(&self, name: &str) -> Option<&Type> {
        self.types.lookup_type(self.root_scope(), name)
    }

    /// Create a program whose scope is a child of the library root.
    pub fn program(&self) -> Program {
        Program::new(self.types.extend())
    }
}

/// Collects modules for a [`Library`].
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    modules: Vec<Module>,
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a module. Modules install in the order they were added.
    pub fn install(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Install every queued module into a fresh root scope and freeze.
    ///
    /// # Errors
    ///
    /// Returns the first registration error. A module whose dependencies were
    /// not installed before it fails with [`RegistrationError::TypeNotFound`].
    pub fn build(self) -> Result<Library, RegistrationError> {
        let mut types = TypeSystem::new();
        let root = types.root_scope();
        for module in &self.modules {
            module.install(&mut types, root)?;
        }
        debug!(
            modules = self.modules.len(),
            components = types.component_count(),
            "library built"
        );
        Ok(Library {
            types: types.freeze(),
            modules: self.modules.iter().map(Module::name).collect(),
        })
    }
}

thread_local! {
    static DEFAULT_LIBRARY: OnceCell<Result<Library, RegistrationError>> =
        const { OnceCell::new() };
}

/// The default library for the current thread, built on first use.
///
/// # Errors
///
/// Returns the registration error if the standard modules failed to install.
pub fn library() -> Result<Library, RegistrationError> {
    DEFAULT_LIBRARY.with(|cell| {
        cell.get_or_init(Library::with_default_modules).clone()
    })
}

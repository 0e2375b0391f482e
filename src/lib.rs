//! keel: a nominal type system with generics, structural types and overload
//! resolution, plus the runtime bridge for invoking resolved members.
//!
//! The lifecycle has two phases:
//!
//! 1. A [`Library`] installs standard modules into a root scope and freezes.
//! 2. Each [`Program`] extends the library with a scope of its own.
//!
//! # Example
//!
//! ```
//! use keel::prelude::*;
//!
//! let library = keel::library().unwrap();
//! let integer = library.lookup_type("Integer").unwrap().clone();
//!
//! let two = Object::new(integer.clone(), Value::Integer(2));
//! let five = Object::new(integer.clone(), Value::Integer(5));
//! let less = two.methods(library.types(), "<", &[integer]).unwrap();
//! assert!(less.invoke(library.types(), &[five]).unwrap().as_boolean().unwrap());
//! ```

mod library;
mod program;

pub use library::{Library, LibraryBuilder, library};
pub use program::Program;

pub use keel_core;
pub use keel_modules;
pub use keel_registry;

pub mod prelude {
    pub use crate::{Library, LibraryBuilder, Program};
    pub use keel_core::{
        Bindings, ComponentId, Generic, KeelError, Modifiers, RegistrationError, RuntimeError,
        ScopeId, Type,
    };
    pub use keel_modules::Module;
    pub use keel_registry::{
        BoundMethod, BoundProperty, CallContext, Function, FunctionDecl, FrozenTypeSystem,
        Hashable, Method, Object, Property, TypeSystem, Value, Variable, VariableDecl,
    };
}

//! Shared fixtures for unit tests.

use keel_core::{ComponentId, Generic, Modifiers, Type};

use crate::function::{Function, FunctionDecl, VariableDecl};
use crate::type_system::TypeSystem;

/// A small hierarchy:
///
/// ```text
/// Any ─ Number (abstract) ─┬─ Integer
///                          └─ Decimal
/// List<T>
/// Container<T> (interface) ─ Box<E>
/// ```
pub struct Lattice {
    pub types: TypeSystem,
    pub number: ComponentId,
    pub integer: ComponentId,
    pub decimal: ComponentId,
    pub list: ComponentId,
    pub container: ComponentId,
    pub boxed: ComponentId,
}

impl Lattice {
    pub fn new() -> Self {
        let mut types = TypeSystem::new();
        let root = types.root_scope();

        let number = types
            .create_class("Number", Modifiers::ABSTRACT, vec![], root)
            .unwrap();
        let integer = types
            .create_class("Integer", Modifiers::DEFAULT, vec![], root)
            .unwrap();
        let decimal = types
            .create_class("Decimal", Modifiers::DEFAULT, vec![], root)
            .unwrap();
        types.inherit(integer, Type::named(number)).unwrap();
        types.inherit(decimal, Type::named(number)).unwrap();

        let element = vec![Generic::unbounded("T")];
        let list = types
            .create_class("List", Modifiers::DEFAULT, element, root)
            .unwrap();

        let container = types
            .create_interface("Container", vec![Generic::unbounded("T")], root)
            .unwrap();
        let contents = vec![Generic::unbounded("E")];
        let boxed = types
            .create_class("Box", Modifiers::DEFAULT, contents, root)
            .unwrap();
        types
            .inherit(
                boxed,
                Type::reference(container, vec![Type::generic("E", Type::any())]),
            )
            .unwrap();

        Self {
            types,
            number,
            integer,
            decimal,
            list,
            container,
            boxed,
        }
    }

    pub fn number(&self) -> Type {
        Type::named(self.number)
    }

    pub fn integer(&self) -> Type {
        Type::named(self.integer)
    }

    pub fn decimal(&self) -> Type {
        Type::named(self.decimal)
    }

    pub fn list(&self, element: Type) -> Type {
        Type::reference(self.list, vec![element])
    }
}

/// `name(x: parameter): returns`, implemented as the identity.
pub fn unary(name: &str, parameter: Type, returns: Type) -> Function {
    Function::native(
        FunctionDecl::new(name, vec![VariableDecl::new("x", parameter)], returns),
        |ctx| Ok(ctx.this()?.clone()),
    )
}

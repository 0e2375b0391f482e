//! Human-readable rendering of types and signatures.

use std::fmt;

use keel_core::{Field, Type, builtins};

use crate::function::FunctionDecl;
use crate::type_system::TypeSystem;

/// A [`Type`] rendered with component names, e.g. `List<Integer>`.
pub struct TypeDisplay<'a> {
    types: &'a TypeSystem,
    ty: &'a Type,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(types: &'a TypeSystem, ty: &'a Type) -> Self {
        Self { types, ty }
    }

    fn nested(&self, ty: &'a Type) -> Self {
        Self::new(self.types, ty)
    }

    fn field(&self, f: &mut fmt::Formatter<'_>, field: &'a Field) -> fmt::Result {
        if field.mutable {
            write!(f, "var ")?;
        }
        write!(f, "{}", self.nested(&field.ty))
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Reference(r) => {
                match self.types.get_component(r.component) {
                    Some(component) => write!(f, "{}", component.name())?,
                    None => write!(f, "{}", r.component)?,
                }
                if !r.generics.is_empty() {
                    write!(f, "<")?;
                    for (i, g) in r.generics.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", self.nested(g))?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Type::Generic(g) => write!(f, "{}", g.name),
            Type::Variant(v) => match (&v.lower, &v.upper) {
                (None, None) => write!(f, "*"),
                (Some(lower), None) => write!(f, "in {}", self.nested(lower)),
                (None, Some(upper)) => write!(f, "out {}", self.nested(upper)),
                (Some(lower), Some(upper)) => {
                    write!(f, "in {} out {}", self.nested(lower), self.nested(upper))
                }
            },
            Type::Tuple(t) => {
                write!(f, "(")?;
                for (i, field) in t.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.field(f, field)?;
                }
                write!(f, ")")
            }
            Type::Struct(s) => {
                write!(f, "{{")?;
                for (i, field) in s.fields.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", field.name)?;
                    self.field(f, field)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A signature rendered as `name(A, B): R`.
pub struct SignatureDisplay<'a> {
    types: &'a TypeSystem,
    declaration: &'a FunctionDecl,
}

impl<'a> SignatureDisplay<'a> {
    pub(crate) fn new(types: &'a TypeSystem, declaration: &'a FunctionDecl) -> Self {
        Self { types, declaration }
    }
}

impl fmt::Display for SignatureDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declaration.name)?;
        if !self.declaration.generics.is_empty() {
            write!(f, "<")?;
            for (i, g) in self.declaration.generics.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", g.name)?;
                if !matches!(g.bound.component(), Some(builtins::ANY)) {
                    write!(f, " : {}", self.types.display(&g.bound))?;
                }
            }
            write!(f, ">")?;
        }
        write!(f, "(")?;
        for (i, ty) in self.declaration.parameter_types().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.types.display(ty))?;
        }
        write!(f, "): {}", self.types.display(&self.declaration.returns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::VariableDecl;
    use keel_core::{Generic, Modifiers, Tuple};

    #[test]
    fn renders_references_and_structural_types() {
        let mut types = TypeSystem::new();
        let root = types.root_scope();
        let integer = types
            .create_class("Integer", Modifiers::DEFAULT, vec![], root)
            .unwrap();
        let list = types
            .create_class(
                "List",
                Modifiers::DEFAULT,
                vec![Generic::unbounded("T")],
                root,
            )
            .unwrap();
        let integer = Type::named(integer);

        let list_of = Type::reference(list, vec![integer.clone()]);
        assert_eq!(types.display(&list_of).to_string(), "List<Integer>");

        let fields = vec![(integer.clone(), false), (Type::any(), true)];
        let tuple = Type::Tuple(Tuple::new(fields));
        assert_eq!(types.display(&tuple).to_string(), "(Integer, var Any)");

        let record = Type::structure(vec![
            ("y", integer.clone(), true),
            ("x", integer.clone(), false),
        ]);
        assert_eq!(
            types.display(&record).to_string(),
            "{x: Integer, y: var Integer}"
        );

        let variant = Type::variant(Some(integer.clone()), None);
        assert_eq!(types.display(&variant).to_string(), "in Integer");
        assert_eq!(types.display(&Type::variant(None, None)).to_string(), "*");
    }

    #[test]
    fn renders_signatures() {
        let types = TypeSystem::new();
        let t = Type::generic("T", Type::any());
        let decl = FunctionDecl::new(
            "pair",
            vec![
                VariableDecl::new("a", t.clone()),
                VariableDecl::new("b", Type::any()),
            ],
            Type::tuple(vec![t.clone(), t]),
        )
        .with_generics(vec![Generic::unbounded("T")]);

        assert_eq!(
            types.display_signature(&decl).to_string(),
            "pair<T>(T, Any): (T, T)"
        );
    }
}

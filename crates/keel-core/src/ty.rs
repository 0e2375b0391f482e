//! Static type representation.
//!
//! [`Type`] is a closed sum type with five variants:
//!
//! - [`Reference`]: a component applied to generic arguments (`List<Integer>`)
//! - [`Generic`]: a named, bounded type parameter (`T : Number`)
//! - [`Variant`]: a use-site variance range at a single type-argument slot
//! - [`Tuple`]: an anonymous, positionally-indexed structural type
//! - [`Struct`]: an anonymous, name-indexed structural type
//!
//! Types are immutable values compared structurally. A reference stores the
//! component's arena index, so two references are equal iff they name the
//! same component with equal generic argument lists.
//!
//! The relations between types (subtyping, inference) need the component
//! arena and are implemented in `keel-registry`.

use std::collections::BTreeMap;

use crate::bindings::Bindings;
use crate::ids::{ComponentId, builtins};

// ============================================================================
// Type
// ============================================================================

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A named component applied to generic arguments.
    Reference(Reference),
    /// A type parameter.
    Generic(Generic),
    /// A use-site variance range.
    Variant(Variant),
    /// An anonymous tuple.
    Tuple(Tuple),
    /// An anonymous struct.
    Struct(Struct),
}

impl Type {
    /// The top type `Any`.
    pub fn any() -> Self {
        Type::named(builtins::ANY)
    }

    /// The `Dynamic` escape hatch.
    pub fn dynamic() -> Self {
        Type::named(builtins::DYNAMIC)
    }

    /// A reference to a component without generic arguments.
    pub fn named(component: ComponentId) -> Self {
        Type::Reference(Reference::new(component, Vec::new()))
    }

    /// A reference to a component applied to `generics`.
    pub fn reference(component: ComponentId, generics: Vec<Type>) -> Self {
        Type::Reference(Reference::new(component, generics))
    }

    /// A type parameter named `name` with upper bound `bound`.
    pub fn generic(name: impl Into<String>, bound: Type) -> Self {
        Type::Generic(Generic::new(name, bound))
    }

    /// A variance range. `Variant(None, None)` is fully unbound.
    pub fn variant(lower: Option<Type>, upper: Option<Type>) -> Self {
        Type::Variant(Variant::new(lower, upper))
    }

    /// An immutable tuple of the given element types.
    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(Tuple::new(
            elements.into_iter().map(|ty| (ty, false)).collect(),
        ))
    }

    /// A struct from `(name, type, mutable)` triples.
    pub fn structure<N: Into<String>>(fields: Vec<(N, Type, bool)>) -> Self {
        Type::Struct(Struct::new(fields))
    }

    /// Check if this is exactly `Any` (no generic arguments).
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Reference(r) if r.component == builtins::ANY)
    }

    /// Check if this is a `Dynamic` reference.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Reference(r) if r.component == builtins::DYNAMIC)
    }

    /// The referenced component, if this is a reference.
    pub fn component(&self) -> Option<ComponentId> {
        match self {
            Type::Reference(r) => Some(r.component),
            _ => None,
        }
    }

    /// Borrow as a reference.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Type::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Borrow as a generic.
    pub fn as_generic(&self) -> Option<&Generic> {
        match self {
            Type::Generic(g) => Some(g),
            _ => None,
        }
    }

    /// Check whether any `Generic` occurs anywhere in this type.
    pub fn contains_generics(&self) -> bool {
        match self {
            Type::Reference(r) => r.generics.iter().any(Type::contains_generics),
            Type::Generic(_) => true,
            Type::Variant(v) => {
                v.lower.as_deref().is_some_and(Type::contains_generics)
                    || v.upper.as_deref().is_some_and(Type::contains_generics)
            }
            Type::Tuple(t) => t.fields.iter().any(|f| f.ty.contains_generics()),
            Type::Struct(s) => s.fields.values().any(|f| f.ty.contains_generics()),
        }
    }

    /// Substitute generics according to `bindings`.
    ///
    /// Total: a generic absent from `bindings` is kept, with its bound
    /// substituted. A generic bound to itself (a rigid marker) is kept as is.
    pub fn bind(&self, bindings: &Bindings) -> Type {
        match self {
            Type::Reference(r) => Type::Reference(Reference::new(
                r.component,
                r.generics.iter().map(|g| g.bind(bindings)).collect(),
            )),
            Type::Generic(g) => match bindings.get(&g.name) {
                Some(Type::Generic(bound)) if bound.name == g.name => self.clone(),
                Some(replacement) => replacement.clone(),
                None => Type::Generic(Generic {
                    name: g.name.clone(),
                    bound: Box::new(g.bound.bind(bindings)),
                }),
            },
            Type::Variant(v) => Type::Variant(Variant {
                lower: v.lower.as_ref().map(|t| Box::new(t.bind(bindings))),
                upper: v.upper.as_ref().map(|t| Box::new(t.bind(bindings))),
            }),
            Type::Tuple(t) => Type::Tuple(Tuple {
                fields: t.fields.iter().map(|f| f.bind(bindings)).collect(),
            }),
            Type::Struct(s) => Type::Struct(Struct {
                fields: s
                    .fields
                    .iter()
                    .map(|(name, f)| (name.clone(), f.bind(bindings)))
                    .collect(),
            }),
        }
    }

    /// Replace every `Variant` by a concrete choice: `upper ?? lower ?? Any`.
    pub fn erase_variants(&self) -> Type {
        match self {
            Type::Reference(r) => Type::Reference(Reference::new(
                r.component,
                r.generics.iter().map(Type::erase_variants).collect(),
            )),
            Type::Generic(g) => Type::Generic(Generic {
                name: g.name.clone(),
                bound: Box::new(g.bound.erase_variants()),
            }),
            Type::Variant(v) => v.choice().erase_variants(),
            Type::Tuple(t) => Type::Tuple(Tuple {
                fields: t
                    .fields
                    .iter()
                    .map(|f| Field {
                        ty: f.ty.erase_variants(),
                        ..f.clone()
                    })
                    .collect(),
            }),
            Type::Struct(s) => Type::Struct(Struct {
                fields: s
                    .fields
                    .iter()
                    .map(|(name, f)| {
                        (
                            name.clone(),
                            Field {
                                ty: f.ty.erase_variants(),
                                ..f.clone()
                            },
                        )
                    })
                    .collect(),
            }),
        }
    }
}

impl From<Reference> for Type {
    fn from(value: Reference) -> Self {
        Type::Reference(value)
    }
}

impl From<Generic> for Type {
    fn from(value: Generic) -> Self {
        Type::Generic(value)
    }
}

impl From<Variant> for Type {
    fn from(value: Variant) -> Self {
        Type::Variant(value)
    }
}

// ============================================================================
// Variants
// ============================================================================

/// A component applied to generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// The referenced component.
    pub component: ComponentId,
    /// Generic arguments, empty for non-generic (or raw) references.
    pub generics: Vec<Type>,
}

impl Reference {
    pub fn new(component: ComponentId, generics: Vec<Type>) -> Self {
        Self {
            component,
            generics,
        }
    }
}

/// A named type parameter with an upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Generic {
    pub name: String,
    pub bound: Box<Type>,
}

impl Generic {
    pub fn new(name: impl Into<String>, bound: Type) -> Self {
        Self {
            name: name.into(),
            bound: Box::new(bound),
        }
    }

    /// A parameter bounded only by `Any`.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, Type::any())
    }

    /// This parameter as a type.
    pub fn to_type(&self) -> Type {
        Type::Generic(self.clone())
    }
}

/// A use-site variance range.
///
/// `upper` is the covariant ceiling (absent means `Any`), `lower` the
/// contravariant floor (absent means unbounded below).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Variant {
    pub lower: Option<Box<Type>>,
    pub upper: Option<Box<Type>>,
}

impl Variant {
    pub fn new(lower: Option<Type>, upper: Option<Type>) -> Self {
        Self {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
        }
    }

    /// Fully unbound: `Variant(None, None)`.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// The concrete type picked when a signature must be variant-free.
    pub fn choice(&self) -> Type {
        self.upper
            .as_deref()
            .or(self.lower.as_deref())
            .cloned()
            .unwrap_or_else(Type::any)
    }
}

/// A field of a tuple or struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name; tuple fields are named by their index.
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type, mutable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable,
        }
    }

    fn bind(&self, bindings: &Bindings) -> Field {
        Field {
            name: self.name.clone(),
            ty: self.ty.bind(bindings),
            mutable: self.mutable,
        }
    }
}

/// An anonymous tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    pub fields: Vec<Field>,
}

impl Tuple {
    /// Build from `(type, mutable)` pairs; fields are named by index.
    pub fn new(elements: Vec<(Type, bool)>) -> Self {
        Self {
            fields: elements
                .into_iter()
                .enumerate()
                .map(|(i, (ty, mutable))| Field::new(i.to_string(), ty, mutable))
                .collect(),
        }
    }
}

/// An anonymous struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Struct {
    pub fields: BTreeMap<String, Field>,
}

impl Struct {
    /// Build from `(name, type, mutable)` triples.
    pub fn new<N: Into<String>>(fields: Vec<(N, Type, bool)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, ty, mutable)| {
                    let name = name.into();
                    (name.clone(), Field::new(name, ty, mutable))
                })
                .collect(),
        }
    }
}

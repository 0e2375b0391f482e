//! The subtype relation with generic inference.
//!
//! `a <: b` is decided by a recursive walk over both types. When `b` mentions
//! generics that are not yet bound, the walk records what it learns in a
//! [`Bindings`] map: an unbound generic first becomes a [`Variant`] range with
//! the observed type as its floor, and later observations raise the floor or
//! lower the ceiling until the range is collapsed by
//! [`Bindings::resolved`].
//!
//! ## Rules
//!
//! | sub \ sup          | rule                                                  |
//! |--------------------|-------------------------------------------------------|
//! | `Dynamic` / any    | always holds                                          |
//! | any / `Generic`    | bind or check against the current binding             |
//! | any / `Variant`    | containment in the range                              |
//! | any / `Any`        | always holds                                          |
//! | `Generic` / any    | check the binding or the bound                        |
//! | `Variant` / any    | the ceiling must be a subtype                         |
//! | `C<..>` / `C<..>`  | per-slot: variant containment or invariance           |
//! | `C<..>` / `D<..>`  | walk `C`'s supertypes with generics substituted       |
//! | tuple / tuple      | width subtyping, mutable fields invariant             |
//! | struct / struct    | width subtyping by field name                         |
//!
//! Tuples and structs relate to named types through the builtin `Tuple<T>`
//! and `Struct<T>` components.
//!
//! ## Termination
//!
//! Inheritance is acyclic, but F-bounded generics (`T : Comparable<T>`),
//! inferred bindings that mention the generic itself, and recursive supertype
//! walks can revisit a question already being asked. The checker keeps the
//! pairs currently on the stack and answers `false` to a repeated one; it
//! also refuses to re-enter a generic's bound while that bound is being
//! checked.

use keel_core::{Bindings, Field, Generic, Reference, Struct, Tuple, Type, Variant, builtins};

use crate::type_system::TypeSystem;

impl TypeSystem {
    /// Check `sub <: sup` without keeping any inferred bindings.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        let mut bindings = Bindings::new();
        self.is_subtype_bound(sub, sup, &mut bindings)
    }

    /// Check `sup :> sub`.
    pub fn is_supertype(&self, sup: &Type, sub: &Type) -> bool {
        self.is_subtype(sub, sup)
    }

    /// Check `sub <: sup`, reading and extending `bindings`.
    ///
    /// `bindings` is only updated when the check succeeds.
    pub fn is_subtype_bound(&self, sub: &Type, sup: &Type, bindings: &mut Bindings) -> bool {
        let mut checker = Checker {
            types: self,
            bindings: bindings.clone(),
            in_progress: Vec::new(),
            bounding: Vec::new(),
        };
        let holds = checker.check(sub, sup);
        if holds {
            *bindings = checker.bindings;
        }
        holds
    }
}

struct Checker<'a> {
    types: &'a TypeSystem,
    bindings: Bindings,
    /// Pairs currently being checked further up the stack.
    in_progress: Vec<(Type, Type)>,
    /// Generics whose bound is currently being checked.
    bounding: Vec<String>,
}

impl Checker<'_> {
    fn check(&mut self, sub: &Type, sup: &Type) -> bool {
        if sub.is_dynamic() || sup.is_dynamic() {
            return true;
        }
        if !matches!(sub, Type::Generic(_)) && !matches!(sup, Type::Generic(_)) {
            return self.relate(sub, sup);
        }
        // Inference can feed a type back into the question that produced it.
        let key = (sub.clone(), sup.clone());
        if self.in_progress.contains(&key) {
            return false;
        }
        self.in_progress.push(key);
        let holds = self.relate(sub, sup);
        self.in_progress.pop();
        holds
    }

    fn relate(&mut self, sub: &Type, sup: &Type) -> bool {
        match (sub, sup) {
            (_, Type::Generic(g)) => self.check_generic_supertype(sub, g),
            (_, Type::Variant(v)) => self.check_variant_supertype(sub, v),
            (_, sup) if sup.is_any() => true,
            (Type::Generic(g), _) => self.check_generic_subtype(g, sup),
            (Type::Variant(v), _) => match &v.upper {
                Some(upper) => self.check(upper, sup),
                None => false,
            },
            (Type::Reference(a), Type::Reference(b)) if a.component == b.component => {
                self.check_same_component(a, b)
            }
            (Type::Reference(a), Type::Reference(_)) => self.check_inherited(a, sup),
            (Type::Reference(a), Type::Tuple(_) | Type::Struct(_)) => {
                let builtin = structural_builtin(sup);
                if a.component == builtin {
                    match a.generics.first() {
                        Some(inner) => self.check(inner, sup),
                        None => false,
                    }
                } else {
                    self.check_inherited(a, sup)
                }
            }
            (Type::Tuple(_) | Type::Struct(_), Type::Reference(b)) => {
                let builtin = structural_builtin(sub);
                if b.component == builtin {
                    match b.generics.first() {
                        Some(inner) => self.check(sub, inner),
                        None => true,
                    }
                } else {
                    let boxed = Reference::new(builtin, vec![sub.clone()]);
                    self.check_inherited(&boxed, sup)
                }
            }
            (Type::Tuple(a), Type::Tuple(b)) => self.check_tuple(a, b),
            (Type::Struct(a), Type::Struct(b)) => self.check_struct(a, b),
            _ => false,
        }
    }

    fn check_invariant(&mut self, a: &Type, b: &Type) -> bool {
        self.check(a, b) && self.check(b, a)
    }

    // ==========================================================================
    // Generics
    // ==========================================================================

    fn check_generic_supertype(&mut self, sub: &Type, g: &Generic) -> bool {
        if matches!(sub, Type::Generic(s) if s.name == g.name) {
            return true;
        }
        match self.bindings.get(&g.name).cloned() {
            None => {
                self.bindings
                    .insert(g.name.clone(), Type::variant(Some(sub.clone()), None));
                self.check_bound(g, sub)
            }
            Some(Type::Generic(rigid)) if rigid.name == g.name => false,
            Some(Type::Variant(range)) => {
                let lower = match range.lower.as_deref() {
                    None => sub.clone(),
                    Some(lower) => match self.join(lower, sub) {
                        Some(joined) => joined,
                        None => return false,
                    },
                };
                if let Some(upper) = range.upper.as_deref() {
                    if !self.check(&lower, upper) {
                        return false;
                    }
                }
                let upper = range.upper.as_deref().cloned();
                self.bindings
                    .insert(g.name.clone(), Type::variant(Some(lower.clone()), upper));
                self.check_bound(g, &lower)
            }
            Some(concrete) => self.check(sub, &concrete),
        }
    }

    fn check_generic_subtype(&mut self, g: &Generic, sup: &Type) -> bool {
        match self.bindings.get(&g.name).cloned() {
            None => self.check(&g.bound, sup),
            Some(Type::Generic(rigid)) if rigid.name == g.name => self.check(&g.bound, sup),
            Some(Type::Variant(range)) => {
                let upper = match range.upper.as_deref() {
                    None => sup.clone(),
                    Some(upper) => match self.meet(upper, sup) {
                        Some(met) => met,
                        None => return false,
                    },
                };
                if let Some(lower) = range.lower.as_deref() {
                    if !self.check(lower, &upper) {
                        return false;
                    }
                }
                let lower = range.lower.as_deref().cloned();
                self.bindings
                    .insert(g.name.clone(), Type::variant(lower, Some(upper)));
                true
            }
            Some(concrete) => self.check(&concrete, sup),
        }
    }

    /// Check `ty` against `g`'s bound unless that bound is already on the stack.
    fn check_bound(&mut self, g: &Generic, ty: &Type) -> bool {
        if g.bound.is_any() || self.bounding.contains(&g.name) {
            return true;
        }
        self.bounding.push(g.name.clone());
        let holds = self.check(ty, &g.bound);
        self.bounding.pop();
        holds
    }

    /// The larger of two comparable types.
    fn join(&mut self, a: &Type, b: &Type) -> Option<Type> {
        if self.check(a, b) {
            Some(b.clone())
        } else if self.check(b, a) {
            Some(a.clone())
        } else {
            None
        }
    }

    /// The smaller of two comparable types.
    fn meet(&mut self, a: &Type, b: &Type) -> Option<Type> {
        if self.check(a, b) {
            Some(a.clone())
        } else if self.check(b, a) {
            Some(b.clone())
        } else {
            None
        }
    }

    // ==========================================================================
    // Variants
    // ==========================================================================

    fn check_variant_supertype(&mut self, sub: &Type, sup: &Variant) -> bool {
        match sub {
            Type::Variant(inner) => {
                let upper_holds = match (&inner.upper, &sup.upper) {
                    (_, None) => true,
                    (Some(a), Some(b)) => self.check(a, b),
                    (None, Some(b)) => b.is_any(),
                };
                let lower_holds = match (&inner.lower, &sup.lower) {
                    (_, None) => true,
                    (Some(a), Some(b)) => self.check(b, a),
                    (None, Some(_)) => false,
                };
                upper_holds && lower_holds
            }
            _ => {
                let above_lower = match &sup.lower {
                    Some(lower) => self.check(lower, sub),
                    None => true,
                };
                let below_upper = match &sup.upper {
                    Some(upper) => self.check(sub, upper),
                    None => true,
                };
                above_lower && below_upper
            }
        }
    }

    // ==========================================================================
    // References
    // ==========================================================================

    fn check_same_component(&mut self, sub: &Reference, sup: &Reference) -> bool {
        // A raw reference accepts any instantiation.
        if sup.generics.is_empty() {
            return true;
        }
        if sub.generics.len() != sup.generics.len() {
            return false;
        }
        let covariant = sup.component == builtins::TUPLE || sup.component == builtins::STRUCT;
        sub.generics
            .iter()
            .zip(&sup.generics)
            .all(|(a, b)| match b {
                Type::Variant(_) => self.check(a, b),
                _ if covariant => self.check(a, b),
                _ => self.check_invariant(a, b),
            })
    }

    /// Walk the supertypes of `sub` looking for a path to `sup`.
    fn check_inherited(&mut self, sub: &Reference, sup: &Type) -> bool {
        let key = (Type::Reference(sub.clone()), sup.clone());
        if self.in_progress.contains(&key) {
            return false;
        }
        self.in_progress.push(key);

        let component = self.types.component(sub.component);
        let substitution = Bindings::from_generics(component.generics(), &sub.generics);
        let parents: Vec<Type> = component
            .inherits()
            .iter()
            .map(|parent| parent.bind(&substitution))
            .collect();

        let mut holds = false;
        for parent in &parents {
            let snapshot = self.bindings.clone();
            if self.check(parent, sup) {
                holds = true;
                break;
            }
            self.bindings = snapshot;
        }

        self.in_progress.pop();
        holds
    }

    // ==========================================================================
    // Structural Types
    // ==========================================================================

    fn check_tuple(&mut self, sub: &Tuple, sup: &Tuple) -> bool {
        if sub.fields.len() < sup.fields.len() {
            return false;
        }
        sub.fields
            .iter()
            .zip(&sup.fields)
            .all(|(a, b)| self.check_field(a, b))
    }

    fn check_struct(&mut self, sub: &Struct, sup: &Struct) -> bool {
        sup.fields.iter().all(|(name, b)| match sub.fields.get(name) {
            Some(a) => self.check_field(a, b),
            None => false,
        })
    }

    fn check_field(&mut self, sub: &Field, sup: &Field) -> bool {
        if sup.mutable && !sub.mutable {
            return false;
        }
        if sub.mutable || sup.mutable {
            self.check_invariant(&sub.ty, &sup.ty)
        } else {
            self.check(&sub.ty, &sup.ty)
        }
    }
}

/// The builtin component standing in for a structural type.
fn structural_builtin(ty: &Type) -> keel_core::ComponentId {
    match ty {
        Type::Struct(_) => builtins::STRUCT,
        _ => builtins::TUPLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::Lattice;

    #[test]
    fn reflexive_and_transitive() {
        let l = Lattice::new();
        let list_integer = l.list(l.integer());
        assert!(l.types.is_subtype(&l.integer(), &l.integer()));
        assert!(l.types.is_subtype(&list_integer, &list_integer));
        assert!(l.types.is_subtype(&l.integer(), &l.number()));
        assert!(l.types.is_subtype(&l.number(), &Type::any()));
        assert!(l.types.is_subtype(&l.integer(), &Type::any()));
        assert!(!l.types.is_subtype(&l.number(), &l.integer()));
        assert!(!l.types.is_subtype(&l.integer(), &l.decimal()));
    }

    #[test]
    fn dynamic_absorbs_both_directions() {
        let l = Lattice::new();
        assert!(l.types.is_subtype(&Type::dynamic(), &l.integer()));
        assert!(l.types.is_subtype(&l.integer(), &Type::dynamic()));
        let singleton = Type::tuple(vec![l.integer()]);
        assert!(l.types.is_subtype(&Type::dynamic(), &singleton));
    }

    #[test]
    fn generic_arguments_are_invariant() {
        let l = Lattice::new();
        let (integers, numbers) = (l.list(l.integer()), l.list(l.number()));
        assert!(!l.types.is_subtype(&integers, &numbers));
        assert!(!l.types.is_subtype(&numbers, &integers));
    }

    #[test]
    fn raw_reference_accepts_any_instantiation() {
        let l = Lattice::new();
        let integers = l.list(l.integer());
        assert!(l.types.is_subtype(&integers, &Type::named(l.list)));
    }

    #[test]
    fn generic_parameter_is_inferred() {
        let l = Lattice::new();
        let t = Type::generic("T", Type::any());
        let mut bindings = Bindings::new();
        let xs = l.list(l.integer());
        assert!(l.types.is_subtype_bound(&xs, &l.list(t), &mut bindings));
        assert_eq!(bindings.resolved().get("T"), Some(&l.integer()));
    }

    #[test]
    fn inference_widens_the_floor() {
        let l = Lattice::new();
        let t = Type::generic("T", Type::any());
        let mut bindings = Bindings::new();
        assert!(l.types.is_subtype_bound(&l.integer(), &t, &mut bindings));
        assert!(l.types.is_subtype_bound(&l.number(), &t, &mut bindings));
        assert_eq!(bindings.resolved().get("T"), Some(&l.number()));
    }

    #[test]
    fn inference_rejects_incomparable_observations() {
        let l = Lattice::new();
        let t = Type::generic("T", Type::any());
        let mut bindings = Bindings::new();
        assert!(l.types.is_subtype_bound(&l.integer(), &t, &mut bindings));
        let xs = l.list(l.integer());
        assert!(!l.types.is_subtype_bound(&xs, &t, &mut bindings));
        // A failed check leaves the bindings untouched.
        assert_eq!(bindings.resolved().get("T"), Some(&l.integer()));
    }

    #[test]
    fn generic_bound_is_enforced() {
        let l = Lattice::new();
        let t = Type::generic("T", l.number());
        assert!(l.types.is_subtype(&l.integer(), &t));
        assert!(!l.types.is_subtype(&l.list(l.integer()), &t));
    }

    #[test]
    fn rigid_generic_only_accepts_itself() {
        let l = Lattice::new();
        let generic = Generic::unbounded("T");
        let t = generic.to_type();
        let mut bindings = Bindings::rigid(&[generic]);
        assert!(!l.types.is_subtype_bound(&l.integer(), &t, &mut bindings));
        assert!(l.types.is_subtype_bound(&t, &t, &mut bindings));
    }

    #[test]
    fn unbound_generic_as_subtype_uses_its_bound() {
        let l = Lattice::new();
        let t = Type::generic("T", l.integer());
        assert!(l.types.is_subtype(&t, &l.number()));
        let u = Type::generic("U", Type::any());
        assert!(!l.types.is_subtype(&u, &l.number()));
    }

    #[test]
    fn variant_slots() {
        let l = Lattice::new();
        let out_number = l.list(Type::variant(None, Some(l.number())));
        let in_integer = l.list(Type::variant(Some(l.integer()), None));

        assert!(l.types.is_subtype(&l.list(l.integer()), &out_number));
        assert!(!l.types.is_subtype(&l.list(Type::any()), &out_number));
        assert!(l.types.is_subtype(&l.list(l.number()), &in_integer));
        assert!(!l.types.is_subtype(&l.list(l.decimal()), &in_integer));
    }

    #[test]
    fn variant_containment() {
        let l = Lattice::new();
        let out_integer = Type::variant(None, Some(l.integer()));
        let out_number = Type::variant(None, Some(l.number()));
        let star = Type::variant(None, None);

        assert!(l.types.is_subtype(&out_integer, &out_number));
        assert!(!l.types.is_subtype(&out_number, &out_integer));
        assert!(l.types.is_subtype(&out_number, &star));
        assert!(!l.types.is_subtype(&star, &out_number));

        let in_number = Type::variant(Some(l.number()), None);
        let in_integer = Type::variant(Some(l.integer()), None);
        assert!(l.types.is_subtype(&in_number, &in_integer));
        assert!(!l.types.is_subtype(&in_integer, &in_number));
    }

    #[test]
    fn variant_subtype_uses_upper() {
        let l = Lattice::new();
        let upper = Type::variant(None, Some(l.integer()));
        let lower = Type::variant(Some(l.integer()), None);
        assert!(l.types.is_subtype(&upper, &l.number()));
        assert!(!l.types.is_subtype(&lower, &l.number()));
    }

    #[test]
    fn tuple_width_subtyping() {
        let l = Lattice::new();
        let wide = Type::tuple(vec![l.integer(), l.decimal()]);
        let narrow = Type::tuple(vec![l.number()]);
        assert!(l.types.is_subtype(&wide, &narrow));
        assert!(!l.types.is_subtype(&narrow, &wide));
    }

    #[test]
    fn mutable_fields_are_invariant() {
        let l = Lattice::new();
        let mutable_integer = Type::Tuple(Tuple::new(vec![(l.integer(), true)]));
        let mutable_number = Type::Tuple(Tuple::new(vec![(l.number(), true)]));
        let immutable_number = Type::Tuple(Tuple::new(vec![(l.number(), false)]));

        assert!(!l.types.is_subtype(&mutable_integer, &mutable_number));
        assert!(!l.types.is_subtype(&immutable_number, &mutable_number));
        assert!(l.types.is_subtype(&mutable_number, &mutable_number));
        assert!(!l.types.is_subtype(&mutable_integer, &immutable_number));
    }

    #[test]
    fn struct_width_subtyping() {
        let l = Lattice::new();
        let point = Type::structure(vec![("x", l.integer(), false), ("y", l.integer(), false)]);
        let x_only = Type::structure(vec![("x", l.number(), false)]);
        let z_only = Type::structure(vec![("z", l.number(), false)]);
        assert!(l.types.is_subtype(&point, &x_only));
        assert!(!l.types.is_subtype(&x_only, &point));
        assert!(!l.types.is_subtype(&point, &z_only));
    }

    #[test]
    fn structural_types_relate_to_builtins() {
        let l = Lattice::new();
        let pair = Type::tuple(vec![l.integer(), l.integer()]);
        assert!(l.types.is_subtype(&pair, &Type::named(builtins::TUPLE)));
        assert!(l.types.is_subtype(&pair, &Type::any()));
        assert!(!l.types.is_subtype(&pair, &Type::named(builtins::STRUCT)));

        let boxed = Type::reference(builtins::TUPLE, vec![pair.clone()]);
        assert!(l.types.is_subtype(&boxed, &Type::tuple(vec![l.number()])));
        assert!(l.types.is_subtype(&pair, &boxed));
    }

    #[test]
    fn inherited_generics_are_substituted() {
        let l = Lattice::new();
        // Box<E> inherits Container<E>.
        let boxed = Type::reference(l.boxed, vec![l.integer()]);
        let integers = Type::reference(l.container, vec![l.integer()]);
        let numbers = Type::reference(l.container, vec![l.number()]);
        assert!(l.types.is_subtype(&boxed, &integers));
        assert!(!l.types.is_subtype(&boxed, &numbers));
    }
}

//! Inheritance and member propagation.
//!
//! [`TypeSystem::inherit`] records a supertype on a component and copies the
//! supertype's methods into the component's member scope. A method is any
//! function of arity one or more whose first parameter (the receiver)
//! accepts the supertype. Copied signatures have the supertype's generics
//! substituted, so `Point` inheriting `Equatable<Point>` gets
//! `==(Equatable<Point>, Point)`.
//!
//! A local method that overlaps an inherited one overrides it. An inherited
//! declaration that is not overridden is an error for a concrete component
//! and is carried along for an abstract one.

use keel_core::{Bindings, ComponentId, Reference, RegistrationError, Type, builtins};
use petgraph::algo::has_path_connecting;
use tracing::{debug, trace};

use crate::component::ComponentKind;
use crate::function::Function;
use crate::type_system::TypeSystem;

impl TypeSystem {
    /// Make `supertype` a supertype of `component`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn inherit(
        &mut self,
        component: ComponentId,
        supertype: Type,
    ) -> Result<(), RegistrationError> {
        let Type::Reference(reference) = &supertype else {
            return Err(RegistrationError::InvalidSupertype {
                component: self.component(component).name().to_string(),
                supertype: self.display(&supertype).to_string(),
            });
        };

        self.check_inheritance(component, reference, &supertype)?;
        self.check_cycle(component, reference.component, &supertype)?;
        self.component_mut(component)?;
        let inherited = self.inherited_methods(component, reference)?;

        debug!(
            component = self.component(component).name(),
            supertype = %self.display(&supertype),
            methods = inherited.len(),
            "inherit"
        );
        let scope = self.component(component).scope();
        self.component_mut(component)?
            .inherits
            .push(supertype.clone());
        self.hierarchy.add_edge(component, reference.component, ());
        for (key, function) in inherited {
            self.scope_mut(scope)?.insert_function(key, function);
        }
        Ok(())
    }

    fn check_inheritance(
        &self,
        component: ComponentId,
        reference: &Reference,
        supertype: &Type,
    ) -> Result<(), RegistrationError> {
        let sub = self.component(component);
        let sup = self.component(reference.component);
        let illegal = match sub.kind() {
            ComponentKind::Struct => (reference.component != builtins::STRUCT
                && sup.kind() != ComponentKind::Interface)
                .then_some("structs may only inherit Struct or interfaces"),
            ComponentKind::Class => (!sup.modifiers().is_inheritable())
                .then_some("classes may only inherit virtual or abstract components"),
            ComponentKind::Interface => (reference.component != builtins::ANY
                && sup.kind() != ComponentKind::Interface)
                .then_some("interfaces may only inherit Any or interfaces"),
        };
        match illegal {
            Some(reason) => Err(RegistrationError::IllegalInheritance {
                component: sub.name().to_string(),
                supertype: self.display(supertype).to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn check_cycle(
        &self,
        component: ComponentId,
        supertype: ComponentId,
        ty: &Type,
    ) -> Result<(), RegistrationError> {
        // Base layers are acyclic and never point into this layer, so only
        // local edges can close a cycle.
        let closes = component == supertype
            || (self.hierarchy.contains_node(supertype)
                && self.hierarchy.contains_node(component)
                && has_path_connecting(&self.hierarchy, supertype, component, None));
        if closes {
            return Err(RegistrationError::InheritanceCycle {
                component: self.component(component).name().to_string(),
                supertype: self.display(ty).to_string(),
            });
        }
        Ok(())
    }

    /// The methods of `supertype` that `component` gains, keyed for its
    /// member scope.
    ///
    /// Nothing is modified here, so a failed `inherit` leaves the component
    /// as it was.
    fn inherited_methods(
        &self,
        component: ComponentId,
        supertype: &Reference,
    ) -> Result<Vec<(String, Function)>, RegistrationError> {
        let sup = self.component(supertype.component);
        let substitution = Bindings::from_generics(sup.generics(), &supertype.generics);
        let receiver = Type::Reference(supertype.clone());

        let target = self.component(component);
        let scope = self.scope(target.scope());
        let concrete = !target.is_abstract();

        let mut inherited: Vec<(String, Function)> = Vec::new();
        for (key, function) in self.scope(sup.scope()).functions() {
            if function.arity() == 0 {
                continue;
            }
            let function = function.bind(&substitution);
            if !self.is_subtype(&receiver, &function.parameters()[0].ty) {
                continue;
            }

            let overlaps = |local: &Function| {
                !self.signatures_disjoint(local.declaration(), function.declaration())
            };
            let mut locals = scope.functions_with_arity(key, function.arity());
            if locals.any(overlaps) {
                trace!(key, "inherited function overridden");
                continue;
            }

            if concrete && !function.is_definition() {
                return Err(RegistrationError::MissingImplementation {
                    component: target.name().to_string(),
                    function: self.display_signature(function.declaration()).to_string(),
                });
            }
            scope.accepts(function.is_definition(), function.name())?;

            let conflict = inherited.iter().find(|(other, existing)| {
                other == key
                    && existing.arity() == function.arity()
                    && !self.signatures_disjoint(existing.declaration(), function.declaration())
            });
            if let Some((_, existing)) = conflict {
                return Err(RegistrationError::NonDisjointOverload {
                    existing: self.display_signature(existing.declaration()).to_string(),
                    new: self.display_signature(function.declaration()).to_string(),
                });
            }
            inherited.push((key.to_string(), function));
        }
        Ok(inherited)
    }
}

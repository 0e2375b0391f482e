//! Overload disjointness.
//!
//! Two signatures overlap when some argument list could be accepted by both.
//! Overloads registered under the same key and arity in one scope must be
//! pairwise disjoint, which is what makes first-match resolution unambiguous.
//!
//! The check is conservative: each signature is first erased over its own
//! generics, then the two are disjoint only if some parameter position holds
//! types that are unrelated in both directions.

use crate::function::FunctionDecl;
use crate::type_system::TypeSystem;

impl TypeSystem {
    /// Check whether no call could apply to both `f` and `g`.
    pub fn is_disjoint(&self, f: &FunctionDecl, g: &FunctionDecl) -> bool {
        f.name != g.name || self.signatures_disjoint(f, g)
    }

    /// Disjointness of parameter lists, ignoring names.
    pub(crate) fn signatures_disjoint(&self, f: &FunctionDecl, g: &FunctionDecl) -> bool {
        if f.arity() != g.arity() {
            return true;
        }
        let f = f.erased();
        let g = g.erased();
        f.parameter_types()
            .zip(g.parameter_types())
            .any(|(x, y)| !self.is_subtype(x, y) && !self.is_subtype(y, x))
    }
}

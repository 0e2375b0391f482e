//! Generic substitution maps.
//!
//! A [`Bindings`] maps generic parameter names to types. It serves both as
//! the substitution applied by [`Type::bind`] and as the mutable inference
//! state written by subtype checks with inference.
//!
//! During inference a binding is usually a [`Variant`] whose bounds narrow as
//! more occurrences of the generic are observed. [`Bindings::resolved`]
//! collapses those ranges into concrete types before a signature is handed
//! back to callers.

use rustc_hash::FxHashMap;

use crate::ty::{Generic, Type};

/// Generic name to type map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    map: FxHashMap<String, Type>,
}

impl Bindings {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair each declared generic with its actual argument.
    ///
    /// Extra parameters without an argument are left unbound.
    pub fn from_generics(generics: &[Generic], arguments: &[Type]) -> Self {
        let map = generics
            .iter()
            .zip(arguments)
            .map(|(generic, argument)| {
                (generic.name.clone(), argument.clone())
            })
            .collect();
        Self { map }
    }

    /// Bind each generic to itself, marking it rigid for inference.
    ///
    /// A rigid generic is opaque: only the same-named generic (or `Dynamic`)
    /// is a subtype of it.
    pub fn rigid(generics: &[Generic]) -> Self {
        let map = generics
            .iter()
            .map(|generic| (generic.name.clone(), generic.to_type()))
            .collect();
        Self { map }
    }

    /// Bind each generic to its declared bound.
    ///
    /// Applying this to a signature monomorphizes it over the signature's own
    /// generics.
    pub fn erasing(generics: &[Generic]) -> Self {
        let map = generics
            .iter()
            .map(|generic| (generic.name.clone(), (*generic.bound).clone()))
            .collect();
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.map.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: Type) -> Option<Type> {
        self.map.insert(name.into(), ty)
    }

    pub fn remove(&mut self, name: &str) -> Option<Type> {
        self.map.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.map.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Whether `name` is bound to itself.
    pub fn is_rigid(&self, name: &str) -> bool {
        matches!(self.map.get(name), Some(Type::Generic(g)) if g.name == name)
    }

    /// Copy of this map with every variant range collapsed to a concrete type.
    pub fn resolved(&self) -> Bindings {
        let map = self
            .map
            .iter()
            .map(|(name, ty)| (name.clone(), ty.erase_variants()))
            .collect();
        Bindings { map }
    }
}

impl<N: Into<String>> FromIterator<(N, Type)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, Type)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentId;

    fn number() -> Type {
        Type::named(ComponentId::new(20))
    }

    #[test]
    fn from_generics_pairs_in_order() {
        let generics = [Generic::unbounded("K"), Generic::unbounded("V")];
        let bindings = Bindings::from_generics(&generics, &[number(), Type::any()]);
        assert_eq!(bindings.get("K"), Some(&number()));
        assert_eq!(bindings.get("V"), Some(&Type::any()));
    }

    #[test]
    fn from_generics_leaves_missing_arguments_unbound() {
        let generics = [Generic::unbounded("K"), Generic::unbounded("V")];
        let bindings = Bindings::from_generics(&generics, &[number()]);
        assert_eq!(bindings.len(), 1);
        assert!(!bindings.contains("V"));
    }

    #[test]
    fn rigid_and_erasing() {
        let generics = [Generic::new("T", number())];

        let rigid = Bindings::rigid(&generics);
        assert!(rigid.is_rigid("T"));

        let erasing = Bindings::erasing(&generics);
        assert!(!erasing.is_rigid("T"));
        assert_eq!(erasing.get("T"), Some(&number()));
    }

    #[test]
    fn resolved_collapses_variants() {
        let mut bindings = Bindings::new();
        bindings.insert("T", Type::variant(Some(number()), None));
        bindings.insert("U", Type::variant(None, None));

        let resolved = bindings.resolved();
        assert_eq!(resolved.get("T"), Some(&number()));
        assert_eq!(resolved.get("U"), Some(&Type::any()));
    }
}

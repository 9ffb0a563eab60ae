use crate::{
    all_tuples,
    ecs::{
        component::Component,
        types::{TypeId, TypeRegistry},
    },
};

/// A specification for a set of component types.
///
/// This is a sorted, de-duplicated vector of component ids. It backs the conjunctive "has all of
/// these components" checks used by filters and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spec {
    ids: Vec<TypeId>,
}

impl Spec {
    /// An empty component specification.
    pub const EMPTY: Self = Spec { ids: Vec::new() };

    /// Construct a new Spec from the given component ids.
    #[inline]
    pub fn new(ids: impl Into<Vec<TypeId>>) -> Self {
        let mut ids = ids.into();
        ids.sort();
        ids.dedup();
        ids.shrink_to_fit();

        Self { ids }
    }

    /// Get the component ids in this specification.
    #[inline]
    pub fn ids(&self) -> &[TypeId] {
        &self.ids
    }

    /// Determine if this specification contains the given component id.
    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Determine if this specification contains all component ids in the other specification.
    #[inline]
    pub fn contains_all(&self, other: &Spec) -> bool {
        other.ids.iter().all(|id| self.contains(*id))
    }

    /// Returns true if this spec is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of component ids in this spec.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl From<Vec<TypeId>> for Spec {
    #[inline]
    fn from(value: Vec<TypeId>) -> Self {
        Spec::new(value)
    }
}

/// Trait for converting a type, or a tuple of types, into a component specification.
pub trait IntoSpec {
    /// Convert the type into a component specification using the given registry.
    fn into_spec(registry: &TypeRegistry) -> Spec;
}

impl IntoSpec for () {
    fn into_spec(_registry: &TypeRegistry) -> Spec {
        Spec::EMPTY
    }
}

impl<C: Component> IntoSpec for C {
    fn into_spec(registry: &TypeRegistry) -> Spec {
        Spec::new([registry.id::<C>()])
    }
}

/// [`IntoSpec`] implementation for tuples of other [`IntoSpec`] types.
macro_rules! tuple_spec {
    ($($name: ident),*) => {
        impl<$($name: IntoSpec),*> IntoSpec for ($($name,)*) {
            fn into_spec(registry: &TypeRegistry) -> Spec {
                let mut ids = Vec::new();
                $(
                    ids.extend(<$name>::into_spec(registry).ids());
                )*
                Spec::new(ids)
            }
        }
    }
}

all_tuples!(tuple_spec);

#[cfg(test)]
mod tests {
    use rusty_macros::Component;

    use super::*;

    #[derive(Component)]
    pub struct Comp1;
    #[derive(Component)]
    pub struct Comp2;
    #[derive(Component)]
    pub struct Comp3;

    #[test]
    fn ids_are_sorted_and_deduped() {
        // Given
        let registry = TypeRegistry::new();
        let id1 = registry.id::<Comp1>();
        let id2 = registry.id::<Comp2>();
        let id3 = registry.id::<Comp3>();

        // When
        let spec = Spec::new(vec![id2, id1, id3, id2, id1]);

        // Then
        assert_eq!(spec.ids(), &[id1, id2, id3]);
        assert_eq!(spec, Spec::new(vec![id1, id2, id3]));
    }

    #[test]
    fn contains_all() {
        // Given
        let registry = TypeRegistry::new();
        let id1 = registry.id::<Comp1>();
        let id2 = registry.id::<Comp2>();
        let id3 = registry.id::<Comp3>();
        let wide = Spec::new(vec![id1, id2, id3]);
        let narrow = Spec::new(vec![id3, id1]);

        // Then
        assert!(wide.contains_all(&narrow));
        assert!(!narrow.contains_all(&wide));
        assert!(narrow.contains_all(&Spec::EMPTY));
    }

    #[test]
    fn tuple_into_spec() {
        // Given
        let registry = TypeRegistry::new();

        // When
        let spec = <(Comp3, Comp1)>::into_spec(&registry);

        // Then - ids are allocated in registration order, stored sorted
        assert_eq!(spec.ids(), &[TypeId::new(0), TypeId::new(1)]);
        assert!(spec.contains(registry.id::<Comp1>()));
        assert!(spec.contains(registry.id::<Comp3>()));
        assert!(!spec.contains(registry.id::<Comp2>()));
    }

    #[test]
    fn nested_tuple_into_spec() {
        // Given
        let registry = TypeRegistry::new();

        // When
        let spec = <(Comp1, (Comp2, Comp3))>::into_spec(&registry);

        // Then
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn unit_into_spec_is_empty() {
        // Given
        let registry = TypeRegistry::new();

        // Then
        assert!(<()>::into_spec(&registry).is_empty());
        assert!(registry.is_empty());
    }
}

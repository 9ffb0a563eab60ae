use std::{any::Any, collections::HashMap, fmt};

use fixedbitset::FixedBitSet;

use crate::ecs::{
    component::{Component, Spec},
    types::TypeId,
};

/// Type-erased storage for the components of a single entity.
///
/// Values are boxed behind `dyn Any` and keyed by their registry id. A bitset over the same ids
/// mirrors the key set so that membership and "has all of" checks never touch the map.
///
/// Only the crate inserts into or reads values out of a container; it always derives the id from
/// the component type, and every read is a checked downcast.
#[derive(Default)]
pub struct Container {
    values: HashMap<TypeId, Box<dyn Any>>,
    mask: FixedBitSet,
}

impl Container {
    /// Construct an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component value under `id`. If a value is already present, the new value is handed
    /// back untouched.
    pub(crate) fn insert<C: Component>(&mut self, id: TypeId, value: C) -> Result<&mut C, C> {
        if self.contains(id) {
            return Err(value);
        }
        let index = id.index();
        if index >= self.mask.len() {
            self.mask.grow(index + 1);
        }
        self.mask.insert(index);

        let slot = self.values.entry(id).or_insert(Box::new(value));
        // Just inserted as a `C`.
        Ok(slot
            .downcast_mut::<C>()
            .unwrap_or_else(|| unreachable!("component stored under a foreign id")))
    }

    /// Get a reference to the component stored under `id`.
    pub(crate) fn get<C: Component>(&self, id: TypeId) -> Option<&C> {
        self.values.get(&id)?.downcast_ref::<C>()
    }

    /// Get a mutable reference to the component stored under `id`.
    pub(crate) fn get_mut<C: Component>(&mut self, id: TypeId) -> Option<&mut C> {
        self.values.get_mut(&id)?.downcast_mut::<C>()
    }

    /// Remove and return the component stored under `id`.
    pub(crate) fn remove<C: Component>(&mut self, id: TypeId) -> Option<C> {
        let boxed = self.values.remove(&id)?;
        match boxed.downcast::<C>() {
            Ok(value) => {
                self.mask.set(id.index(), false);
                Some(*value)
            }
            Err(boxed) => {
                // Wrong type for this id; leave the container as it was.
                self.values.insert(id, boxed);
                None
            }
        }
    }

    /// Determine if a component is stored under `id`.
    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        self.mask.contains(id.index())
    }

    /// Determine if a component is stored for every id in `spec`.
    #[inline]
    pub fn contains_all(&self, spec: &Spec) -> bool {
        spec.ids().iter().all(|id| self.contains(*id))
    }

    /// Iterate the ids of all stored components in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.mask.ones().map(|index| TypeId::new(index as u64))
    }

    /// Get the specification of all stored components.
    pub fn spec(&self) -> Spec {
        Spec::new(self.ids().collect::<Vec<_>>())
    }

    /// Get the number of stored components.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no components are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids()).finish()
    }
}

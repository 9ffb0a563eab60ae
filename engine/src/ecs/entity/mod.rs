//! Entity handles and the slot store that owns entity records.
//!
//! # Architecture
//!
//! - **[`Entity`]**: A copyable handle combining a slot [`Id`] and a [`Generation`]. The id says
//!   which slot the entity lives in, the generation says which occupant of that slot the handle
//!   was issued for.
//!
//! - **[`Store`]**: Owns every entity [`Record`], allocates and recycles slots, and answers
//!   liveness checks for handles.
//!
//! - **[`Ref`] / [`RefMut`]**: Views over one live entity, giving typed access to its components.
//!
//! # Generation Tracking
//!
//! A slot's generation is bumped when the slot is reclaimed, before it goes back on the free list.
//! Handles still holding the old generation no longer match the slot and resolve to nothing, so a
//! recycled slot can never be reached through a stale handle:
//!
//! ```rust,ignore
//! let entity = store.create(); // Entity { id: 0, generation: 0 }
//! store.destroy(entity);       // invalid from here on
//! store.maintain();            // slot 0 reclaimed, generation bumped
//! let reused = store.create(); // Entity { id: 0, generation: 1 }
//! assert!(!store.is_valid(entity));
//! ```

mod reference;
mod store;

use std::fmt;

pub(crate) use reference::{attach, detach};
pub use reference::{Ref, RefMut};
pub use store::{Record, Store};

/// The generation of an entity slot, used to tell successive occupants of a slot apart.
/// The generation starts at `FIRST` and is incremented each time the slot is reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of a slot.
    pub const FIRST: Self = Self(0);

    /// Get the next generation from the current, or `None` once the counter is exhausted.
    #[inline]
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Get the raw generation value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// An entity slot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Id {
    /// Get the raw id value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// A handle to an entity.
///
/// Handles are plain values: copy them freely, store them in components, send them in events. A
/// handle never keeps its entity alive. Check liveness with
/// [`World::is_valid`](crate::ecs::World::is_valid) before dereferencing through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The slot the entity occupies.
    id: Id,

    /// The generation of the slot when this handle was issued.
    generation: Generation,
}

impl Entity {
    /// Construct a handle for the first generation of a slot.
    ///
    /// This is primarily used for testing.
    #[cfg(test)]
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    /// Construct a handle with an id and known generation.
    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    /// Get the slot id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the generation of this entity.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity's slot in indexable storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

/// Order by id first, then generation.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id.0, self.generation.0)
    }
}

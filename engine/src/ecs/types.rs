//! Runtime type identity for components and events.
//!
//! This module provides [`TypeRegistry`], a thread-safe registry that hands out a small, dense
//! numeric [`TypeId`] the first time a concrete type is asked about. Component containers and the
//! event bus key their type-erased storage by these ids instead of by `std::any::TypeId`, which is
//! neither ordered nor usable as a vector index.
//!
//! # Guarantees
//!
//! - The first request for a type allocates the next id from a monotonically increasing counter
//!   starting at 0.
//! - Every later request for the same type returns the same id.
//! - Two distinct types never share an id, and ids are never released or reused.
//!
//! # Thread Safety
//!
//! Lookups of an already-registered type are a sharded read on a `DashMap`. Only the first
//! registration of a type takes the shard's write lock, and the entry API makes that allocation
//! happen exactly once even when several threads race on the same new type.
//!
//! The registry is an explicit object rather than process-global state. Share one registry (it is
//! usually held in an `Arc`) between every world and bus that must agree on ids.
//!
//! # Example
//!
//! ```rust
//! use rusty_substrate::ecs::TypeRegistry;
//!
//! struct Position;
//! struct Velocity;
//!
//! let registry = TypeRegistry::new();
//! let position = registry.id::<Position>();
//!
//! assert_eq!(registry.id::<Position>(), position);
//! assert_ne!(registry.id::<Velocity>(), position);
//! ```

use std::{
    any::TypeId as StdTypeId,
    fmt,
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::DashMap;

/// A unique identifier for a registered type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u64);

impl TypeId {
    /// Construct a new id from a raw value.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value of this id.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Get the index of this id for use in indexable storage (e.g. Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for TypeId {
    #[inline]
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata recorded for a registered type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// The registry id.
    id: TypeId,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,

    /// The type's name, for diagnostics only.
    name: &'static str,
}

impl TypeInfo {
    fn new<T: 'static>(id: TypeId) -> Self {
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Get the registry id.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the type name. Not guaranteed to be stable across compiler versions.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A thread-safe registry of type ids.
pub struct TypeRegistry {
    /// Map from Rust TypeId to our id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, TypeId>,

    /// Registered type metadata indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<TypeInfo>>,

    /// Next available type identifier.
    next_id: AtomicU64,

    /// Next subscription sequence for every bus taking ids from this registry.
    next_sequence: AtomicU64,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl TypeRegistry {
    /// Create a new, empty type registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Get the id for `T`, allocating the next one if `T` has never been seen.
    pub fn id<T: 'static>(&self) -> TypeId {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered (shared read on one shard).
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return *existing;
        }

        // Slow path. The entry holds the shard's write lock, so only one caller allocates.
        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let value = self.next_id.fetch_add(1, Ordering::Relaxed);
                debug_assert_ne!(value, u64::MAX, "type id space exhausted");
                let id = TypeId(value);

                let mut types = self.types.write().unwrap();
                let index = id.index();
                // Ids from racing registrations of other types may land out of order.
                if index >= types.len() {
                    types.resize(index + 1, TypeInfo::new::<()>(TypeId::default()));
                }
                types[index] = TypeInfo::new::<T>(id);
                vacant.insert(id);

                id
            }
        }
    }

    /// Get the id for `T` only if it has already been registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<TypeId> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    /// Get type info by id.
    pub fn info(&self, id: TypeId) -> Option<TypeInfo> {
        let types = self.types.read().unwrap();
        // A placeholder left by an out-of-order registration has a mismatched id.
        types.get(id.index()).copied().filter(|info| info.id == id)
    }

    /// Get the name of a registered type, or `"<unregistered>"`.
    pub fn name(&self, id: TypeId) -> &'static str {
        self.info(id).map_or("<unregistered>", |info| info.name())
    }

    /// Take the next subscription sequence number. Never returns the same value twice.
    #[inline]
    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Get the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

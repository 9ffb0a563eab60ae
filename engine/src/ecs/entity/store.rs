use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, trace, warn};

use crate::ecs::{
    component::Container,
    entity::{Entity, Generation, Id},
    error::Error,
};

/// Everything the store keeps for one live entity: its components, the groups it was tagged with
/// and its place in the parent/child hierarchy.
#[derive(Debug, Default)]
pub struct Record {
    components: Container,
    groups: Vec<String>,
    parent: Option<Entity>,
    children: BTreeSet<Entity>,
}

impl Record {
    /// Get the components attached to this entity.
    #[inline]
    pub fn components(&self) -> &Container {
        &self.components
    }

    #[inline]
    pub(crate) fn components_mut(&mut self) -> &mut Container {
        &mut self.components
    }

    /// Get the (lowercase) names of the groups this entity belongs to.
    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Get the parent of this entity, if it has one.
    #[inline]
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Iterate the direct children of this entity in handle order.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = Entity> + '_ {
        self.children.iter().copied()
    }
}

#[derive(Debug)]
enum State {
    /// Free, or retired after its generation ran out.
    Vacant,
    Active(Record),
    /// Destroyed but not yet reclaimed. The record is dropped by `maintain`.
    Destroyed(Record),
}

#[derive(Debug)]
struct Slot {
    generation: Generation,
    state: State,
}

/// The slot table that owns every entity record.
///
/// Slots are allocated from a FIFO free list before the table grows. Destroying an entity only
/// marks its slot; the record is dropped and the slot's generation bumped on the next
/// [`maintain`](Store::maintain), so nothing is freed out from under an in-progress pass. A slot
/// whose generation cannot be bumped again is never handed out again.
#[derive(Debug, Default)]
pub struct Store {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    pending: Vec<u32>,
    groups: HashMap<String, Vec<Entity>>,
    active: usize,
}

impl Store {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty store with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Create a new active entity with no components.
    pub fn create(&mut self) -> Entity {
        let entity = match self.free.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.state = State::Active(Record::default());
                Entity::new_with_generation(Id(index), slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("entity id space exhausted"));
                self.slots.push(Slot {
                    generation: Generation::FIRST,
                    state: State::Active(Record::default()),
                });
                Entity::new_with_generation(Id(index), Generation::FIRST)
            }
        };
        self.active += 1;
        debug!("created entity {entity}");
        entity
    }

    /// Determine if the handle refers to a live entity.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Get the record of a live entity.
    pub fn get(&self, entity: Entity) -> Option<&Record> {
        match self.slots.get(entity.index()) {
            Some(Slot {
                generation,
                state: State::Active(record),
            }) if *generation == entity.generation() => Some(record),
            _ => None,
        }
    }

    /// Get the mutable record of a live entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut Record> {
        match self.slots.get_mut(entity.index()) {
            Some(Slot {
                generation,
                state: State::Active(record),
            }) if *generation == entity.generation() => Some(record),
            _ => None,
        }
    }

    /// Get the record of a live entity or a `NotFound` error.
    #[inline]
    pub fn resolve(&self, entity: Entity) -> Result<&Record, Error> {
        self.get(entity).ok_or(Error::NotFound(entity))
    }

    /// Get the mutable record of a live entity or a `NotFound` error.
    #[inline]
    pub fn resolve_mut(&mut self, entity: Entity) -> Result<&mut Record, Error> {
        self.get_mut(entity).ok_or(Error::NotFound(entity))
    }

    /// Destroy an entity and, depth first, all of its descendants.
    ///
    /// Every returned handle is invalid from this call on. The entity is detached from its parent
    /// and removed from its groups. A handle that is already invalid destroys nothing.
    pub fn destroy(&mut self, entity: Entity) -> Vec<Entity> {
        let Some(record) = self.get(entity) else {
            warn!("destroy called on invalid entity {entity}");
            return Vec::new();
        };
        if let Some(parent) = record.parent
            && let Some(parent) = self.get_mut(parent)
        {
            parent.children.remove(&entity);
        }

        let mut destroyed = Vec::new();
        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index()];
            let record = match std::mem::replace(&mut slot.state, State::Vacant) {
                State::Active(record) => record,
                other => {
                    // Children are always live while their parent is.
                    slot.state = other;
                    continue;
                }
            };
            // Reverse so the leftmost child is visited first.
            stack.extend(record.children.iter().rev().copied());
            for name in &record.groups {
                if let Some(members) = self.groups.get_mut(name) {
                    members.retain(|member| *member != current);
                }
            }
            slot.state = State::Destroyed(record);
            self.pending.push(current.id().value());
            self.active -= 1;
            destroyed.push(current);
        }
        self.groups.retain(|_, members| !members.is_empty());

        debug!("destroyed entity {entity} ({} total)", destroyed.len());
        destroyed
    }

    /// Reclaim the slots of destroyed entities, returning how many were reclaimed.
    ///
    /// Components of destroyed entities are dropped here. Each reclaimed slot gets the next
    /// generation and goes to the back of the free list, or is retired if its generations are
    /// used up.
    pub fn maintain(&mut self) -> usize {
        let reclaimed = self.pending.len();
        for index in self.pending.drain(..) {
            let slot = &mut self.slots[index as usize];
            if let State::Destroyed(record) = std::mem::replace(&mut slot.state, State::Vacant) {
                trace!(
                    "dropping {} components of slot {index}",
                    record.components().len()
                );
            }
            match slot.generation.next() {
                Some(generation) => {
                    slot.generation = generation;
                    self.free.push_back(index);
                    trace!("reclaimed slot {index} at generation {}", generation.value());
                }
                None => trace!("retired slot {index}"),
            }
        }
        reclaimed
    }

    /// Get the number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.active
    }

    /// Returns true if there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Get the number of destroyed entities awaiting [`maintain`](Store::maintain).
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Iterate every live entity in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &Record)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.state {
                State::Active(record) => Some((
                    Entity::new_with_generation(Id(index as u32), slot.generation),
                    record,
                )),
                _ => None,
            })
    }

    /// Tag an entity with a group name. Returns false if it was already a member.
    pub fn add_to_group(&mut self, entity: Entity, group: &str) -> Result<bool, Error> {
        let name = group.to_ascii_lowercase();
        let record = self.resolve_mut(entity)?;
        if record.groups.contains(&name) {
            return Ok(false);
        }
        record.groups.push(name.clone());
        self.groups.entry(name).or_default().push(entity);
        Ok(true)
    }

    /// Remove an entity from a group. Returns false if it was not a member.
    pub fn remove_from_group(&mut self, entity: Entity, group: &str) -> Result<bool, Error> {
        let name = group.to_ascii_lowercase();
        let record = self.resolve_mut(entity)?;
        let Some(position) = record.groups.iter().position(|g| *g == name) else {
            return Ok(false);
        };
        record.groups.swap_remove(position);
        if let Some(members) = self.groups.get_mut(&name) {
            members.retain(|member| *member != entity);
            if members.is_empty() {
                self.groups.remove(&name);
            }
        }
        Ok(true)
    }

    /// Determine if a live entity belongs to a group.
    pub fn is_in_group(&self, entity: Entity, group: &str) -> bool {
        let name = group.to_ascii_lowercase();
        self.get(entity)
            .is_some_and(|record| record.groups.contains(&name))
    }

    /// Get the live members of a group in the order they joined.
    pub fn group(&self, group: &str) -> &[Entity] {
        self.groups
            .get(&group.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    pub fn attach_child(&mut self, parent: Entity, child: Entity) -> Result<(), Error> {
        self.resolve(parent)?;
        let previous = self.resolve(child)?.parent;

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(Error::HierarchyCycle { parent, child });
            }
            cursor = self.get(current).and_then(|record| record.parent);
        }

        if previous == Some(parent) {
            return Ok(());
        }
        if let Some(previous) = previous
            && let Some(record) = self.get_mut(previous)
        {
            record.children.remove(&child);
        }
        self.resolve_mut(child)?.parent = Some(parent);
        self.resolve_mut(parent)?.children.insert(child);
        Ok(())
    }

    /// Detach `child` from `parent`. Returns false if `child` was not a child of `parent`.
    pub fn detach_child(&mut self, parent: Entity, child: Entity) -> Result<bool, Error> {
        self.resolve(parent)?;
        let record = self.resolve_mut(child)?;
        if record.parent != Some(parent) {
            return Ok(false);
        }
        record.parent = None;
        self.resolve_mut(parent)?.children.remove(&child);
        Ok(true)
    }

    /// Move `child` under `parent`, or make it a root when `parent` is `None` or no longer valid.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), Error> {
        match parent.filter(|parent| self.is_valid(*parent)) {
            Some(parent) => self.attach_child(parent, child),
            None => {
                if let Some(previous) = self.resolve(child)?.parent {
                    self.detach_child(previous, child)?;
                }
                Ok(())
            }
        }
    }
}

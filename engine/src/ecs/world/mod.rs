//! The World is the composition root for entities, their components and the event bus.
//!
//! A `World` owns the entity [`Store`](entity::Store) and a [`Bus`], and shares a [`TypeRegistry`]
//! with anything else that needs to agree on type ids. Every structural change made through the
//! world is announced on its bus:
//!
//! - [`ComponentsChanged`] after each single component attach or detach.
//! - [`EntityCreated`] once a new entity and all of its initial components exist.
//! - [`EntityRemoved`] for each entity taken down by [`destroy`](World::destroy), children included.
//!
//! # Errors
//!
//! Operations whose failure means a caller broke a precondition come in pairs. The `try_*` form
//! returns [`Error`]; the plain form panics with the same message. Liveness and membership checks
//! (`is_valid`, `has_component`, `is_in_group`) and `destroy` never fail.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use rusty_substrate::ecs::{Component, World, event::ComponentsChanged};
//!
//! #[derive(Component, Debug, PartialEq)]
//! struct Position { x: i32, y: i32 }
//!
//! let mut world = World::new();
//! let changed = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&changed);
//! world.events().subscribe(move |event: &ComponentsChanged| sink.borrow_mut().push(event.entity));
//!
//! let entity = world.create_entity();
//! world.add_component(entity, Position { x: 3, y: 4 });
//!
//! assert_eq!(*changed.borrow(), vec![entity]);
//! assert_eq!(world.get_component::<Position>(entity), &Position { x: 3, y: 4 });
//!
//! world.destroy(entity);
//! assert!(!world.is_valid(entity));
//! ```

mod config;

use std::sync::Arc;

use crate::ecs::{
    component::{Component, IntoSpec, Set, Spec, Target},
    entity::{self, Entity, Record, Ref, RefMut},
    error::Error,
    event::{Bus, ComponentsChanged, EntityCreated, EntityRemoved},
    types::{TypeId, TypeRegistry},
};

pub use config::Config;

/// Unwrap a fatal-tier result, panicking at the caller with the error's message.
#[track_caller]
fn fatal<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

#[track_caller]
fn assert_distinct<S: Set>(spec: &Spec) {
    assert!(
        S::LEN == spec.len(),
        "component set {} names the same component type twice",
        std::any::type_name::<S>()
    );
}

/// Applies a component set to one record, raising an event per component.
struct Attach<'a> {
    entity: Entity,
    record: &'a mut Record,
    registry: &'a TypeRegistry,
    events: &'a Bus,
}

impl Target for Attach<'_> {
    fn apply<C: Component>(&mut self, _id: TypeId, value: C) {
        // Callers check the whole set against the record first.
        let attached = entity::attach(self.entity, self.record, self.registry, self.events, value);
        if let Err(err) = attached {
            unreachable!("{err}");
        }
    }
}

/// The World owns every entity and the bus their changes are announced on.
///
/// The world is `!Send`: it lives on the thread that drives the update loop.
pub struct World {
    /// The registry component and event type ids come from.
    registry: Arc<TypeRegistry>,

    /// Every entity record.
    entities: entity::Store,

    /// The bus structural changes are raised on.
    events: Bus,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Construct a world with its own registry and default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Construct a world with its own registry.
    pub fn with_config(config: Config) -> Self {
        Self::with_registry(Arc::new(TypeRegistry::new()), config)
    }

    /// Construct a world that takes type ids from a shared registry.
    pub fn with_registry(registry: Arc<TypeRegistry>, config: Config) -> Self {
        Self {
            events: Bus::with_capacity(Arc::clone(&registry), config.event_capacity()),
            entities: entity::Store::with_capacity(config.entity_capacity()),
            registry,
        }
    }

    /// Get the registry this world takes type ids from.
    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Get the bus this world raises its events on. Consumers subscribe and raise their own
    /// events here too.
    #[inline]
    pub fn events(&self) -> &Bus {
        &self.events
    }

    /// Get the entity store.
    #[inline]
    pub fn store(&self) -> &entity::Store {
        &self.entities
    }

    // ==================== Entities ====================

    /// Create an entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.create();
        self.events.raise(EntityCreated { entity });
        entity
    }

    /// Create an entity with a component, or a tuple of components, attached.
    ///
    /// `ComponentsChanged` is raised for each component in set order, then `EntityCreated`.
    ///
    /// # Panics
    ///
    /// Panics if the set names the same component type twice.
    pub fn spawn<S: Set>(&mut self, set: S) -> Entity {
        let spec = S::into_spec(&self.registry);
        assert_distinct::<S>(&spec);

        let entity = self.entities.create();
        if let Some(record) = self.entities.get_mut(entity) {
            set.apply(
                &self.registry,
                &mut Attach {
                    entity,
                    record,
                    registry: &self.registry,
                    events: &self.events,
                },
            );
        }
        self.events.raise(EntityCreated { entity });
        entity
    }

    /// Determine if the handle refers to a live entity. Never fails, for any handle.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.entities.is_valid(entity)
    }

    /// Destroy an entity and all of its descendants.
    ///
    /// Handles to them are invalid as soon as this returns; their slots are reclaimed by
    /// [`maintain`](World::maintain). Returns false, and does nothing, for an invalid handle.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let destroyed = self.entities.destroy(entity);
        for entity in &destroyed {
            self.events.raise(EntityRemoved { entity: *entity });
        }
        !destroyed.is_empty()
    }

    /// Reclaim the slots of destroyed entities. Call at a point where no pass over the world is in
    /// progress, such as the end of a frame. Returns the number of slots reclaimed.
    pub fn maintain(&mut self) -> usize {
        self.entities.maintain()
    }

    /// Get a read-only view of a live entity.
    pub fn try_entity(&self, entity: Entity) -> Result<Ref<'_>, Error> {
        let record = self.entities.resolve(entity)?;
        Ok(Ref::new(entity, record, &self.registry))
    }

    /// Get a read-only view of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[track_caller]
    pub fn entity(&self, entity: Entity) -> Ref<'_> {
        fatal(self.try_entity(entity))
    }

    /// Get a mutable view of a live entity.
    pub fn try_entity_mut(&mut self, entity: Entity) -> Result<RefMut<'_>, Error> {
        let record = self.entities.resolve_mut(entity)?;
        Ok(RefMut::new(entity, record, &self.registry, &self.events))
    }

    /// Get a mutable view of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[track_caller]
    pub fn entity_mut(&mut self, entity: Entity) -> RefMut<'_> {
        fatal(self.try_entity_mut(entity))
    }

    /// Get the number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get a snapshot of every live entity, in slot order.
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.iter().map(|(entity, _)| entity).collect()
    }

    /// Iterate the live entities that have every component in `S`.
    pub fn query<S: IntoSpec>(&self) -> impl Iterator<Item = Ref<'_>> + '_ {
        let spec = S::into_spec(&self.registry);
        self.entities
            .iter()
            .filter(move |(_, record)| record.components().contains_all(&spec))
            .map(|(entity, record)| Ref::new(entity, record, &self.registry))
    }

    /// Call `f` for every live entity that has every component in `S` when the pass starts.
    ///
    /// `f` may change the world freely. Entities destroyed during the pass are skipped; entities
    /// created during it are not visited.
    pub fn for_each<S: IntoSpec>(&mut self, mut f: impl FnMut(&mut World, Entity)) {
        let matching: Vec<Entity> = self.query::<S>().map(|entity| entity.entity()).collect();
        for entity in matching {
            if self.is_valid(entity) {
                f(self, entity);
            }
        }
    }

    // ==================== Components ====================

    /// Attach a component to a live entity.
    pub fn try_add_component<C: Component>(
        &mut self,
        entity: Entity,
        value: C,
    ) -> Result<&mut C, Error> {
        let record = self.entities.resolve_mut(entity)?;
        entity::attach(entity, record, &self.registry, &self.events, value)
    }

    /// Attach a component to a live entity and return it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or the entity already has a `C`.
    #[track_caller]
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> &mut C {
        fatal(self.try_add_component(entity, value))
    }

    /// Attach every component in a set to a live entity. Nothing is attached if the entity already
    /// has any of them.
    ///
    /// # Panics
    ///
    /// Panics if the set names the same component type twice.
    pub fn try_add_components<S: Set>(&mut self, entity: Entity, set: S) -> Result<(), Error> {
        let spec = S::into_spec(&self.registry);
        assert_distinct::<S>(&spec);

        let record = self.entities.resolve_mut(entity)?;
        if let Some(id) = spec
            .ids()
            .iter()
            .find(|id| record.components().contains(**id))
        {
            return Err(Error::DuplicateComponent {
                entity,
                component: self.registry.name(*id),
            });
        }
        set.apply(
            &self.registry,
            &mut Attach {
                entity,
                record,
                registry: &self.registry,
                events: &self.events,
            },
        );
        Ok(())
    }

    /// Attach every component in a set to a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid, the entity already has one of the components, or the set
    /// names the same component type twice.
    #[track_caller]
    pub fn add_components<S: Set>(&mut self, entity: Entity, set: S) {
        fatal(self.try_add_components(entity, set))
    }

    /// Get a component of a live entity.
    pub fn try_get_component<C: Component>(&self, entity: Entity) -> Result<&C, Error> {
        self.try_entity(entity)?
            .try_get::<C>()
            .ok_or_else(|| missing::<C>(entity))
    }

    /// Get a component of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or the component is not attached.
    #[track_caller]
    pub fn get_component<C: Component>(&self, entity: Entity) -> &C {
        fatal(self.try_get_component(entity))
    }

    /// Get a mutable component of a live entity.
    pub fn try_get_component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C, Error> {
        let record = self.entities.resolve_mut(entity)?;
        let Some(id) = self.registry.get::<C>() else {
            return Err(missing::<C>(entity));
        };
        record
            .components_mut()
            .get_mut::<C>(id)
            .ok_or_else(|| missing::<C>(entity))
    }

    /// Get a mutable component of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or the component is not attached.
    #[track_caller]
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        fatal(self.try_get_component_mut(entity))
    }

    /// Determine if a live entity has a `C`. False for invalid handles.
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.try_entity(entity)
            .is_ok_and(|entity| entity.has::<C>())
    }

    /// Determine if a live entity has every component in `S`. False for invalid handles.
    pub fn has_components<S: IntoSpec>(&self, entity: Entity) -> bool {
        self.try_entity(entity)
            .is_ok_and(|entity| entity.has_all::<S>())
    }

    /// Detach and return a component of a live entity.
    pub fn try_remove_component<C: Component>(&mut self, entity: Entity) -> Result<C, Error> {
        let record = self.entities.resolve_mut(entity)?;
        entity::detach(entity, record, &self.registry, &self.events)
    }

    /// Detach and return a component of a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or the component is not attached.
    #[track_caller]
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> C {
        fatal(self.try_remove_component(entity))
    }

    // ==================== Groups ====================

    /// Tag a live entity with a case-insensitive group name. Returns false if it already was.
    pub fn try_add_to_group(&mut self, entity: Entity, group: &str) -> Result<bool, Error> {
        self.entities.add_to_group(entity, group)
    }

    /// Tag a live entity with a case-insensitive group name. Returns false if it already was.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[track_caller]
    pub fn add_to_group(&mut self, entity: Entity, group: &str) -> bool {
        fatal(self.try_add_to_group(entity, group))
    }

    /// Remove a live entity from a group. Returns false if it was not a member.
    pub fn try_remove_from_group(&mut self, entity: Entity, group: &str) -> Result<bool, Error> {
        self.entities.remove_from_group(entity, group)
    }

    /// Remove a live entity from a group. Returns false if it was not a member.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[track_caller]
    pub fn remove_from_group(&mut self, entity: Entity, group: &str) -> bool {
        fatal(self.try_remove_from_group(entity, group))
    }

    /// Determine if a live entity is in a group. False for invalid handles.
    pub fn is_in_group(&self, entity: Entity, group: &str) -> bool {
        self.entities.is_in_group(entity, group)
    }

    /// Get the live members of a group, in the order they joined.
    pub fn group(&self, group: &str) -> Vec<Entity> {
        self.entities.group(group).to_vec()
    }

    // ==================== Hierarchy ====================

    /// Attach `child` under `parent`, moving it from any previous parent.
    pub fn try_attach_child(&mut self, parent: Entity, child: Entity) -> Result<(), Error> {
        self.entities.attach_child(parent, child)
    }

    /// Attach `child` under `parent`, moving it from any previous parent.
    ///
    /// # Panics
    ///
    /// Panics if either handle is invalid, or if `child` is `parent` or one of its ancestors.
    #[track_caller]
    pub fn attach_child(&mut self, parent: Entity, child: Entity) {
        fatal(self.try_attach_child(parent, child))
    }

    /// Detach `child` from `parent`. Returns false if it was not a child of `parent`.
    pub fn try_detach_child(&mut self, parent: Entity, child: Entity) -> Result<bool, Error> {
        self.entities.detach_child(parent, child)
    }

    /// Detach `child` from `parent`. Returns false if it was not a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is invalid.
    #[track_caller]
    pub fn detach_child(&mut self, parent: Entity, child: Entity) -> bool {
        fatal(self.try_detach_child(parent, child))
    }

    /// Move `child` under `parent`, or make it a root when `parent` is `None` or invalid.
    pub fn try_set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), Error> {
        self.entities.set_parent(child, parent)
    }

    /// Move `child` under `parent`, or make it a root when `parent` is `None` or invalid.
    ///
    /// # Panics
    ///
    /// Panics if `child` is invalid, or if `child` is `parent` or one of its ancestors.
    #[track_caller]
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) {
        fatal(self.try_set_parent(child, parent))
    }

    /// Get the parent of a live entity. `None` for roots and invalid handles.
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.entities.get(entity)?.parent()
    }

    /// Get the direct children of a live entity. Empty for invalid handles.
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.entities
            .get(entity)
            .map(|record| record.children().collect())
            .unwrap_or_default()
    }
}

fn missing<C: Component>(entity: Entity) -> Error {
    Error::MissingComponent {
        entity,
        component: std::any::type_name::<C>(),
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use rusty_macros::Component;

    use super::*;
    use crate::ecs::event::Change;

    #[derive(Component, Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Component, Debug, PartialEq)]
    struct Sprite(&'static str);

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Seen {
        Created(Entity),
        Changed(Entity, Change),
        Removed(Entity),
    }

    fn watch(world: &World) -> Rc<RefCell<Vec<Seen>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        world
            .events()
            .subscribe(move |e: &EntityCreated| sink.borrow_mut().push(Seen::Created(e.entity)));
        let sink = Rc::clone(&seen);
        world.events().subscribe(move |e: &ComponentsChanged| {
            sink.borrow_mut().push(Seen::Changed(e.entity, e.change))
        });
        let sink = Rc::clone(&seen);
        world
            .events()
            .subscribe(move |e: &EntityRemoved| sink.borrow_mut().push(Seen::Removed(e.entity)));
        seen
    }

    // ==================== Entities ====================

    #[test]
    fn create_entity_raises_created() {
        // Given
        let mut world = World::new();
        let seen = watch(&world);

        // When
        let entity = world.create_entity();

        // Then
        assert!(world.is_valid(entity));
        assert_eq!(*seen.borrow(), vec![Seen::Created(entity)]);
    }

    #[test]
    fn spawn_attaches_all_before_created() {
        // Given
        let mut world = World::new();
        let seen = watch(&world);

        // When
        let entity = world.spawn((Position { x: 42.0, y: 67.0 }, Velocity { dx: 0.0, dy: 1.0 }));

        // Then
        assert_eq!(
            *seen.borrow(),
            vec![
                Seen::Changed(entity, Change::Added),
                Seen::Changed(entity, Change::Added),
                Seen::Created(entity),
            ]
        );
        assert_eq!(
            world.get_component::<Position>(entity),
            &Position { x: 42.0, y: 67.0 }
        );
        assert_eq!(
            world.get_component::<Velocity>(entity),
            &Velocity { dx: 0.0, dy: 1.0 }
        );
    }

    #[test]
    #[should_panic(expected = "names the same component type twice")]
    fn spawn_with_duplicate_types_panics() {
        // Given
        let mut world = World::new();

        // When
        world.spawn((Sprite("a"), Sprite("b")));
    }

    #[test]
    fn destroy_raises_removed_and_invalidates() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        let seen = watch(&world);

        // When
        let destroyed = world.destroy(entity);
        let again = world.destroy(entity);

        // Then
        assert!(destroyed);
        assert!(!again);
        assert!(!world.is_valid(entity));
        assert_eq!(*seen.borrow(), vec![Seen::Removed(entity)]);
    }

    #[test]
    fn destroyed_handle_never_matches_new_entity() {
        // Given
        let mut world = World::new();
        let first = world.create_entity();
        world.destroy(first);
        world.maintain();

        // When
        let next = world.create_entity();

        // Then
        assert_eq!(next.id(), first.id());
        assert_ne!(next, first);
        assert!(!world.is_valid(first));
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn entity_for_invalid_handle_panics() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        world.destroy(entity);

        // When
        world.entity(entity);
    }

    #[test]
    fn entities_lists_live_in_slot_order() {
        // Given
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();
        world.destroy(b);

        // Then
        assert_eq!(world.entities(), vec![a, c]);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn entity_views() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Position { x: 1.0, y: 2.0 });

        // When
        world.entity_mut(entity).get_mut::<Position>().x = 9.0;

        // Then
        let view = world.entity(entity);
        assert_eq!(view.get::<Position>(), &Position { x: 9.0, y: 2.0 });
        assert!(!view.has::<Velocity>());
    }

    // ==================== Components ====================

    #[test]
    fn add_get_has_remove() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();

        // When
        world.add_component(entity, Position { x: 3.0, y: 4.0 });

        // Then
        assert!(world.has_component::<Position>(entity));
        assert_eq!(
            world.get_component::<Position>(entity),
            &Position { x: 3.0, y: 4.0 }
        );

        // When
        let removed = world.remove_component::<Position>(entity);

        // Then
        assert_eq!(removed, Position { x: 3.0, y: 4.0 });
        assert!(!world.has_component::<Position>(entity));
        assert!(matches!(
            world.try_get_component::<Position>(entity),
            Err(Error::MissingComponent { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "does not have component")]
    fn get_after_remove_panics() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Position { x: 0.0, y: 0.0 });
        world.remove_component::<Position>(entity);

        // When
        world.get_component::<Position>(entity);
    }

    #[test]
    #[should_panic(expected = "already has component")]
    fn add_duplicate_panics() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Position { x: 0.0, y: 0.0 });

        // When
        world.add_component(entity, Position { x: 1.0, y: 1.0 });
    }

    #[test]
    #[should_panic(expected = "does not have component")]
    fn remove_missing_panics() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();

        // When
        world.remove_component::<Velocity>(entity);
    }

    #[test]
    fn component_ops_on_invalid_handle() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        world.destroy(entity);

        // Then
        assert!(!world.has_component::<Position>(entity));
        assert!(!world.has_components::<(Position, Velocity)>(entity));
        assert_eq!(
            world
                .try_add_component(entity, Position { x: 0.0, y: 0.0 })
                .map(|_| ()),
            Err(Error::NotFound(entity))
        );
        assert_eq!(
            world.try_get_component::<Position>(entity).map(|_| ()),
            Err(Error::NotFound(entity))
        );
        assert_eq!(
            world.try_remove_component::<Position>(entity),
            Err(Error::NotFound(entity))
        );
    }

    #[test]
    fn get_component_mut_updates() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Velocity { dx: 1.0, dy: 1.0 });

        // When
        world.get_component_mut::<Velocity>(entity).dy = -1.0;

        // Then
        assert_eq!(
            world.get_component::<Velocity>(entity),
            &Velocity { dx: 1.0, dy: -1.0 }
        );
    }

    #[test]
    fn add_components_one_event_each() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        let seen = watch(&world);

        // When
        world.add_components(
            entity,
            (
                Position { x: 0.0, y: 0.0 },
                Velocity { dx: 0.0, dy: 0.0 },
                Sprite("crate"),
            ),
        );

        // Then
        assert_eq!(seen.borrow().len(), 3);
        assert!(world.has_components::<(Position, Velocity, Sprite)>(entity));
    }

    #[test]
    fn add_components_rejects_existing_without_partial_attach() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Velocity { dx: 0.0, dy: 0.0 });
        let seen = watch(&world);

        // When
        let result =
            world.try_add_components(entity, (Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0, dy: 1.0 }));

        // Then
        assert!(matches!(
            result,
            Err(Error::DuplicateComponent { component, .. }) if component.ends_with("Velocity")
        ));
        assert!(!world.has_component::<Position>(entity));
        assert!(seen.borrow().is_empty());
    }

    // ==================== Queries ====================

    #[test]
    fn query_filters_by_components() {
        // Given
        let mut world = World::new();
        let moving = world.spawn((Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0, dy: 0.0 }));
        let still = world.spawn(Position { x: 5.0, y: 5.0 });
        world.spawn(Sprite("tree"));

        // When
        let positioned: Vec<_> = world.query::<Position>().map(|e| e.entity()).collect();
        let movers: Vec<_> = world
            .query::<(Position, Velocity)>()
            .map(|e| e.entity())
            .collect();

        // Then
        assert_eq!(positioned, vec![moving, still]);
        assert_eq!(movers, vec![moving]);
        assert_eq!(world.query::<()>().count(), 3);
    }

    #[test]
    fn for_each_skips_destroyed_and_created() {
        // Given
        let mut world = World::new();
        let a = world.spawn(Position { x: 0.0, y: 0.0 });
        let b = world.spawn(Position { x: 0.0, y: 0.0 });
        let c = world.spawn(Position { x: 0.0, y: 0.0 });

        // When
        let mut visited = Vec::new();
        world.for_each::<Position>(|world, entity| {
            visited.push(entity);
            if entity == a {
                world.destroy(b);
                world.spawn(Position { x: 1.0, y: 1.0 });
            }
            world.get_component_mut::<Position>(entity).x += 1.0;
        });

        // Then
        assert_eq!(visited, vec![a, c]);
        assert_eq!(world.len(), 3);
    }

    // ==================== Groups and Hierarchy ====================

    #[test]
    fn groups_through_world() {
        // Given
        let mut world = World::new();
        let player = world.create_entity();
        let enemy = world.create_entity();

        // When
        world.add_to_group(player, "Actors");
        world.add_to_group(enemy, "actors");
        world.add_to_group(enemy, "Enemies");

        // Then
        assert_eq!(world.group("ACTORS"), vec![player, enemy]);
        assert!(world.is_in_group(enemy, "enemies"));
        assert!(world.remove_from_group(enemy, "ENEMIES"));
        assert!(world.group("enemies").is_empty());
    }

    #[test]
    fn destroy_parent_removes_children_with_events() {
        // Given
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();
        world.attach_child(parent, child);
        let seen = watch(&world);

        // When
        world.destroy(parent);

        // Then
        assert!(!world.is_valid(child));
        assert_eq!(
            *seen.borrow(),
            vec![Seen::Removed(parent), Seen::Removed(child)]
        );
    }

    #[test]
    fn hierarchy_accessors() {
        // Given
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();

        // When
        world.set_parent(child, Some(parent));

        // Then
        assert_eq!(world.parent(child), Some(parent));
        assert_eq!(world.children(parent), vec![child]);
        assert!(world.detach_child(parent, child));
        assert_eq!(world.parent(child), None);
    }

    #[test]
    #[should_panic(expected = "its own ancestor")]
    fn attach_cycle_panics() {
        // Given
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();
        world.attach_child(parent, child);

        // When
        world.attach_child(child, parent);
    }

    // ==================== Construction ====================

    #[test]
    fn worlds_sharing_a_registry_agree_on_ids() {
        // Given
        let registry = Arc::new(TypeRegistry::new());
        let mut first = World::with_registry(Arc::clone(&registry), Config::default());
        let mut second = World::with_registry(Arc::clone(&registry), Config::default());

        // When
        let a = second.spawn(Sprite("b"));
        let b = first.spawn(Position { x: 0.0, y: 0.0 });

        // Then
        assert!(Arc::ptr_eq(first.registry(), second.registry()));
        assert_eq!(
            first.entity(b).record().components().ids().collect::<Vec<_>>(),
            vec![registry.id::<Position>()]
        );
        assert_eq!(
            second.entity(a).record().components().ids().collect::<Vec<_>>(),
            vec![registry.id::<Sprite>()]
        );
    }
}

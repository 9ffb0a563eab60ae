use crate::ecs::{
    component::{Component, IntoSpec},
    entity::{Entity, Record},
    error::Error,
    event::{Bus, Change, ComponentsChanged},
    types::TypeRegistry,
};

/// A view of a live entity with read-only access to its components.
/// The lifetime `'w` ties the view to the world it was resolved from.
pub struct Ref<'w> {
    /// The entity this view points to.
    entity: Entity,
    /// The entity's record in the store.
    record: &'w Record,
    /// The registry component ids are looked up in.
    registry: &'w TypeRegistry,
}

impl<'w> Ref<'w> {
    #[inline]
    pub(crate) const fn new(entity: Entity, record: &'w Record, registry: &'w TypeRegistry) -> Self {
        Self {
            entity,
            record,
            registry,
        }
    }

    /// Get the entity this view points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get a reference to a component on this entity, or `None` if it is not attached.
    pub fn try_get<C: Component>(&self) -> Option<&'w C> {
        let id = self.registry.get::<C>()?;
        self.record.components().get::<C>(id)
    }

    /// Get a reference to a component on this entity.
    ///
    /// # Panics
    ///
    /// Panics if the component is not attached.
    pub fn get<C: Component>(&self) -> &'w C {
        self.try_get::<C>()
            .unwrap_or_else(|| panic!("{}", missing::<C>(self.entity)))
    }

    /// Determine if a component is attached to this entity.
    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.registry
            .get::<C>()
            .is_some_and(|id| self.record.components().contains(id))
    }

    /// Determine if every component in `S` is attached to this entity.
    #[inline]
    pub fn has_all<S: IntoSpec>(&self) -> bool {
        self.record
            .components()
            .contains_all(&S::into_spec(self.registry))
    }

    /// Get the groups this entity belongs to.
    #[inline]
    pub fn groups(&self) -> &'w [String] {
        self.record.groups()
    }

    /// Get the parent of this entity.
    #[inline]
    pub fn parent(&self) -> Option<Entity> {
        self.record.parent()
    }

    /// Get the direct children of this entity.
    pub fn children(&self) -> Vec<Entity> {
        self.record.children().collect()
    }

    /// Get the underlying record.
    #[inline]
    pub fn record(&self) -> &'w Record {
        self.record
    }
}

/// A view of a live entity with mutable access to its components.
///
/// Attaching or detaching a component through this view raises
/// [`ComponentsChanged`] on the world's bus, exactly like the equivalent `World` calls.
pub struct RefMut<'w> {
    /// The entity this view points to.
    entity: Entity,
    /// The entity's record in the store.
    record: &'w mut Record,
    /// The registry component ids are allocated from.
    registry: &'w TypeRegistry,
    /// The bus composition changes are raised on.
    events: &'w Bus,
}

impl<'w> RefMut<'w> {
    #[inline]
    pub(crate) fn new(
        entity: Entity,
        record: &'w mut Record,
        registry: &'w TypeRegistry,
        events: &'w Bus,
    ) -> Self {
        Self {
            entity,
            record,
            registry,
            events,
        }
    }

    /// Get the entity this view points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Attach a component, failing if one of the same type is already attached.
    pub fn try_add<C: Component>(&mut self, value: C) -> Result<&mut C, Error> {
        attach(self.entity, self.record, self.registry, self.events, value)
    }

    /// Attach a component.
    ///
    /// # Panics
    ///
    /// Panics if a component of the same type is already attached.
    pub fn add<C: Component>(&mut self, value: C) -> &mut C {
        attach(self.entity, self.record, self.registry, self.events, value)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Get a reference to a component, or `None` if it is not attached.
    pub fn try_get<C: Component>(&self) -> Option<&C> {
        let id = self.registry.get::<C>()?;
        self.record.components().get::<C>(id)
    }

    /// Get a reference to a component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not attached.
    pub fn get<C: Component>(&self) -> &C {
        let entity = self.entity;
        self.try_get::<C>()
            .unwrap_or_else(|| panic!("{}", missing::<C>(entity)))
    }

    /// Get a mutable reference to a component, or `None` if it is not attached.
    pub fn try_get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let id = self.registry.get::<C>()?;
        self.record.components_mut().get_mut::<C>(id)
    }

    /// Get a mutable reference to a component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not attached.
    pub fn get_mut<C: Component>(&mut self) -> &mut C {
        let entity = self.entity;
        self.try_get_mut::<C>()
            .unwrap_or_else(|| panic!("{}", missing::<C>(entity)))
    }

    /// Detach and return a component, failing if it is not attached.
    pub fn try_remove<C: Component>(&mut self) -> Result<C, Error> {
        detach(self.entity, self.record, self.registry, self.events)
    }

    /// Detach and return a component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not attached.
    pub fn remove<C: Component>(&mut self) -> C {
        detach(self.entity, self.record, self.registry, self.events)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Determine if a component is attached to this entity.
    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.registry
            .get::<C>()
            .is_some_and(|id| self.record.components().contains(id))
    }

    /// Determine if every component in `S` is attached to this entity.
    #[inline]
    pub fn has_all<S: IntoSpec>(&self) -> bool {
        self.record
            .components()
            .contains_all(&S::into_spec(self.registry))
    }
}

fn missing<C: Component>(entity: Entity) -> Error {
    Error::MissingComponent {
        entity,
        component: std::any::type_name::<C>(),
    }
}

/// Attach `value` to a record and raise the composition change.
pub(crate) fn attach<'r, C: Component>(
    entity: Entity,
    record: &'r mut Record,
    registry: &TypeRegistry,
    events: &Bus,
    value: C,
) -> Result<&'r mut C, Error> {
    let id = registry.id::<C>();
    let value = record
        .components_mut()
        .insert(id, value)
        .map_err(|_| Error::DuplicateComponent {
            entity,
            component: std::any::type_name::<C>(),
        })?;
    log::debug!("attach {} ({id}) to {entity}", registry.name(id));
    events.raise(ComponentsChanged {
        entity,
        component: id,
        change: Change::Added,
    });
    Ok(value)
}

/// Detach a `C` from a record and raise the composition change.
pub(crate) fn detach<C: Component>(
    entity: Entity,
    record: &mut Record,
    registry: &TypeRegistry,
    events: &Bus,
) -> Result<C, Error> {
    let value = registry
        .get::<C>()
        .and_then(|id| Some((id, record.components_mut().remove::<C>(id)?)));
    let Some((id, value)) = value else {
        return Err(missing::<C>(entity));
    };
    log::debug!("detach {} ({id}) from {entity}", registry.name(id));
    events.raise(ComponentsChanged {
        entity,
        component: id,
        change: Change::Removed,
    });
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, sync::Arc};

    use rusty_macros::Component;

    use super::*;
    use crate::ecs::entity::Store;

    #[derive(Component, Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    fn fixture() -> (Arc<TypeRegistry>, Bus, Store, Entity) {
        let registry = Arc::new(TypeRegistry::new());
        let bus = Bus::new(Arc::clone(&registry));
        let mut store = Store::new();
        let entity = store.create();
        (registry, bus, store, entity)
    }

    #[test]
    fn add_then_read_through_ref() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);

        // When
        entity_mut.add(Position { x: 3.0, y: 4.0 });

        // Then
        let entity_ref = Ref::new(entity, store.get(entity).unwrap(), &registry);
        assert_eq!(entity_ref.entity(), entity);
        assert!(entity_ref.has::<Position>());
        assert!(!entity_ref.has::<Velocity>());
        assert_eq!(entity_ref.get::<Position>(), &Position { x: 3.0, y: 4.0 });
        assert!(entity_ref.try_get::<Velocity>().is_none());
    }

    #[test]
    fn add_raises_components_changed() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event: &ComponentsChanged| sink.borrow_mut().push(*event));
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);

        // When
        entity_mut.add(Position { x: 0.0, y: 0.0 });
        entity_mut.remove::<Position>();

        // Then
        let position = registry.id::<Position>();
        assert_eq!(
            *seen.borrow(),
            vec![
                ComponentsChanged {
                    entity,
                    component: position,
                    change: Change::Added
                },
                ComponentsChanged {
                    entity,
                    component: position,
                    change: Change::Removed
                },
            ]
        );
    }

    #[test]
    fn get_mut_updates_value() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);
        entity_mut.add(Velocity { dx: 1.0, dy: 0.0 });

        // When
        entity_mut.get_mut::<Velocity>().dx = 5.0;

        // Then
        assert_eq!(entity_mut.get::<Velocity>(), &Velocity { dx: 5.0, dy: 0.0 });
        assert!(entity_mut.has_all::<(Velocity,)>());
        assert!(!entity_mut.has_all::<(Velocity, Position)>());
    }

    #[test]
    fn try_add_duplicate_is_error() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);
        entity_mut.add(Position { x: 1.0, y: 1.0 });

        // When
        let result = entity_mut.try_add(Position { x: 2.0, y: 2.0 }).map(|_| ());

        // Then
        assert!(matches!(result, Err(Error::DuplicateComponent { .. })));
        assert_eq!(entity_mut.get::<Position>(), &Position { x: 1.0, y: 1.0 });
    }

    #[test]
    fn try_remove_missing_is_error() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);

        // When
        let result = entity_mut.try_remove::<Position>();

        // Then
        assert!(matches!(result, Err(Error::MissingComponent { entity: e, .. }) if e == entity));
    }

    #[test]
    #[should_panic(expected = "already has component")]
    fn add_duplicate_panics() {
        // Given
        let (registry, bus, mut store, entity) = fixture();
        let mut entity_mut = RefMut::new(entity, store.get_mut(entity).unwrap(), &registry, &bus);
        entity_mut.add(Position { x: 1.0, y: 1.0 });

        // When
        entity_mut.add(Position { x: 2.0, y: 2.0 });
    }

    #[test]
    #[should_panic(expected = "does not have component")]
    fn get_missing_panics() {
        // Given
        let (registry, _bus, store, entity) = fixture();
        let entity_ref = Ref::new(entity, store.get(entity).unwrap(), &registry);

        // When
        entity_ref.get::<Position>();
    }
}

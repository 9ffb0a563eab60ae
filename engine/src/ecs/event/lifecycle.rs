use rusty_macros::Event;

use crate::ecs::{entity::Entity, types::TypeId};

/// Whether a component was attached or detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Added,
    Removed,
}

/// Raised after an entity's component set changes. One event per attached or detached component.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentsChanged {
    /// The entity whose composition changed.
    pub entity: Entity,
    /// The registry id of the component type.
    pub component: TypeId,
    pub change: Change,
}

/// Raised after an entity is created and its initial components are attached.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityCreated {
    pub entity: Entity,
}

/// Raised when an entity is destroyed. The handle is already invalid.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRemoved {
    pub entity: Entity,
}

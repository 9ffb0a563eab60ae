//! Programmer-error conditions raised by the entity store and component containers.
//!
//! Each of these means a caller broke a precondition (resolved a dead handle, assumed a component
//! that was never attached, attached one twice). The `try_*` operations hand them back as values;
//! the plain operations panic with the error's message.

use std::fmt;

use crate::ecs::entity::Entity;

/// An error raised by a world, store, or entity view operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The handle does not refer to a live entity.
    NotFound(Entity),

    /// The entity does not have the requested component.
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The entity already has a component of this type.
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// Attaching `child` under `parent` would make an entity its own ancestor.
    HierarchyCycle { parent: Entity, child: Entity },
}

impl Error {
    /// The entity the error refers to.
    pub fn entity(&self) -> Entity {
        match self {
            Error::NotFound(entity) => *entity,
            Error::MissingComponent { entity, .. } => *entity,
            Error::DuplicateComponent { entity, .. } => *entity,
            Error::HierarchyCycle { child, .. } => *child,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(entity) => write!(f, "entity {entity} not found"),
            Error::MissingComponent { entity, component } => {
                write!(f, "entity {entity} does not have component {component}")
            }
            Error::DuplicateComponent { entity, component } => {
                write!(f, "entity {entity} already has component {component}")
            }
            Error::HierarchyCycle { parent, child } => {
                write!(
                    f,
                    "cannot attach entity {child} under {parent}: it would become its own ancestor"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

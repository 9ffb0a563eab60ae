//! Component storage for the ECS.
//!
//! Components are plain data types attached to entities, at most one instance of each concrete
//! type per entity. Each entity keeps its components in a [`Container`] keyed by the registry's
//! numeric [`TypeId`](crate::ecs::TypeId); the typed accessors on
//! [`Ref`](crate::ecs::entity::Ref), [`RefMut`](crate::ecs::entity::RefMut) and
//! [`World`](crate::ecs::World) do the id lookup and downcast, so callers never see the erased
//! values.
//!
//! ## Usage
//!
//! ```ignore
//! use rusty_substrate::ecs::{Component, World};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! let entity = world.create_entity();
//! world.add_component(entity, Position { x: 3.0, y: 4.0 });
//! assert!(world.has_component::<Position>(entity));
//! ```

mod container;
mod set;
mod spec;

pub use container::Container;
pub use set::{Set, Target};
pub use spec::{IntoSpec, Spec};

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used as a component.
/// Derive it with `#[derive(Component)]`.
pub trait Component: 'static + Sized {}

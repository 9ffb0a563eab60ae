//! Entity/component substrate.
//!
//! Independently developed subsystems attach heterogeneous components to entities, look them up
//! by type, hold generation-checked handles that survive the entity's destruction, and talk to
//! each other through a type-erased publish/subscribe bus.
//!
//! The entry point is [`ecs::World`], which owns the entity store and the event bus for a single
//! update loop. Work that must leave that loop goes through
//! [`ParallelTask`](crate::core::tasks::ParallelTask).

// Lets the derive macros name `::rusty_substrate::...` from inside this crate too.
extern crate self as rusty_substrate;

pub mod core;
pub mod ecs;

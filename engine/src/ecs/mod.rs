pub mod component;
pub mod entity;
pub mod error;
pub mod event;
pub mod types;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::Error;
pub use event::{Bus, Event, SubscriptionId};
pub use types::{TypeId, TypeRegistry};
pub use world::World;

// Derives share their trait's name; they live in the macro namespace.
pub use rusty_macros::{Component, Event};

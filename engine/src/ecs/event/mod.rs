//! Synchronous, type-erased publish/subscribe.
//!
//! The [`Bus`] keeps one partition of subscribers per event type, indexed by the registry's
//! numeric [`TypeId`](crate::ecs::TypeId). Subscribers register a strongly typed callback; the bus
//! stores it behind an erased wrapper and downcasts back only when an event of that type is raised.
//!
//! # Built-in events
//!
//! The world raises these on its bus:
//! - [`ComponentsChanged`] after every single component attach or detach.
//! - [`EntityCreated`] after an entity and its initial components exist.
//! - [`EntityRemoved`] for every entity a destroy call takes down.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc, sync::Arc};
//! use rusty_substrate::ecs::{Bus, Event, TypeRegistry};
//!
//! #[derive(Event)]
//! struct Clicked { x: i32, y: i32 }
//!
//! let bus = Bus::new(Arc::new(TypeRegistry::new()));
//! let total = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&total);
//! let id = bus.subscribe(move |click: &Clicked| sink.set(sink.get() + click.x + click.y));
//!
//! assert_eq!(bus.raise(Clicked { x: 10, y: 20 }), 1);
//! assert_eq!(total.get(), 30);
//! assert!(bus.unsubscribe(id));
//! assert!(!bus.unsubscribe(id));
//! ```

mod bus;
mod lifecycle;
mod logger;
mod subscription;

pub use bus::Bus;
pub use lifecycle::{Change, ComponentsChanged, EntityCreated, EntityRemoved};
pub use logger::Logger;
pub use subscription::{Subscription, SubscriptionId};

/// Marker trait for event types.
///
/// Any `'static` type can be an event; derive it with `#[derive(Event)]`. Events are handed to
/// callbacks by reference, so they need not be `Clone`.
pub trait Event: 'static {}

use std::fmt;

use log::Level;

use crate::ecs::event::{Bus, Event, SubscriptionId};

/// Writes raised events to the `log` facade.
///
/// Each call to [`log`](Logger::log) subscribes to one event type; every event of that type raised
/// afterwards is logged with its `Debug` form at the logger's level and target. Dropping the logger
/// unsubscribes everything it registered.
///
/// ```rust
/// use std::sync::Arc;
/// use rusty_substrate::ecs::{Bus, TypeRegistry, event::{EntityCreated, EntityRemoved, Logger}};
///
/// let bus = Bus::new(Arc::new(TypeRegistry::new()));
/// let mut logger = Logger::new(&bus).with_level(log::Level::Debug);
/// logger.log::<EntityCreated>().log::<EntityRemoved>();
/// assert_eq!(logger.len(), 2);
/// ```
pub struct Logger {
    bus: Bus,
    level: Level,
    target: &'static str,
    subscriptions: Vec<SubscriptionId>,
}

impl Logger {
    /// The target used unless [`with_target`](Logger::with_target) overrides it.
    pub const DEFAULT_TARGET: &'static str = "rusty_substrate::events";

    /// Construct a logger for `bus` that logs at `Info` level.
    pub fn new(bus: &Bus) -> Self {
        Self {
            bus: bus.clone(),
            level: Level::Info,
            target: Self::DEFAULT_TARGET,
            subscriptions: Vec::new(),
        }
    }

    /// Set the level for event types logged from now on.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the target for event types logged from now on.
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    /// Start logging events of type `E`.
    pub fn log<E: Event + fmt::Debug>(&mut self) -> &mut Self {
        let (level, target) = (self.level, self.target);
        let id = self
            .bus
            .subscribe(move |event: &E| log::log!(target: target, level, "{event:?}"));
        self.subscriptions.push(id);
        self
    }

    /// Get the number of event types being logged.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if no event types are being logged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}

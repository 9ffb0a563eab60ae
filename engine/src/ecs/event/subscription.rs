use std::{fmt, rc::Weak};

use crate::ecs::{event::bus::Inner, types::TypeId};

/// Identifies one registration on a [`Bus`](crate::ecs::event::Bus).
///
/// The id carries the event type it was registered for, so unsubscribing goes straight to the
/// right partition. Sequence numbers come from the bus's [`TypeRegistry`](crate::ecs::TypeRegistry)
/// and are never reused, so a stale id, or one issued by another bus sharing the registry, can
/// never remove an unrelated registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId {
    event: TypeId,
    sequence: u64,
}

impl SubscriptionId {
    #[inline]
    pub(crate) const fn new(event: TypeId, sequence: u64) -> Self {
        Self { event, sequence }
    }

    /// Get the registry id of the event type this subscription listens to.
    #[inline]
    pub fn event(&self) -> TypeId {
        self.event
    }

    /// Get the registry-wide sequence number of this subscription.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.event, self.sequence)
    }
}

/// A subscription that unsubscribes itself when dropped.
///
/// Returned by [`Bus::subscribe_scoped`](crate::ecs::event::Bus::subscribe_scoped). The guard does
/// not keep the bus alive; dropping it after the bus is gone does nothing.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    id: SubscriptionId,
    bus: Weak<Inner>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, bus: Weak<Inner>) -> Self {
        Self { id, bus }
    }

    /// Get the id of the guarded subscription.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Give up the guard, leaving the subscription registered. Returns its id.
    pub fn release(mut self) -> SubscriptionId {
        self.bus = Weak::new();
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

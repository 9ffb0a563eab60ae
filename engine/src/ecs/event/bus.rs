//! The event bus and its type-erased subscriber storage.
//!
//! # Dispatch
//!
//! [`raise`](Bus::raise) looks up the partition for the event's type id, takes a snapshot of the
//! subscribers in it and releases the partition table before calling anything. Callbacks are free
//! to subscribe, unsubscribe or raise further events:
//!
//! - A subscriber added during a dispatch is not called by that dispatch.
//! - A subscriber removed during a dispatch is not called by it from then on.
//! - A callback that is already running further up the stack (an event raised from its own
//!   handler) is skipped with a warning rather than re-entered.
//!
//! # Type Erasure
//!
//! Each subscriber stores its callback as `Box<dyn ErasedCallback>`. The bus only hands an event
//! to callbacks from the partition of that event's type id, and downcasts through
//! [`as_any()`](ErasedCallback::as_any) to the concrete `Callback<E>` before calling it.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    sync::Arc,
};

use log::{trace, warn};

use crate::ecs::{
    event::{Event, Subscription, SubscriptionId},
    types::TypeRegistry,
};

/// A callback with its event type erased.
pub(crate) trait ErasedCallback {
    /// Returns a reference to self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

struct Callback<E: Event> {
    f: RefCell<Box<dyn FnMut(&E)>>,
}

impl<E: Event> ErasedCallback for Callback<E> {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Subscriber {
    sequence: u64,
    active: Cell<bool>,
    callback: Box<dyn ErasedCallback>,
}

/// Subscribers for one event type, in subscription order.
type Partition = Vec<Rc<Subscriber>>;

pub(crate) struct Inner {
    registry: Arc<TypeRegistry>,
    partitions: RefCell<Vec<Partition>>,
}

impl Inner {
    /// Remove a subscriber. Returns false if the id is unknown or already removed.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut partitions = self.partitions.borrow_mut();
            let Some(partition) = partitions.get_mut(id.event().index()) else {
                return false;
            };
            match partition.binary_search_by_key(&id.sequence(), |subscriber| subscriber.sequence) {
                Ok(position) => partition.remove(position),
                Err(_) => return false,
            }
        };
        // The table is released before the subscriber drops: its callback may own guards that
        // unsubscribe from this bus. A dispatch may still hold it in its snapshot.
        removed.active.set(false);
        drop(removed);
        trace!("unsubscribed {id}");
        true
    }
}

/// A synchronous, single-threaded publish/subscribe bus.
///
/// Cloning a `Bus` gives another handle to the same subscribers. Type ids come from the shared
/// [`TypeRegistry`], so a bus and the world that owns it always agree on them.
#[derive(Clone)]
pub struct Bus {
    inner: Rc<Inner>,
}

impl Bus {
    /// Construct a bus that takes event type ids from `registry`.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_capacity(registry, 0)
    }

    /// Construct a bus with room for `capacity` event types before the partition table grows.
    pub fn with_capacity(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            inner: Rc::new(Inner {
                registry,
                partitions: RefCell::new(Vec::with_capacity(capacity)),
            }),
        }
    }

    /// Get the registry this bus takes type ids from.
    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.inner.registry
    }

    /// Register `callback` for events of type `E`.
    ///
    /// Subscribing is always legal, including before an `E` has ever been raised.
    pub fn subscribe<E, F>(&self, callback: F) -> SubscriptionId
    where
        E: Event,
        F: FnMut(&E) + 'static,
    {
        let event = self.inner.registry.id::<E>();
        // Drawn from the registry so buses sharing it never hand out the same id.
        let sequence = self.inner.registry.next_sequence();
        let id = SubscriptionId::new(event, sequence);

        let mut partitions = self.inner.partitions.borrow_mut();
        let index = event.index();
        if index >= partitions.len() {
            partitions.resize_with(index + 1, Vec::new);
        }
        partitions[index].push(Rc::new(Subscriber {
            sequence,
            active: Cell::new(true),
            callback: Box::new(Callback::<E> {
                f: RefCell::new(Box::new(callback)),
            }),
        }));

        trace!("subscribed {id} to {}", self.inner.registry.name(event));
        id
    }

    /// Register `callback` for events of type `E`, unsubscribing when the returned guard drops.
    pub fn subscribe_scoped<E, F>(&self, callback: F) -> Subscription
    where
        E: Event,
        F: FnMut(&E) + 'static,
    {
        let id = self.subscribe(callback);
        Subscription::new(id, Rc::downgrade(&self.inner))
    }

    /// Remove a subscription. Returns false, and does nothing else, if the id is unknown or was
    /// already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.remove(id);
        if !removed {
            warn!("unsubscribe called with unknown subscription {id}");
        }
        removed
    }

    /// Determine if a subscription is still registered.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner
            .partitions
            .borrow()
            .get(id.event().index())
            .is_some_and(|partition| {
                partition
                    .binary_search_by_key(&id.sequence(), |subscriber| subscriber.sequence)
                    .is_ok()
            })
    }

    /// Get the number of subscribers for events of type `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .registry
            .get::<E>()
            .and_then(|event| {
                self.inner
                    .partitions
                    .borrow()
                    .get(event.index())
                    .map(Vec::len)
            })
            .unwrap_or(0)
    }

    /// Call every subscriber of `E`, in subscription order, with `event`. Returns the number of
    /// callbacks that ran. Raising an event nobody listens to is not an error.
    pub fn raise<E: Event>(&self, event: E) -> usize {
        // A type nobody has subscribed to has no id yet; don't allocate one.
        let Some(id) = self.inner.registry.get::<E>() else {
            return 0;
        };
        let snapshot: Partition = match self.inner.partitions.borrow().get(id.index()) {
            Some(partition) if !partition.is_empty() => partition.clone(),
            _ => return 0,
        };

        let mut delivered = 0;
        for subscriber in snapshot {
            if !subscriber.active.get() {
                continue;
            }
            let callback = subscriber
                .callback
                .as_any()
                .downcast_ref::<Callback<E>>()
                .unwrap_or_else(|| unreachable!("subscriber filed under the wrong event type"));
            match callback.f.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(&event);
                    delivered += 1;
                }
                Err(_) => warn!(
                    "skipping re-entrant delivery of {} to subscription {}",
                    std::any::type_name::<E>(),
                    SubscriptionId::new(id, subscriber.sequence)
                ),
            }
        }
        delivered
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partitions = self.inner.partitions.borrow();
        f.debug_struct("Bus")
            .field("event_types", &partitions.len())
            .field(
                "subscribers",
                &partitions.iter().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::new()))
    }
}

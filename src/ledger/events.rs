//! Cart Events Module
//!
//! Change notifications for cart observers (badge counters, summaries).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

// == Cart Events ==
/// Broadcast hub for the payload-less "cart changed" signal.
///
/// Observers re-read the cart when called. Delivery order across
/// observers is unspecified.
#[derive(Clone, Default)]
pub struct CartEvents {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for CartEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEvents")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl CartEvents {
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    /// Registers `listener` and returns the handle that unsubscribes it.
    ///
    /// Dropping the handle also unsubscribes; call [`Subscription::detach`]
    /// to keep the listener for the lifetime of the hub.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Arc::new(listener));
        debug!(subscription = id, "cart observer subscribed");

        Subscription {
            id,
            registry: Some(Arc::downgrade(&self.registry)),
        }
    }

    // == Notify ==
    /// Calls every current listener.
    ///
    /// Listeners run outside the registry lock, so they may subscribe or
    /// unsubscribe while being notified.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = {
            let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.listeners.values().cloned().collect()
        };

        for listener in listeners {
            listener();
        }
    }

    // == Subscriber Count ==
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .listeners
            .len()
    }
}

// == Subscription ==
/// Unsubscribe handle returned by [`CartEvents::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<Mutex<Registry>>>,
}

impl Subscription {
    /// Removes the listener. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keeps the listener registered for as long as the hub lives.
    pub fn detach(mut self) {
        self.registry = None;
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .listeners
                .remove(&self.id);
            debug!(subscription = self.id, "cart observer unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

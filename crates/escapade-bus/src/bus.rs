//! A synchronous, single-threaded publish/subscribe bus.
//!
//! `publish` runs every handler that was subscribed to the topic when the
//! call started, in subscription order, and only then returns. Callers rely
//! on this: a room publishes a request and reads the reply state on the
//! very next line.
//!
//! The bus is `!Send` on purpose. Game logic runs on one logical thread
//! driven by the frame clock, and handlers capture `Rc`/`Cell` state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::BusError;

type Handler<P> = Rc<RefCell<dyn FnMut(&P)>>;

struct Registry<K, P> {
    next_id: u64,
    topics: HashMap<K, Vec<(u64, Handler<P>)>>,
}

impl<K, P> Default for Registry<K, P> {
    fn default() -> Self {
        Self {
            next_id: 0,
            topics: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// A topic-keyed handler registry with synchronous delivery.
///
/// Cloning a `Bus` gives another handle to the same registry.
pub struct Bus<K, P> {
    inner: Rc<RefCell<Registry<K, P>>>,
}

impl<K, P> Clone for Bus<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K, P> Default for Bus<K, P> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::default())),
        }
    }
}

impl<K, P> Bus<K, P>
where
    K: Eq + Hash + Clone + fmt::Display + 'static,
    P: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`.
    ///
    /// Subscribing the same closure twice registers it twice, and it will
    /// run twice per publish. The handler stays registered for as long as
    /// the returned [`Subscription`] lives.
    pub fn subscribe<F>(&self, topic: K, handler: F) -> Subscription
    where
        F: FnMut(&P) + 'static,
    {
        let handler: Handler<P> = Rc::new(RefCell::new(handler));
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .topics
                .entry(topic.clone())
                .or_default()
                .push((id, handler));
            id
        };
        tracing::trace!(%topic, id, "handler subscribed");

        let registry = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            let mut registry = registry.borrow_mut();
            if let Some(handlers) = registry.topics.get_mut(&topic) {
                handlers.retain(|(hid, _)| *hid != id);
                if handlers.is_empty() {
                    registry.topics.remove(&topic);
                }
            }
            tracing::trace!(%topic, id, "handler unsubscribed");
        })
    }

    /// Delivers `payload` to every handler subscribed to `topic`.
    ///
    /// The handler list is captured when the call starts: handlers added
    /// during delivery are not run, handlers removed during delivery still
    /// are. Handlers may publish again (on any topic) before returning.
    ///
    /// Returns the number of handlers invoked.
    ///
    /// # Errors
    /// [`BusError::Reentrant`] if a handler would be invoked while it is
    /// already running.
    pub fn publish(&self, topic: &K, payload: &P) -> Result<usize, BusError> {
        let handlers: Vec<Handler<P>> = match self.inner.borrow().topics.get(topic) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => Vec::new(),
        };

        tracing::debug!(%topic, handlers = handlers.len(), "publish");

        for handler in &handlers {
            let mut handler = handler
                .try_borrow_mut()
                .map_err(|_| BusError::Reentrant(topic.to_string()))?;
            (&mut *handler)(payload);
        }
        Ok(handlers.len())
    }

    /// Number of handlers currently subscribed to `topic`.
    pub fn subscriber_count(&self, topic: &K) -> usize {
        self.inner
            .borrow()
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// A handle that does not keep the registry alive.
    ///
    /// Handlers that need to publish on their own bus capture one of these,
    /// otherwise the registry would own itself and never be freed.
    pub fn downgrade(&self) -> WeakBus<K, P> {
        WeakBus {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`Bus`].
pub struct WeakBus<K, P> {
    inner: Weak<RefCell<Registry<K, P>>>,
}

impl<K, P> Clone for WeakBus<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<K, P> WeakBus<K, P> {
    /// Returns the bus if it has not been torn down.
    pub fn upgrade(&self) -> Option<Bus<K, P>> {
        self.inner.upgrade().map(|inner| Bus { inner })
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Scoped registration of a handler.
///
/// Dropping it removes the handler from its bus. A room keeps its
/// subscriptions as fields, so tearing the room down unsubscribes it.
#[must_use = "dropping a Subscription unsubscribes its handler immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Keeps the handler registered for the rest of the bus's life.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

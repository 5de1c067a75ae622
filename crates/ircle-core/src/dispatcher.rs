//! Named-event publish/subscribe dispatch.
//!
//! Handlers are registered under a string key together with the payload
//! type they accept. Emitting runs, in registration order, every handler
//! under the key whose payload type matches; the others are skipped.

use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// A handler over payload type `P`.
pub type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Identifier returned by [`Dispatcher::on`], used to remove a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A registered handler with its payload type erased.
struct Listener {
    id: ListenerId,
    payload: TypeId,
    /// Holds a `Handler<P>` for the `P` named by `payload`.
    handler: Arc<dyn Any + Send + Sync>,
}

/// The event dispatcher.
pub struct Dispatcher {
    /// Listeners indexed by event key, in registration order.
    listeners: DashMap<String, Vec<Listener>>,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Create a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler for `key`, accepting payloads of type `P`.
    pub fn on<P, F>(&self, key: impl Into<String>, handler: F) -> ListenerId
    where
        P: Any,
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: Handler<P> = Arc::new(handler);
        let key = key.into();

        trace!(key = %key, listener = id.0, "Handler registered");
        self.listeners.entry(key).or_default().push(Listener {
            id,
            payload: TypeId::of::<P>(),
            handler: Arc::new(handler),
        });

        id
    }

    /// Remove a handler.
    ///
    /// Returns `true` if it was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut removed = false;
        self.listeners.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|l| l.id != id);
            removed |= listeners.len() != before;
            !listeners.is_empty()
        });
        removed
    }

    /// Emit `payload` under `key`.
    ///
    /// Returns the number of handlers that ran. The handler list is not
    /// locked while handlers run, so they may register or emit themselves.
    pub fn emit<P: Any>(&self, key: &str, payload: &P) -> usize {
        let handlers: Vec<Handler<P>> = match self.listeners.get(key) {
            Some(listeners) => listeners
                .iter()
                .filter(|l| l.payload == TypeId::of::<P>())
                .filter_map(|l| l.handler.downcast_ref::<Handler<P>>().cloned())
                .collect(),
            None => return 0,
        };

        for handler in &handlers {
            handler(payload);
        }

        trace!(key = %key, handlers = handlers.len(), "Emitted");
        handlers.len()
    }

    /// Get the number of handlers under `key`, whatever their payload type.
    #[must_use]
    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.get(key).map(|l| l.len()).unwrap_or(0)
    }

    /// Check whether any handler is registered under `key`.
    #[must_use]
    pub fn has_listeners(&self, key: &str) -> bool {
        self.listener_count(key) > 0
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("keys", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for n in 1..=3 {
            let seen = seen.clone();
            dispatcher.on("PRIVMSG", move |text: &String| {
                seen.lock().push(format!("{n}:{text}"));
            });
        }

        let count = dispatcher.emit("PRIVMSG", &"hi".to_string());
        assert_eq!(count, 3);
        assert_eq!(*seen.lock(), vec!["1:hi", "2:hi", "3:hi"]);
    }

    #[test]
    fn test_emit_without_handlers_is_noop() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.emit("JOIN", &42u32), 0);
        assert!(!dispatcher.has_listeners("JOIN"));
    }

    #[test]
    fn test_mismatched_payload_is_skipped() {
        let dispatcher = Dispatcher::new();
        let strings = Arc::new(Mutex::new(0));
        let numbers = Arc::new(Mutex::new(0));

        let s = strings.clone();
        dispatcher.on("event", move |_: &String| *s.lock() += 1);
        let n = numbers.clone();
        dispatcher.on("event", move |_: &u32| *n.lock() += 1);

        assert_eq!(dispatcher.emit("event", &7u32), 1);
        assert_eq!(*strings.lock(), 0);
        assert_eq!(*numbers.lock(), 1);
        assert_eq!(dispatcher.listener_count("event"), 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let dispatcher = Dispatcher::new();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let h = hits.clone();
        dispatcher.on("JOIN", move |_: &()| h.lock().push("join"));
        let h = hits.clone();
        dispatcher.on("PART", move |_: &()| h.lock().push("part"));

        dispatcher.emit("PART", &());
        assert_eq!(*hits.lock(), vec!["part"]);
    }

    #[test]
    fn test_off() {
        let dispatcher = Dispatcher::new();
        let id = dispatcher.on("QUIT", |_: &()| {});
        dispatcher.on("QUIT", |_: &()| {});

        assert!(dispatcher.off(id));
        assert!(!dispatcher.off(id));
        assert_eq!(dispatcher.emit("QUIT", &()), 1);
    }

    #[test]
    fn test_reentrant_registration() {
        let dispatcher = Arc::new(Dispatcher::new());

        let inner = dispatcher.clone();
        dispatcher.on("outer", move |_: &()| {
            inner.on("late", |_: &()| {});
            inner.emit("late", &());
        });

        assert_eq!(dispatcher.emit("outer", &()), 1);
        assert_eq!(dispatcher.listener_count("late"), 1);
    }
}

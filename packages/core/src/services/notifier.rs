//! Change Notification Channel
//!
//! A registry of payload-free listener callbacks. The store fires every
//! registered callback once per committed mutation, synchronously and in
//! registration order. Listeners re-query the store for fresh state.
//!
//! # Unsubscribing
//!
//! [`ChangeNotifier::subscribe`] returns a [`Subscription`] token. Calling
//! [`Subscription::unsubscribe`] removes exactly that callback and is
//! idempotent. Dropping the token does NOT unsubscribe; removal is always
//! explicit.
//!
//! Dispatch iterates over a snapshot of the registry taken before the first
//! callback runs, with the registry lock released. A callback may therefore
//! subscribe, unsubscribe or query the store without deadlocking; registry
//! changes made during a dispatch take effect on the next one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Listener callback type
pub type Listener = Arc<dyn Fn() + Send + Sync>;

type Registry = Mutex<Vec<(u64, Listener)>>;

/// Ordered registry of change listeners
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Arc<Registry>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and return the token that removes it
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        tracing::trace!("Registered change listener {}", id);
        Subscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    /// Invoke every registered listener once, in registration order
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Token removing one listener from its [`ChangeNotifier`]
#[must_use = "dropping a Subscription keeps the listener registered; keep it to unsubscribe"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Remove the listener. Repeat calls, or calls after the notifier was
    /// dropped, do nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut listeners = registry.lock().unwrap_or_else(PoisonError::into_inner);
            let before = listeners.len();
            listeners.retain(|(id, _)| *id != self.id);
            if listeners.len() != before {
                tracing::trace!("Removed change listener {}", self.id);
            }
        }
    }
}

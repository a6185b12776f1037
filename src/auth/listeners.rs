//! Auth state-change listeners.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::auth::Session;
use crate::domain::events::AuthEvent;

/// Callback invoked on every session transition.
pub type AuthHandler = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

/// Wraps a closure as an [`AuthHandler`].
pub fn auth_handler<F>(f: F) -> AuthHandler
where
    F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    handlers: Vec<(u64, AuthHandler)>,
}

/// Registry shared by a gateway and the subscriptions it hands out.
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Arc<Mutex<ListenerSet>>,
}

impl AuthListeners {
    pub fn new() -> Self { Self::default() }

    pub fn subscribe(&self, handler: AuthHandler) -> Subscription {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = set.next_id;
        set.next_id += 1;
        set.handlers.push((id, handler));
        Subscription { id, listeners: Arc::downgrade(&self.inner) }
    }

    /// Handlers are called after the lock is released, so they may (un)subscribe.
    pub fn notify(&self, event: AuthEvent, session: Option<&Session>) {
        let handlers: Vec<AuthHandler> = {
            let set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            set.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in handlers {
            handler(event, session);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).handlers.len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl fmt::Debug for AuthListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthListeners").field("len", &self.len()).finish()
    }
}

/// Handle returned by `on_auth_state_change`. Dropping it keeps the listener attached.
#[derive(Debug)]
#[must_use = "call `unsubscribe` to detach the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<ListenerSet>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.listeners.upgrade() {
            inner.lock().unwrap_or_else(PoisonError::into_inner).handlers.retain(|(id, _)| *id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.listeners.upgrade().is_some_and(|inner| {
            inner.lock().unwrap_or_else(PoisonError::into_inner).handlers.iter().any(|(id, _)| *id == self.id)
        })
    }
}

//! Session record, its cache, and the shared signed-in state both gateways use.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::listeners::{AuthHandler, AuthListeners, Subscription};
use crate::domain::events::AuthEvent;

/// The signed-in shopper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl Session {
    /// Display name fallback: the part of the email before `@`.
    pub fn name_from_email(email: &str) -> String {
        email.split_once('@').map_or(email, |(local, _)| local).to_string()
    }
}

/// Where the current session survives between gateway instances.
pub trait SessionCache: Send + Sync {
    /// A corrupt entry is discarded and reported as absent.
    fn load(&self) -> Option<Session>;
    fn store(&self, session: &Session);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemorySessionCache {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionCache {
    pub fn new() -> Self { Self::default() }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> Option<Session> { self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone() }
    fn store(&self, session: &Session) { *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone()); }
    fn clear(&self) { *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None; }
}

/// JSON file holding a single [`Session`].
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove session cache"),
        }
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read session cache");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt session cache");
                self.remove();
                None
            }
        }
    }

    fn store(&self, session: &Session) {
        let written = serde_json::to_string(session)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(&self.path, json));
        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "failed to write session cache");
        }
    }

    fn clear(&self) { self.remove(); }
}

/// Current session, its cache and the listeners to tell about changes.
pub(crate) struct SessionState {
    current: Mutex<Option<Session>>,
    cache: Arc<dyn SessionCache>,
    listeners: AuthListeners,
}

impl SessionState {
    pub(crate) fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self { current: Mutex::new(None), cache, listeners: AuthListeners::new() }
    }

    /// In-memory session first, then the cache (which repopulates memory).
    pub(crate) fn current(&self) -> Option<Session> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_none() {
            *current = self.cache.load();
        }
        current.clone()
    }

    pub(crate) fn sign_in(&self, session: Session) -> Session {
        self.cache.store(&session);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        info!(user_id = %session.id, "signed in");
        self.listeners.notify(AuthEvent::SignedIn, Some(&session));
        session
    }

    /// Returns whether there was a session to end.
    pub(crate) fn sign_out(&self) -> bool {
        let had_session = self.current.lock().unwrap_or_else(PoisonError::into_inner).take().is_some()
            || self.cache.load().is_some();
        self.cache.clear();
        if had_session {
            info!("signed out");
            self.listeners.notify(AuthEvent::SignedOut, None);
        }
        had_session
    }

    pub(crate) fn subscribe(&self, handler: AuthHandler) -> Subscription { self.listeners.subscribe(handler) }
}

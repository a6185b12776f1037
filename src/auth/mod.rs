//! Auth Gateway port.
//!
//! The storefront talks to identity through [`AuthGateway`], an object-safe
//! async trait held as `Arc<dyn AuthGateway>` and handed to whoever needs it.
//! Two adapters ship with the crate:
//!
//! - [`MockAuthGateway`] accepts any well-formed credentials locally; used in
//!   development and as a test double.
//! - [`RemoteAuthGateway`] delegates to an [`IdentityBackend`] (a hosted
//!   identity/profile service) and maps its answers onto the same contract.
//!
//! Absence of a session is never an error: `current_user` returns `None`.
//! Only `login` and `signup` fail, with [`AuthError`].

pub mod credentials;
pub mod listeners;
pub mod mock;
pub mod remote;
pub mod session;

use async_trait::async_trait;
use thiserror::Error;

pub use listeners::{auth_handler, AuthHandler, AuthListeners, Subscription};
pub use mock::MockAuthGateway;
pub use remote::{BackendError, BackendUser, IdentityBackend, Profile, RemoteAuthGateway};
pub use session::{FileSessionCache, MemorySessionCache, Session, SessionCache};

/// Errors surfaced to the caller of `login` / `signup`. The message is meant for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The identity backend refused the request.
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Rejected(m) => m,
        }
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn logout(&self);

    async fn current_user(&self) -> Option<Session>;

    async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    /// Registers `handler` for `SignedIn` / `SignedOut` transitions.
    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription;
}

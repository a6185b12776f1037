//! Local auth gateway that accepts any well-formed credentials.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::auth::credentials::{validate_login, validate_signup, MIN_PASSWORD_LENGTH};
use crate::auth::session::{MemorySessionCache, SessionCache, SessionState};
use crate::auth::{AuthError, AuthGateway, AuthHandler, Session, Subscription};

/// Id handed out by every mock login.
pub const MOCK_USER_ID: &str = "1";

pub struct MockAuthGateway {
    state: SessionState,
    latency: Duration,
}

impl Default for MockAuthGateway {
    fn default() -> Self { Self::new(Arc::new(MemorySessionCache::new())) }
}

impl MockAuthGateway {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self { state: SessionState::new(cache), latency: Duration::ZERO }
    }

    /// Delays `login` and `signup` to mimic a network round trip.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.simulate_round_trip().await;
        validate_login(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            debug!(email, "mock login rejected");
            return Err(AuthError::Rejected("Invalid credentials".into()));
        }
        let session = Session { id: MOCK_USER_ID.into(), email: email.into(), name: Session::name_from_email(email) };
        Ok(self.state.sign_in(session))
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        self.simulate_round_trip().await;
        validate_signup(name, email, password)?;
        let session = Session { id: Uuid::new_v4().simple().to_string(), email: email.into(), name: name.into() };
        Ok(self.state.sign_in(session))
    }

    async fn logout(&self) { self.state.sign_out(); }

    async fn current_user(&self) -> Option<Session> { self.state.current() }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription { self.state.subscribe(handler) }
}

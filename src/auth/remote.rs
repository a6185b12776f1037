//! Auth gateway that delegates to a hosted identity service.
//!
//! The service itself sits behind [`IdentityBackend`]; this adapter validates
//! input, resolves the display name from the profile store and keeps the
//! local session and listeners in step with what the backend reports.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::auth::credentials::{validate_login, validate_signup};
use crate::auth::session::{MemorySessionCache, SessionCache, SessionState};
use crate::auth::{AuthError, AuthGateway, AuthHandler, Session, Subscription};

/// Identity as the backend knows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub email: String,
}

/// Row from the backend's profile store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0}")]
    Rejected(String),

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

impl From<BackendError> for AuthError {
    fn from(e: BackendError) -> Self { AuthError::Rejected(e.to_string()) }
}

#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<BackendUser, BackendError>;
    /// Creates the account and its profile row.
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<BackendUser, BackendError>;
    async fn sign_out(&self) -> Result<(), BackendError>;
    async fn current_user(&self) -> Result<Option<BackendUser>, BackendError>;
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError>;
}

pub struct RemoteAuthGateway<B> {
    backend: B,
    state: SessionState,
}

impl<B: IdentityBackend> RemoteAuthGateway<B> {
    pub fn new(backend: B) -> Self { Self::with_cache(backend, Arc::new(MemorySessionCache::new())) }

    pub fn with_cache(backend: B, cache: Arc<dyn SessionCache>) -> Self {
        Self { backend, state: SessionState::new(cache) }
    }

    pub fn backend(&self) -> &B { &self.backend }

    /// Profile name when there is one; otherwise `fallback`, otherwise the email local part.
    async fn session_for(&self, user: BackendUser, fallback: Option<&str>) -> Session {
        let profile_name = match self.backend.fetch_profile(&user.id).await {
            Ok(profile) => profile.and_then(|p| p.name).filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "profile lookup failed");
                None
            }
        };
        let name = profile_name
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| Session::name_from_email(&user.email));
        Session { id: user.id, email: user.email, name }
    }
}

#[async_trait]
impl<B: IdentityBackend> AuthGateway for RemoteAuthGateway<B> {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_login(email, password)?;
        let user = self.backend.sign_in(email, password).await?;
        let session = self.session_for(user, None).await;
        Ok(self.state.sign_in(session))
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_signup(name, email, password)?;
        let user = self.backend.sign_up(name, email, password).await?;
        let session = self.session_for(user, Some(name)).await;
        Ok(self.state.sign_in(session))
    }

    async fn logout(&self) {
        if let Err(e) = self.backend.sign_out().await {
            warn!(error = %e, "backend sign-out failed; clearing local session anyway");
        }
        self.state.sign_out();
    }

    async fn current_user(&self) -> Option<Session> {
        if let Some(session) = self.state.current() {
            return Some(session);
        }
        match self.backend.current_user().await {
            Ok(Some(user)) => {
                let session = self.session_for(user, None).await;
                Some(self.state.sign_in(session))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not resolve current user");
                None
            }
        }
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription { self.state.subscribe(handler) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::auth_handler;
    use crate::domain::events::AuthEvent;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-process stand-in for the hosted service.
    #[derive(Default)]
    struct FakeBackend {
        accounts: Mutex<HashMap<String, (String, BackendUser)>>,
        profiles: Mutex<HashMap<String, Profile>>,
        signed_in: Mutex<Option<BackendUser>>,
        offline: bool,
        sign_outs: AtomicUsize,
    }

    impl FakeBackend {
        fn with_account(email: &str, password: &str, name: Option<&str>) -> Self {
            let backend = Self::default();
            let user = BackendUser { id: format!("uid-{email}"), email: email.into() };
            backend.profiles.lock().unwrap().insert(user.id.clone(), Profile { id: user.id.clone(), name: name.map(Into::into) });
            backend.accounts.lock().unwrap().insert(email.into(), (password.into(), user));
            backend
        }

        fn check(&self) -> Result<(), BackendError> {
            if self.offline { Err(BackendError::Unavailable("connection refused".into())) } else { Ok(()) }
        }
    }

    #[async_trait]
    impl IdentityBackend for FakeBackend {
        async fn sign_in(&self, email: &str, password: &str) -> Result<BackendUser, BackendError> {
            self.check()?;
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((pw, user)) if pw == password => {
                    *self.signed_in.lock().unwrap() = Some(user.clone());
                    Ok(user.clone())
                }
                _ => Err(BackendError::Rejected("Invalid login credentials".into())),
            }
        }

        async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<BackendUser, BackendError> {
            self.check()?;
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(BackendError::Rejected("User already registered".into()));
            }
            let user = BackendUser { id: format!("uid-{email}"), email: email.into() };
            self.profiles.lock().unwrap().insert(user.id.clone(), Profile { id: user.id.clone(), name: Some(name.into()) });
            accounts.insert(email.into(), (password.into(), user.clone()));
            *self.signed_in.lock().unwrap() = Some(user.clone());
            Ok(user)
        }

        async fn sign_out(&self) -> Result<(), BackendError> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            *self.signed_in.lock().unwrap() = None;
            Ok(())
        }

        async fn current_user(&self) -> Result<Option<BackendUser>, BackendError> {
            self.check()?;
            Ok(self.signed_in.lock().unwrap().clone())
        }

        async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
            self.check()?;
            Ok(self.profiles.lock().unwrap().get(user_id).cloned())
        }
    }

    #[tokio::test]
    async fn test_login_uses_profile_name() {
        let gateway = RemoteAuthGateway::new(FakeBackend::with_account("ann@shop.test", "secret1", Some("Ann Lee")));
        let session = gateway.login("ann@shop.test", "secret1").await.unwrap();
        assert_eq!(session.name, "Ann Lee");
        assert_eq!(session.id, "uid-ann@shop.test");
        assert!(gateway.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_without_profile_falls_back_to_email() {
        let gateway = RemoteAuthGateway::new(FakeBackend::with_account("bob@shop.test", "secret1", None));
        let session = gateway.login("bob@shop.test", "secret1").await.unwrap();
        assert_eq!(session.name, "bob");
    }

    #[tokio::test]
    async fn test_backend_rejection_is_auth_error() {
        let gateway = RemoteAuthGateway::new(FakeBackend::with_account("ann@shop.test", "secret1", None));
        let err = gateway.login("ann@shop.test", "wrong-pass").await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("Invalid login credentials".into()));
        assert_eq!(gateway.current_user().await, None);
    }

    #[tokio::test]
    async fn test_validation_runs_before_backend() {
        let backend = FakeBackend { offline: true, ..FakeBackend::default() };
        let gateway = RemoteAuthGateway::new(backend);
        let err = gateway.signup("Ann", "ann@shop.test", "123").await.unwrap_err();
        assert_eq!(err, AuthError::Validation("Password must be at least 6 characters".into()));
    }

    #[tokio::test]
    async fn test_signup_then_duplicate() {
        let gateway = RemoteAuthGateway::new(FakeBackend::default());
        let session = gateway.signup("Cleo", "cleo@shop.test", "secret1").await.unwrap();
        assert_eq!(session.name, "Cleo");
        let err = gateway.signup("Cleo", "cleo@shop.test", "secret1").await.unwrap_err();
        assert_eq!(err.message(), "User already registered");
    }

    #[tokio::test]
    async fn test_current_user_restores_backend_session() {
        let backend = FakeBackend::with_account("ann@shop.test", "secret1", Some("Ann"));
        *backend.signed_in.lock().unwrap() = backend.accounts.lock().unwrap().get("ann@shop.test").map(|(_, u)| u.clone());
        let gateway = RemoteAuthGateway::new(backend);
        assert_eq!(gateway.current_user().await.map(|s| s.name), Some("Ann".to_string()));
    }

    #[tokio::test]
    async fn test_offline_current_user_is_absent() {
        let gateway = RemoteAuthGateway::new(FakeBackend { offline: true, ..FakeBackend::default() });
        assert_eq!(gateway.current_user().await, None);
        let err = gateway.login("a@b.c", "secret1").await.unwrap_err();
        assert_eq!(err.message(), "identity service unavailable: connection refused");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let cache: Arc<dyn SessionCache> = Arc::new(MemorySessionCache::new());
        cache.store(&Session { id: "u1".into(), email: "a@b.c".into(), name: "a".into() });
        let gateway = RemoteAuthGateway::with_cache(FakeBackend { offline: true, ..FakeBackend::default() }, Arc::clone(&cache));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let _sub = gateway.on_auth_state_change(auth_handler(move |event, _| sink.lock().unwrap().push(event)));

        assert!(gateway.is_authenticated().await);
        gateway.logout().await;

        assert!(!gateway.is_authenticated().await);
        assert!(cache.load().is_none());
        assert_eq!(gateway.backend().sign_outs.load(Ordering::SeqCst), 1);
        assert_eq!(*events.lock().unwrap(), vec![AuthEvent::SignedOut]);
    }
}

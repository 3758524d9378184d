//! Session store: owns the signed-in session for the whole run.
//!
//! Everything else reads the session through shared references; only the
//! `&mut self` methods here create, refresh or drop it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AuthPolicy;
use crate::errors::{ClientError, Result};
use crate::models::user::{Session, User};

pub mod forms;
pub mod guard;
pub mod provider;
pub mod storage;

use forms::{SignInForm, SignUpForm};
use provider::AuthProvider;
use storage::SessionFile;

/// Snapshot the route guard reads.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// True until the first session resolution finishes.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    storage: Option<SessionFile>,
    state: AuthState,
}

impl SessionStore {
    /// Starts in the loading state; call [`SessionStore::restore`] to resolve it.
    pub fn new(provider: Arc<dyn AuthProvider>, storage: Option<SessionFile>) -> Self {
        Self {
            provider,
            storage,
            state: AuthState::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session().map(|s| s.access_token.as_str())
    }

    /// Token to attach for an endpoint with the given policy.
    ///
    /// A `Required` endpoint without a session fails here, before any
    /// request is built.
    pub fn bearer_for(&self, policy: AuthPolicy) -> Result<Option<&str>> {
        match policy {
            AuthPolicy::None => Ok(None),
            AuthPolicy::Optional => Ok(self.access_token()),
            AuthPolicy::Required => self
                .access_token()
                .map(Some)
                .ok_or(ClientError::NotAuthenticated),
        }
    }

    /// Resolves the initial session from the session file.
    ///
    /// Never fails: any problem while restoring means "no session".
    pub async fn restore(&mut self) {
        let session = match self.storage.clone() {
            Some(file) => match self.load_valid_session(&file).await {
                Ok(session) => session,
                Err(e) => {
                    warn!("Could not restore session: {e}");
                    if let Err(e) = file.clear().await {
                        warn!("Could not remove stale session file: {e}");
                    }
                    None
                }
            },
            None => None,
        };

        if let Some(session) = &session {
            info!("Restored session for {}", session.user.display_name());
        }
        self.state = AuthState {
            session,
            loading: false,
        };
    }

    async fn load_valid_session(&self, file: &SessionFile) -> Result<Option<Session>> {
        let Some(mut session) = file.load().await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            let refresh_token = session
                .refresh_token
                .as_deref()
                .ok_or_else(|| ClientError::Auth("Session expired".to_string()))?;
            session = self.provider.refresh(refresh_token).await?;
        }

        session.user = self.provider.user(&session.access_token).await?;
        file.save(&session).await?;
        Ok(Some(session))
    }

    pub async fn sign_in(&mut self, form: &SignInForm) -> Result<()> {
        form.precondition().into_result()?;

        let session = self
            .provider
            .sign_in(form.email.trim(), &form.password)
            .await?;
        info!("Signed in as {}", session.user.display_name());

        if let Some(file) = &self.storage {
            if let Err(e) = file.save(&session).await {
                warn!("Could not persist session: {e}");
            }
        }
        self.state = AuthState {
            session: Some(session),
            loading: false,
        };
        Ok(())
    }

    /// Registers an account without signing in.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<()> {
        form.precondition().into_result()?;
        self.provider
            .sign_up(form.full_name.trim(), form.email.trim(), &form.password)
            .await?;
        info!("Registered account for {}", form.email.trim());
        Ok(())
    }

    /// Drops the session locally even when the provider call fails, so a
    /// dead backend can never keep the user signed in.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.state.session.take() {
            if let Err(e) = self.provider.sign_out(&session.access_token).await {
                warn!("Provider sign-out failed: {e}");
            }
            info!("Signed out {}", session.user.display_name());
        }
        if let Some(file) = &self.storage {
            if let Err(e) = file.clear().await {
                warn!("Could not remove session file: {e}");
            }
        }
        self.state.loading = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    use crate::models::user::UserMetadata;

    pub(crate) fn user() -> User {
        User {
            id: Uuid::nil(),
            email: Some("ada@example.com".to_string()),
            user_metadata: UserMetadata {
                full_name: Some("Ada Lovelace".to_string()),
            },
        }
    }

    pub(crate) fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: Some(format!("{token}-refresh")),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            user: user(),
        }
    }

    /// Provider accepting password `hunter22` and tokens starting with `valid`.
    #[derive(Default)]
    pub(crate) struct FakeAuth {
        pub calls: Mutex<Vec<String>>,
        pub fail_sign_out: bool,
    }

    impl FakeAuth {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
            self.record(&format!("sign_in:{email}"));
            if password == "hunter22" {
                Ok(session("valid-1"))
            } else {
                Err(ClientError::Auth("Invalid login credentials".to_string()))
            }
        }

        async fn sign_up(&self, _full_name: &str, email: &str, _password: &str) -> Result<()> {
            self.record(&format!("sign_up:{email}"));
            Ok(())
        }

        async fn sign_out(&self, access_token: &str) -> Result<()> {
            self.record(&format!("sign_out:{access_token}"));
            if self.fail_sign_out {
                Err(ClientError::Network("down".to_string()))
            } else {
                Ok(())
            }
        }

        async fn refresh(&self, refresh_token: &str) -> Result<Session> {
            self.record(&format!("refresh:{refresh_token}"));
            Ok(session("valid-refreshed"))
        }

        async fn user(&self, access_token: &str) -> Result<User> {
            self.record(&format!("user:{access_token}"));
            if access_token.starts_with("valid") {
                Ok(user())
            } else {
                Err(ClientError::Auth("invalid JWT".to_string()))
            }
        }
    }

    fn sign_in_form(password: &str) -> SignInForm {
        SignInForm {
            email: " ada@example.com ".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_starts_loading_and_resolves_to_no_session() {
        let mut store = SessionStore::new(Arc::new(FakeAuth::default()), None);
        assert!(store.is_loading());
        store.restore().await;
        assert!(!store.is_loading());
        assert!(store.session().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_sets_session_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        let auth = Arc::new(FakeAuth::default());
        let mut store = SessionStore::new(auth.clone(), Some(file.clone()));

        store.sign_in(&sign_in_form("hunter22")).await.unwrap();
        assert_eq!(store.access_token(), Some("valid-1"));
        assert_eq!(auth.calls(), vec!["sign_in:ada@example.com"]);
        assert_eq!(file.load().await.unwrap().unwrap().access_token, "valid-1");
    }

    #[tokio::test]
    async fn test_sign_in_rejection_keeps_no_session() {
        let mut store = SessionStore::new(Arc::new(FakeAuth::default()), None);
        store.restore().await;
        let err = store.sign_in(&sign_in_form("nope")).await.unwrap_err();
        assert_eq!(err.user_message("x"), "Invalid login credentials");
        assert!(store.session().is_none());
    }

    #[tokio::test]
    async fn test_invalid_sign_in_form_never_reaches_provider() {
        let auth = Arc::new(FakeAuth::default());
        let mut store = SessionStore::new(auth.clone(), None);
        let err = store.sign_in(&SignInForm::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(auth.calls().is_empty());
    }

    #[tokio::test]
    async fn test_restore_validates_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        file.save(&session("valid-stored")).await.unwrap();

        let auth = Arc::new(FakeAuth::default());
        let mut store = SessionStore::new(auth.clone(), Some(file));
        store.restore().await;
        assert_eq!(store.access_token(), Some("valid-stored"));
        assert_eq!(auth.calls(), vec!["user:valid-stored"]);
    }

    #[tokio::test]
    async fn test_restore_refreshes_expired_session() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        let mut expired = session("valid-old");
        expired.expires_at = Some(Utc::now() - Duration::minutes(5));
        file.save(&expired).await.unwrap();

        let auth = Arc::new(FakeAuth::default());
        let mut store = SessionStore::new(auth.clone(), Some(file.clone()));
        store.restore().await;
        assert_eq!(store.access_token(), Some("valid-refreshed"));
        assert_eq!(
            auth.calls(),
            vec!["refresh:valid-old-refresh", "user:valid-refreshed"]
        );
        assert_eq!(file.load().await.unwrap().unwrap().access_token, "valid-refreshed");
    }

    #[tokio::test]
    async fn test_restore_failure_means_no_session_and_clears_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        file.save(&session("revoked")).await.unwrap();

        let mut store = SessionStore::new(Arc::new(FakeAuth::default()), Some(file.clone()));
        store.restore().await;
        assert!(!store.is_loading());
        assert!(store.session().is_none());
        assert!(file.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_provider_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        let auth = Arc::new(FakeAuth {
            fail_sign_out: true,
            ..Default::default()
        });
        let mut store = SessionStore::new(auth.clone(), Some(file.clone()));
        store.sign_in(&sign_in_form("hunter22")).await.unwrap();

        store.sign_out().await;
        assert!(store.session().is_none());
        assert!(file.load().await.unwrap().is_none());
        assert!(auth.calls().contains(&"sign_out:valid-1".to_string()));
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_provider() {
        let auth = Arc::new(FakeAuth::default());
        let store = SessionStore::new(auth.clone(), None);
        let bad = SignUpForm {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
        };
        assert!(store.sign_up(&bad).await.is_err());
        assert!(auth.calls().is_empty());

        let good = SignUpForm {
            password: "abcdef".to_string(),
            confirm_password: "abcdef".to_string(),
            ..bad
        };
        store.sign_up(&good).await.unwrap();
        assert_eq!(auth.calls(), vec!["sign_up:ada@example.com"]);
        assert!(store.session().is_none());
    }

    #[tokio::test]
    async fn test_bearer_for_policies() {
        let mut store = SessionStore::new(Arc::new(FakeAuth::default()), None);
        store.restore().await;
        assert_eq!(store.bearer_for(AuthPolicy::None).unwrap(), None);
        assert_eq!(store.bearer_for(AuthPolicy::Optional).unwrap(), None);
        assert!(matches!(
            store.bearer_for(AuthPolicy::Required),
            Err(ClientError::NotAuthenticated)
        ));

        store.sign_in(&sign_in_form("hunter22")).await.unwrap();
        assert_eq!(store.bearer_for(AuthPolicy::None).unwrap(), None);
        assert_eq!(store.bearer_for(AuthPolicy::Optional).unwrap(), Some("valid-1"));
        assert_eq!(store.bearer_for(AuthPolicy::Required).unwrap(), Some("valid-1"));
    }
}

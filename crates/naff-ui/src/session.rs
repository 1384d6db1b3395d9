//! Browser session: the identity provider's token and profile, held in an
//! explicit context object instead of ambient globals.
//!
//! The store is provided once near the root of the app. It starts empty, is
//! reconciled with the identity provider on start-up, after a login and after
//! a logout, and is never mutated from anywhere else.

use leptos::prelude::*;
use naff_types::{IdentityUser, PublicConfig};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("unexpected identity provider response: {0}")]
    Decode(String),
}

/// The operations this app needs from an OAuth2/OIDC single-page client.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn check_session(&self) -> Result<(), IdentityError>;
    async fn is_authenticated(&self) -> Result<bool, IdentityError>;
    async fn get_user(&self) -> Result<Option<IdentityUser>, IdentityError>;
    async fn get_token_silently(&self) -> Result<String, IdentityError>;
    async fn login_with_popup(&self) -> Result<(), IdentityError>;
    async fn logout(&self) -> Result<(), IdentityError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<IdentityUser>,
}

#[derive(Clone)]
pub struct SessionStore {
    state: ArcRwSignal<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: ArcRwSignal::new(SessionState::default()),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<IdentityUser> {
        self.state.with(|s| s.user.clone())
    }

    pub fn logged_in(&self) -> bool {
        self.state.with(|s| s.token.is_some())
    }

    /// Reactive view of [`SessionStore::logged_in`] for use in views.
    pub fn logged_in_signal(&self) -> Signal<bool> {
        let state = self.state.clone();
        Signal::derive(move || state.with(|s| s.token.is_some()))
    }

    pub fn clear(&self) {
        self.state.set(SessionState::default());
    }

    /// Looks for an existing provider session, then reconciles.
    pub async fn init<P: IdentityProvider>(&self, provider: &P) -> Result<(), IdentityError> {
        if let Err(e) = provider.check_session().await {
            self.clear();
            return Err(e);
        }
        self.reconcile(provider).await
    }

    pub async fn login<P: IdentityProvider>(&self, provider: &P) -> Result<(), IdentityError> {
        provider.login_with_popup().await?;
        self.reconcile(provider).await
    }

    /// Always ends with the store cleared. A failed provider logout is still
    /// reported, but the local session is dropped regardless.
    pub async fn logout<P: IdentityProvider>(&self, provider: &P) -> Result<(), IdentityError> {
        if let Err(e) = provider.logout().await {
            self.clear();
            return Err(e);
        }
        self.reconcile(provider).await
    }

    async fn reconcile<P: IdentityProvider>(&self, provider: &P) -> Result<(), IdentityError> {
        match self.fetch(provider).await {
            Ok(state) => {
                self.state.set(state);
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    async fn fetch<P: IdentityProvider>(&self, provider: &P) -> Result<SessionState, IdentityError> {
        if !provider.is_authenticated().await? {
            return Ok(SessionState::default());
        }

        let user = provider.get_user().await?;
        let token = provider.get_token_silently().await?;
        if token.is_empty() {
            return Ok(SessionState::default());
        }

        Ok(SessionState {
            token: Some(token),
            user,
        })
    }
}

#[server]
pub async fn get_public_config() -> Result<PublicConfig, ServerFnError> {
    let state = crate::server::app_state()?;
    Ok(PublicConfig {
        backend_url: state.client.base_url().to_string(),
        identity: state.identity.clone(),
    })
}

/// Provides a [`SessionStore`] to its children and, in the browser, connects
/// it to the identity provider.
#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let session = SessionStore::new();
    provide_context(session.clone());

    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        wasm_bindgen_futures::spawn_local(async move {
            crate::auth0::connect(&session).await;
        });
    }

    children()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Default)]
    struct FakeProvider {
        authenticated: Cell<bool>,
        token: RefCell<String>,
        fail_check: bool,
        fail_logout: bool,
        fail_token: bool,
        checks: Cell<u32>,
        popups: Cell<u32>,
    }

    impl FakeProvider {
        fn signed_in(token: &str) -> Self {
            let provider = Self::default();
            provider.authenticated.set(true);
            *provider.token.borrow_mut() = token.to_string();
            provider
        }
    }

    fn profile() -> IdentityUser {
        IdentityUser {
            sub: "auth0|42".into(),
            name: Some("Ada".into()),
            email: Some("ada@x.com".into()),
            picture: None,
        }
    }

    impl IdentityProvider for FakeProvider {
        async fn check_session(&self) -> Result<(), IdentityError> {
            self.checks.set(self.checks.get() + 1);
            if self.fail_check {
                return Err(IdentityError::Provider("login_required".into()));
            }
            Ok(())
        }

        async fn is_authenticated(&self) -> Result<bool, IdentityError> {
            Ok(self.authenticated.get())
        }

        async fn get_user(&self) -> Result<Option<IdentityUser>, IdentityError> {
            Ok(self.authenticated.get().then(profile))
        }

        async fn get_token_silently(&self) -> Result<String, IdentityError> {
            if self.fail_token {
                return Err(IdentityError::Provider("consent_required".into()));
            }
            Ok(self.token.borrow().clone())
        }

        async fn login_with_popup(&self) -> Result<(), IdentityError> {
            self.popups.set(self.popups.get() + 1);
            self.authenticated.set(true);
            *self.token.borrow_mut() = "fresh".into();
            Ok(())
        }

        async fn logout(&self) -> Result<(), IdentityError> {
            if self.fail_logout {
                return Err(IdentityError::Provider("network".into()));
            }
            self.authenticated.set(false);
            Ok(())
        }
    }

    #[tokio::test]
    async fn init_with_existing_session_populates_token_and_user() {
        let store = SessionStore::new();
        let provider = FakeProvider::signed_in("tok");

        store.init(&provider).await.unwrap();

        assert_eq!(provider.checks.get(), 1);
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(profile()));
        assert!(store.logged_in());
    }

    #[tokio::test]
    async fn init_without_session_leaves_store_empty() {
        let store = SessionStore::new();

        store.init(&FakeProvider::default()).await.unwrap();

        assert_eq!(store.snapshot(), SessionState::default());
        assert!(!store.logged_in());
    }

    #[tokio::test]
    async fn failed_session_check_clears_and_reports() {
        let store = SessionStore::new();
        let provider = FakeProvider {
            fail_check: true,
            ..FakeProvider::signed_in("tok")
        };

        let err = store.init(&provider).await.unwrap_err();

        assert_eq!(err, IdentityError::Provider("login_required".into()));
        assert!(!store.logged_in());
    }

    #[tokio::test]
    async fn login_runs_popup_then_reconciles() {
        let store = SessionStore::new();
        let provider = FakeProvider::default();
        store.init(&provider).await.unwrap();

        store.login(&provider).await.unwrap();

        assert_eq!(provider.popups.get(), 1);
        assert_eq!(store.token().as_deref(), Some("fresh"));
        assert!(store.user().is_some());
    }

    #[tokio::test]
    async fn logout_ends_cleared_even_when_provider_fails() {
        let store = SessionStore::new();
        let provider = FakeProvider {
            fail_logout: true,
            ..FakeProvider::signed_in("tok")
        };
        store.init(&provider).await.unwrap();
        assert!(store.logged_in());

        let err = store.logout(&provider).await.unwrap_err();

        assert_eq!(err, IdentityError::Provider("network".into()));
        assert!(provider.authenticated.get());
        assert!(!store.logged_in());
        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn successful_logout_clears_the_store() {
        let store = SessionStore::new();
        let provider = FakeProvider::signed_in("tok");
        store.init(&provider).await.unwrap();

        store.logout(&provider).await.unwrap();

        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn token_failure_does_not_leave_a_half_session() {
        let store = SessionStore::new();
        let provider = FakeProvider {
            fail_token: true,
            ..FakeProvider::signed_in("tok")
        };

        assert!(store.init(&provider).await.is_err());

        assert_eq!(store.user(), None);
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn empty_token_counts_as_signed_out() {
        let store = SessionStore::new();

        store.init(&FakeProvider::signed_in("")).await.unwrap();

        assert!(!store.logged_in());
        assert_eq!(store.snapshot(), SessionState::default());
    }
}

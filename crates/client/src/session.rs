//! Session state: the current user, their token, and the UI flags around
//! authentication.
//!
//! The token is the only persisted piece; the user record is always
//! re-fetched. Startup goes through [`Session::load_user`], which is
//! fail-closed: any failure to turn the stored token into a user logs the
//! session out entirely rather than leaving it half-authenticated.

use shopkit_core::User;

use crate::api::{ApiError, AuthApi};
use crate::storage::{CART_KEY, SnapshotStore, TOKEN_KEY};

/// Authentication state for one client.
pub struct Session<A: AuthApi, S: SnapshotStore> {
    api: A,
    store: S,
    user: Option<User>,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl<A: AuthApi, S: SnapshotStore> Session<A, S> {
    /// Create a session, picking up any token persisted by a previous run.
    ///
    /// The token alone does not authenticate anything; call
    /// [`Session::load_user`] to turn it into a user or discard it.
    pub fn new(api: A, store: S) -> Self {
        let token = store.get(TOKEN_KEY);
        Self {
            api,
            store,
            user: None,
            token,
            loading: false,
            error: None,
        }
    }

    /// Register a new account and sign in.
    ///
    /// On failure the existing session state is left untouched and the
    /// error message is kept for display.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError`.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.api.register(name, email, password).await;
        self.finish_auth(result)
    }

    /// Sign in with email and password.
    ///
    /// On failure the existing session state is left untouched and the
    /// error message is kept for display.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.api.login(email, password).await;
        self.finish_auth(result)
    }

    /// Sign out: clears the user, the token, and the persisted cart.
    ///
    /// The cart is session-scoped, not account-scoped, so it goes too.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.error = None;

        if let Err(error) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(%error, "Failed to remove persisted token");
        }
        if let Err(error) = self.store.remove(CART_KEY) {
            tracing::warn!(%error, "Failed to remove persisted cart");
        }
    }

    /// Resolve the persisted token into a user at startup.
    ///
    /// No token is a normal logged-out start. A token that fails
    /// verification for any reason logs the session out completely.
    pub async fn load_user(&mut self) {
        let Some(token) = self.token.clone() else {
            return;
        };

        self.loading = true;
        match self.api.current_user(&token).await {
            Ok(user) => {
                self.user = Some(user);
                self.loading = false;
            }
            Err(error) => {
                tracing::debug!(%error, "Stored token rejected, logging out");
                self.loading = false;
                self.logout();
            }
        }
    }

    /// Clear the last error message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply the outcome of a register/login call.
    fn finish_auth(
        &mut self,
        result: Result<crate::api::AuthSuccess, ApiError>,
    ) -> Result<(), ApiError> {
        self.loading = false;
        match result {
            Ok(success) => {
                if let Err(error) = self.store.set(TOKEN_KEY, &success.token) {
                    tracing::warn!(%error, "Failed to persist token");
                }
                self.user = Some(success.user);
                self.token = Some(success.token);
                self.error = None;
                Ok(())
            }
            Err(error) => {
                self.error = Some(error.message());
                Err(error)
            }
        }
    }
}

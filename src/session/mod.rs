//! Client-side session state.
//!
//! [`SessionStore`] owns the authenticated user and bearer token, restores
//! them from persisted storage at startup, and is the only thing that
//! mutates them. Views receive it by reference from the application root.

mod preferences;

pub use preferences::{Preferences, Theme};

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiError, AuthBackend};
use crate::models::{AuthResponse, LocationUpdate, SignupData, SignupRequest, User};
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};

/// An authenticated user paired with their bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Build the store and restore any persisted session.
    ///
    /// Both `token` and `user` must be present and the user must parse;
    /// anything else starts unauthenticated. No request is made.
    pub fn hydrate(backend: Arc<dyn AuthBackend>, storage: Arc<dyn KeyValueStore>) -> Self {
        let restored = restore(storage.as_ref());
        if let Some(session) = &restored {
            info!(user_id = %session.user.id, role = %session.user.role, "Restored saved session");
        }

        Self {
            backend,
            storage,
            state: RwLock::new(restored),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Token for an authenticated call, or `Unauthenticated`
    pub fn require_token(&self) -> Result<String, ApiError> {
        self.token().ok_or(ApiError::Unauthenticated)
    }

    /// Log in with email and password. One attempt, no retries.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        match self.backend.login(email.trim(), password).await {
            Ok(response) => self.establish(response),
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Register a new account and start a session for it.
    ///
    /// Input is validated and normalised locally first; see
    /// [`SignupRequest::from_data`].
    pub async fn signup(&self, data: &SignupData) -> Result<Session, ApiError> {
        let request = SignupRequest::from_data(data).map_err(ApiError::Validation)?;

        match self.backend.signup(&request).await {
            Ok(response) => self.establish(response),
            Err(e) => {
                warn!(error = %e, "Signup failed");
                Err(e)
            }
        }
    }

    /// Forget the session in memory and in storage. Never fails.
    pub fn logout(&self) {
        self.clear();
        info!("Logged out");
    }

    fn clear(&self) {
        *self.state.write() = None;

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to clear persisted session key");
            }
        }
    }

    /// Record a location change the backend has already accepted
    pub fn apply_location(&self, update: &LocationUpdate) -> Result<(), ApiError> {
        let mut state = self.state.write();
        let session = state.as_mut().ok_or(ApiError::Unauthenticated)?;

        let mut user = session.user.clone();
        user.location = Some(update.geo_point());
        user.location_string = Some(update.location_string.clone());

        let encoded = serde_json::to_string(&user).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.storage.set(USER_KEY, &encoded)?;
        session.user = user;
        Ok(())
    }

    /// Persist a successful auth response, then expose it in memory.
    ///
    /// If it cannot be saved, no session is left in memory or storage.
    fn establish(&self, response: AuthResponse) -> Result<Session, ApiError> {
        if response.token.is_empty() {
            return Err(ApiError::Decode("response did not include a token".to_string()));
        }

        let encoded =
            serde_json::to_string(&response.user).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Err(e) = self
            .storage
            .set(TOKEN_KEY, &response.token)
            .and_then(|_| self.storage.set(USER_KEY, &encoded))
        {
            warn!(error = %e, "Failed to persist session; signing out");
            self.clear();
            return Err(e.into());
        }

        let session = Session {
            user: response.user,
            token: response.token,
        };
        info!(user_id = %session.user.id, role = %session.user.role, "Session started");
        *self.state.write() = Some(session.clone());
        Ok(session)
    }
}

fn restore(storage: &dyn KeyValueStore) -> Option<Session> {
    let read = |key: &str| match storage.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!(key, error = %e, "Could not read persisted session");
            None
        }
    };

    let token = read(TOKEN_KEY)?;
    let raw_user = read(USER_KEY)?;

    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => Some(Session { user, token }),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable persisted user");
            None
        }
    }
}

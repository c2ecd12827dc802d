//! Access to the remote CookSetu API.

pub mod client;
pub mod error;
pub mod validation;

pub use client::ApiClient;
pub use error::ApiError;

use async_trait::async_trait;

use crate::models::{AuthResponse, SignupRequest};

/// The authentication calls the session store depends on.
///
/// [`ApiClient`] is the production implementation.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;
}

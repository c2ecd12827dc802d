//! Typed HTTP client for the CookSetu backend.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ApiError;
use super::AuthBackend;
use crate::config::HttpConfig;
use crate::models::{
    AuthResponse, Coordinates, CookListing, CookProfileForm, CookStatus, LocationUpdate,
    LoginRequest, SignupRequest, StatusResponse, StatusUpdate,
};

/// One shared connection pool plus the configured base URL.
///
/// Cheap to share behind an `Arc`; every view talks to the backend through
/// the same instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, config: &HttpConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<String, ApiError> {
        let invalid = || ApiError::validation(format!("Invalid API URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        self.request_to(method, self.url(path), token)
    }

    fn request_to(&self, method: Method, url: String, token: Option<&str>) -> RequestBuilder {
        debug!(method = method.as_str(), url = url.as_str(), authenticated = token.is_some(), "API request");
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send once, map non-2xx to `ApiError::Status`, decode the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let body = self.send_checked(request, fallback).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_checked(&self, request: RequestBuilder, fallback: &str) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(%status, "API request failed");
            return Err(ApiError::from_response_body(status, &body, fallback));
        }
        Ok(body)
    }

    async fn send_with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let request = self.request(method, path, token).json(body);
        self.send_json(request, fallback).await
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_with_body(Method::POST, "/api/auth/login", None, &body, "Login failed")
            .await
    }

    /// `POST /api/auth/signup`
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.send_with_body(Method::POST, "/api/auth/signup", None, request, "Signup failed")
            .await
    }

    /// `PUT /api/users/location`
    pub async fn update_location(&self, token: &str, update: &LocationUpdate) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, "/api/users/location", Some(token))
            .json(update);
        self.send_checked(request, "Failed to update location").await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cook listings
    // ------------------------------------------------------------------

    /// `GET /api/cooks`
    pub async fn list_cooks(&self) -> Result<Vec<CookListing>, ApiError> {
        let request = self.request(Method::GET, "/api/cooks", None);
        let body = self.send_checked(request, "Failed to fetch cooks").await?;
        decode_listing_array(&body)
    }

    /// `GET /api/cooks/nearby?lat&lng`
    pub async fn nearby_cooks(&self, coords: Coordinates) -> Result<Vec<CookListing>, ApiError> {
        let request = self
            .request(Method::GET, "/api/cooks/nearby", None)
            .query(&[("lat", coords.lat), ("lng", coords.lng)]);
        let body = self.send_checked(request, "Failed to fetch cooks").await?;
        decode_listing_array(&body)
    }

    /// `GET /api/cooks/me`. `None` when the caller has no listing yet.
    pub async fn my_cook(&self, token: &str) -> Result<Option<CookListing>, ApiError> {
        let request = self.request(Method::GET, "/api/cooks/me", Some(token));
        match self.send_json::<Option<CookListing>>(request, "Failed to fetch cook profile").await {
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            other => other,
        }
    }

    /// `GET /api/cooks/admin`
    pub async fn admin_cooks(&self, token: &str) -> Result<Vec<CookListing>, ApiError> {
        let request = self.request(Method::GET, "/api/cooks/admin", Some(token));
        self.send_json(request, "Failed to fetch cooks").await
    }

    /// `POST /api/cooks`
    pub async fn create_cook(&self, token: &str, form: &CookProfileForm) -> Result<CookListing, ApiError> {
        self.send_with_body(Method::POST, "/api/cooks", Some(token), form, "Submission failed")
            .await
    }

    /// `PUT /api/cooks`
    pub async fn update_cook(&self, token: &str, form: &CookProfileForm) -> Result<CookListing, ApiError> {
        self.send_with_body(Method::PUT, "/api/cooks", Some(token), form, "Submission failed")
            .await
    }

    /// `PATCH /api/cooks/:id/status`, returning the status the server recorded
    pub async fn update_cook_status(
        &self,
        token: &str,
        cook_id: &str,
        status: CookStatus,
    ) -> Result<CookStatus, ApiError> {
        if cook_id.trim().is_empty() {
            return Err(ApiError::validation("Cook id is required"));
        }
        let url = self.endpoint(&["api", "cooks", cook_id, "status"])?;
        let request = self
            .request_to(Method::PATCH, url, Some(token))
            .json(&StatusUpdate { status });
        let response: StatusResponse = self.send_json(request, "Failed to update status").await?;
        Ok(response.status)
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        ApiClient::login(self, email, password).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::signup(self, request).await
    }
}

/// Listing endpoints answer with an array; anything else reads as empty.
///
/// A record that cannot be read is skipped so the rest still show.
fn decode_listing_array(body: &str) -> Result<Vec<CookListing>, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let serde_json::Value::Array(records) = value else {
        debug!("listing endpoint returned a non-array body");
        return Ok(Vec::new());
    };

    let mut listings = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<CookListing>(record) {
            Ok(listing) => listings.push(listing),
            Err(e) => warn!(index, error = %e, "Skipping unreadable cook listing"),
        }
    }
    Ok(listings)
}

//! Cook profile registration and updates.

use std::sync::Arc;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::models::{CookListing, CookProfileForm};
use crate::session::SessionStore;

pub const SUBMITTED_MESSAGE: &str = "Profile submitted for admin approval";

/// The signed-in cook's own listing and the form used to edit it
pub struct CookRegistration {
    api: Arc<ApiClient>,
    token: String,
    existing: Option<CookListing>,
    pub form: CookProfileForm,
}

impl CookRegistration {
    /// Load the caller's listing, if any, and pre-fill the form from it
    pub async fn load(api: Arc<ApiClient>, session: &SessionStore) -> Result<Self, ApiError> {
        let token = session.require_token()?;
        let existing = api.my_cook(&token).await?;
        let form = existing
            .as_ref()
            .map(CookProfileForm::from_listing)
            .unwrap_or_default();

        Ok(Self {
            api,
            token,
            existing,
            form,
        })
    }

    pub fn existing(&self) -> Option<&CookListing> {
        self.existing.as_ref()
    }

    /// Submitting updates an existing listing rather than creating one
    pub fn is_update(&self) -> bool {
        self.existing.is_some()
    }

    /// Validate and submit the form; creates or updates as appropriate
    pub async fn submit(&mut self) -> Result<&CookListing, ApiError> {
        self.form.validate().map_err(ApiError::Validation)?;

        let saved = if self.is_update() {
            self.api.update_cook(&self.token, &self.form).await?
        } else {
            self.api.create_cook(&self.token, &self.form).await?
        };

        info!(cook_id = %saved.id, status = %saved.status, "Cook profile submitted");
        Ok(&*self.existing.insert(saved))
    }
}

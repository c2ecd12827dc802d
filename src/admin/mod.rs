//! Admin review of cook listings.
//!
//! Status changes are decided by the backend. A listing's local status is
//! only replaced with the status the server confirms; a failed request
//! leaves it exactly as it was.

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{CookListing, CookStatus, ReviewDecision, User};
use crate::session::SessionStore;

/// Actions offered to `viewer` for `listing`: both decisions for an admin
/// looking at a pending listing, nothing otherwise.
pub fn available_actions(listing: &CookListing, viewer: &User) -> Vec<ReviewDecision> {
    if viewer.is_admin() && listing.status.is_pending() {
        vec![ReviewDecision::Approve, ReviewDecision::Reject]
    } else {
        Vec::new()
    }
}

pub struct AdminReview {
    api: Arc<ApiClient>,
    token: String,
    viewer: User,
    listings: Vec<CookListing>,
}

impl AdminReview {
    /// Fetch every listing visible to the signed-in admin
    pub async fn load(api: Arc<ApiClient>, session: &SessionStore) -> Result<Self, ApiError> {
        let current = session.current().ok_or(ApiError::Unauthenticated)?;
        if !current.user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }

        let listings = api.admin_cooks(&current.token).await?;
        info!(count = listings.len(), "Loaded cook listings for review");

        Ok(Self {
            api,
            token: current.token,
            viewer: current.user,
            listings,
        })
    }

    pub fn listings(&self) -> &[CookListing] {
        &self.listings
    }

    pub fn pending(&self) -> impl Iterator<Item = &CookListing> {
        self.listings.iter().filter(|c| c.status.is_pending())
    }

    pub fn get(&self, cook_id: &str) -> Option<&CookListing> {
        self.listings.iter().find(|c| c.id == cook_id)
    }

    pub fn actions_for(&self, listing: &CookListing) -> Vec<ReviewDecision> {
        available_actions(listing, &self.viewer)
    }

    /// Approve or reject a pending listing.
    ///
    /// Returns the status the backend recorded, which is also what the local
    /// listing now shows.
    pub async fn decide(
        &mut self,
        cook_id: &str,
        decision: ReviewDecision,
    ) -> Result<CookStatus, ApiError> {
        let listing = self
            .get(cook_id)
            .ok_or_else(|| ApiError::validation(format!("No cook listing with id {}", cook_id)))?;
        if !self.actions_for(listing).contains(&decision) {
            return Err(ApiError::validation(format!(
                "Listing {} is {} and cannot be reviewed",
                cook_id, listing.status
            )));
        }

        let confirmed = match self
            .api
            .update_cook_status(&self.token, cook_id, decision.target_status())
            .await
        {
            Ok(status) => status,
            Err(e) => {
                warn!(cook_id, %decision, error = %e, "Status update failed");
                return Err(e);
            }
        };

        if let Some(listing) = self.listings.iter_mut().find(|c| c.id == cook_id) {
            listing.status = confirmed;
        }
        info!(cook_id, %decision, status = %confirmed, "Cook listing reviewed");
        Ok(confirmed)
    }
}

//! Cook discovery: fetching listings and filtering them for display.

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Coordinates, CookListing};

/// Fetch listings near `position`, or all listings when it is unknown.
///
/// Nearby results without a usable coordinate pair are dropped.
pub async fn fetch_cooks(
    api: &ApiClient,
    position: Option<Coordinates>,
) -> Result<Vec<CookListing>, ApiError> {
    match position {
        Some(coords) => {
            let cooks = api.nearby_cooks(coords).await?;
            let total = cooks.len();
            let located: Vec<CookListing> = cooks
                .into_iter()
                .filter(|c| c.coordinates().is_some())
                .collect();
            debug!(total, kept = located.len(), "Fetched nearby cooks");
            Ok(located)
        }
        None => api.list_cooks().await,
    }
}

/// Client-side narrowing of a fetched list
#[derive(Debug, Clone, Default)]
pub struct CookFilter {
    /// True when listings were fetched by position; the typed city is then ignored
    pub location_allowed: bool,
    pub manual_location: String,
    pub cuisine: Option<String>,
}

impl CookFilter {
    pub fn new(location_allowed: bool) -> Self {
        Self {
            location_allowed,
            ..Default::default()
        }
    }

    pub fn with_manual_location(mut self, city: impl Into<String>) -> Self {
        self.manual_location = city.into();
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        let cuisine = cuisine.into();
        self.cuisine = if cuisine.is_empty() { None } else { Some(cuisine) };
        self
    }

    pub fn matches(&self, cook: &CookListing) -> bool {
        self.matches_location(cook) && self.matches_cuisine(cook)
    }

    fn matches_location(&self, cook: &CookListing) -> bool {
        let wanted = self.manual_location.trim();
        if self.location_allowed || wanted.is_empty() {
            return true;
        }
        cook.location_string
            .as_deref()
            .map(|loc| loc.to_lowercase().contains(&wanted.to_lowercase()))
            .unwrap_or(false)
    }

    fn matches_cuisine(&self, cook: &CookListing) -> bool {
        match &self.cuisine {
            Some(cuisine) => cook.cuisines.iter().any(|c| c == cuisine),
            None => true,
        }
    }

    pub fn apply<'a>(&self, cooks: &'a [CookListing]) -> Vec<&'a CookListing> {
        cooks.iter().filter(|c| self.matches(c)).collect()
    }
}

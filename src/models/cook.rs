//! Cook listings and the approval status workflow.

use serde::{Deserialize, Deserializer, Serialize};

use super::common::{Coordinates, GeoPoint};
use super::user::Role;
use crate::api::validation::{validate_cook_phone, validate_price};

/// Cuisines offered in the registration form and the browse filter
pub const CUISINE_OPTIONS: &[&str] = &[
    "North Indian",
    "South Indian",
    "Chinese",
    "Italian",
    "Mexican",
    "Continental",
    "Street Food",
    "Biryani",
    "Desserts",
    "Vegan",
];

pub const DEFAULT_EXPERIENCE: u32 = 1;
pub const DEFAULT_PRICE: u32 = 200;

/// Review state of a cook listing. Transitions are enforced by the backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CookStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CookStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for CookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for CookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("Unknown cook status: {}", other)),
        }
    }
}

/// One of the two mutually exclusive admin actions on a pending listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status requested from the backend for this decision
    pub fn target_status(&self) -> CookStatus {
        match self {
            Self::Approve => CookStatus::Approved,
            Self::Reject => CookStatus::Rejected,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Owner details the backend populates onto a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookOwner {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// The owning user: populated object or bare reference, depending on the endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OwnerRef {
    Populated(CookOwner),
    Id(String),
}

impl OwnerRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated(owner) => Some(owner.name.as_str()).filter(|n| !n.is_empty()),
            Self::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookListing {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<OwnerRef>,
    #[serde(default)]
    pub location_string: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default = "default_availability", deserialize_with = "availability_or_default")]
    pub availability: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_num: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CookStatus,
}

fn default_availability() -> bool {
    true
}

/// An explicit `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn availability_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_availability))
}

/// Round a listing number for the form, using `fallback` when unset
fn whole_or(value: f64, fallback: u32) -> u32 {
    if value.is_finite() && value > 0.0 {
        (value.round() as u32).max(1)
    } else {
        fallback
    }
}

impl CookListing {
    pub fn owner_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(OwnerRef::name)
            .unwrap_or("Unknown User")
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.location.as_ref().and_then(GeoPoint::as_coordinates)
    }
}

/// Body of `POST /api/cooks` and `PUT /api/cooks`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookProfileForm {
    pub location_string: String,
    pub location: Option<GeoPoint>,
    pub cuisines: Vec<String>,
    pub experience: u32,
    pub price: u32,
    pub availability: bool,
    pub phone_num: String,
}

impl Default for CookProfileForm {
    fn default() -> Self {
        Self {
            location_string: String::new(),
            location: None,
            cuisines: Vec::new(),
            experience: DEFAULT_EXPERIENCE,
            price: DEFAULT_PRICE,
            availability: true,
            phone_num: String::new(),
        }
    }
}

impl CookProfileForm {
    /// Pre-fill the form from an existing listing, falling back to defaults
    pub fn from_listing(listing: &CookListing) -> Self {
        Self {
            location_string: listing.location_string.clone().unwrap_or_default(),
            location: listing.location.clone(),
            cuisines: listing.cuisines.clone(),
            experience: whole_or(listing.experience, DEFAULT_EXPERIENCE),
            price: whole_or(listing.price, DEFAULT_PRICE),
            availability: listing.availability,
            phone_num: listing.phone_num.clone(),
        }
    }

    pub fn set_coordinates(&mut self, coords: Coordinates) {
        self.location = Some(GeoPoint::from_coordinates(coords));
    }

    /// Add the cuisine if absent, remove it if present
    pub fn toggle_cuisine(&mut self, cuisine: &str) {
        if let Some(pos) = self.cuisines.iter().position(|c| c == cuisine) {
            self.cuisines.remove(pos);
        } else {
            self.cuisines.push(cuisine.to_string());
        }
    }

    /// Client-side checks run before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.location_string.trim().is_empty() {
            return Err("City / location is required".to_string());
        }

        match self.location.as_ref().and_then(GeoPoint::as_coordinates) {
            Some(coords) => coords.validate()?,
            None => return Err("Allow location access or enter valid coordinates".to_string()),
        }

        if self.cuisines.is_empty() {
            return Err("Select at least one cuisine".to_string());
        }

        validate_cook_phone(&self.phone_num)?;
        validate_price(self.price)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CookProfileForm {
        let mut form = CookProfileForm {
            location_string: "Pune".to_string(),
            phone_num: "9876543210".to_string(),
            ..Default::default()
        };
        form.set_coordinates(Coordinates::new(18.5, 73.8));
        form.toggle_cuisine("Biryani");
        form
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("approved".parse::<CookStatus>(), Ok(CookStatus::Approved));
        assert!("archived".parse::<CookStatus>().is_err());
        assert_eq!(CookStatus::Rejected.to_string(), "rejected");
        assert!(CookStatus::default().is_pending());
    }

    #[test]
    fn test_decision_targets() {
        assert_eq!(ReviewDecision::Approve.target_status(), CookStatus::Approved);
        assert_eq!(ReviewDecision::Reject.target_status(), CookStatus::Rejected);
    }

    #[test]
    fn test_listing_with_populated_owner() {
        let listing: CookListing = serde_json::from_str(
            r#"{
                "_id": "c1",
                "user": {"_id": "u1", "name": "Lakshmi", "role": "cook"},
                "locationString": "Chennai",
                "cuisines": ["South Indian"],
                "experience": 4,
                "price": 300,
                "availability": false,
                "phoneNum": "9000000001",
                "status": "approved"
            }"#,
        )
        .unwrap();

        assert_eq!(listing.owner_name(), "Lakshmi");
        assert_eq!(listing.status, CookStatus::Approved);
        assert!(!listing.availability);
        assert!(listing.coordinates().is_none());
    }

    #[test]
    fn test_listing_with_bare_or_missing_owner() {
        let listing: CookListing =
            serde_json::from_str(r#"{"_id": "c2", "user": "u9", "cuisines": []}"#).unwrap();
        assert_eq!(listing.user, Some(OwnerRef::Id("u9".to_string())));
        assert_eq!(listing.owner_name(), "Unknown User");
        assert!(listing.availability);
        assert_eq!(listing.status, CookStatus::Pending);

        let listing: CookListing = serde_json::from_str(r#"{"_id": "c3", "user": null}"#).unwrap();
        assert!(listing.user.is_none());
    }

    #[test]
    fn test_imperfect_listings_still_decode() {
        let listings: Vec<CookListing> = serde_json::from_str(
            r#"[
                {"_id": "c1", "price": 250.5, "experience": 2.5},
                {"_id": "c2", "phoneNum": null, "cuisines": null, "availability": null},
                {"_id": "c3", "user": {"_id": "u3"}, "status": null},
                {"_id": "c4", "price": 300, "phoneNum": "9000000001"}
            ]"#,
        )
        .unwrap();

        assert_eq!(listings.len(), 4);
        assert_eq!(listings[0].price, 250.5);
        assert_eq!(listings[1].phone_num, "");
        assert!(listings[1].cuisines.is_empty());
        assert!(listings[1].availability);
        assert_eq!(listings[2].owner_name(), "Unknown User");
        assert_eq!(listings[2].status, CookStatus::Pending);
        assert_eq!(listings[3].price, 300.0);

        let form = CookProfileForm::from_listing(&listings[0]);
        assert_eq!(form.price, 251);
        assert_eq!(form.experience, 3);
    }

    #[test]
    fn test_form_defaults_and_prefill() {
        let form = CookProfileForm::default();
        assert_eq!(form.experience, 1);
        assert_eq!(form.price, 200);
        assert!(form.availability);

        let listing: CookListing = serde_json::from_str(
            r#"{"_id": "c4", "cuisines": ["Vegan"], "phoneNum": "9811111111", "availability": false}"#,
        )
        .unwrap();
        let form = CookProfileForm::from_listing(&listing);
        assert_eq!(form.experience, DEFAULT_EXPERIENCE);
        assert_eq!(form.price, DEFAULT_PRICE);
        assert!(!form.availability);
        assert_eq!(form.cuisines, vec!["Vegan".to_string()]);
    }

    #[test]
    fn test_toggle_cuisine() {
        let mut form = CookProfileForm::default();
        form.toggle_cuisine("Chinese");
        form.toggle_cuisine("Italian");
        form.toggle_cuisine("Chinese");
        assert_eq!(form.cuisines, vec!["Italian".to_string()]);
    }

    #[test]
    fn test_form_validation_order() {
        assert!(valid_form().validate().is_ok());

        let mut form = valid_form();
        form.location_string = "  ".to_string();
        assert_eq!(form.validate().unwrap_err(), "City / location is required");

        let mut form = valid_form();
        form.location = None;
        assert_eq!(
            form.validate().unwrap_err(),
            "Allow location access or enter valid coordinates"
        );

        let mut form = valid_form();
        form.cuisines.clear();
        assert_eq!(form.validate().unwrap_err(), "Select at least one cuisine");

        let mut form = valid_form();
        form.phone_num = "5876543210".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            "Enter a valid 10-digit phone number"
        );

        let mut form = valid_form();
        form.price = 20;
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_form_serializes_null_location() {
        let json = serde_json::to_value(CookProfileForm::default()).unwrap();
        assert!(json["location"].is_null());
        assert_eq!(json["locationString"], "");
        assert_eq!(json["availability"], true);
    }
}

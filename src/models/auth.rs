//! Authentication and account payloads.

use serde::{Deserialize, Serialize};

use super::common::{Coordinates, GeoPoint};
use super::cook::CookStatus;
use super::user::{Role, User};
use crate::api::validation::{normalize_phone, validate_email, validate_required};

/// Label submitted when a signup carries no location description
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signup input as collected from the user, before normalisation
#[derive(Debug, Clone, Default)]
pub struct SignupData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_num: String,
    pub role: Option<Role>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub location_string: Option<String>,
}

/// Normalised body of `POST /api/auth/signup`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_num: String,
    pub role: Role,
    pub lat: f64,
    pub lng: f64,
    pub location: Coordinates,
    pub location_string: String,
}

impl SignupRequest {
    /// Validate the input and apply the wire defaults.
    ///
    /// The phone number is reduced to its last ten digits (fewer when fewer
    /// were given). Missing coordinates become `0,0` and a missing label
    /// becomes `"Unknown"`. Coordinates go out both flat and as `location`.
    pub fn from_data(data: &SignupData) -> Result<Self, String> {
        validate_required("Name", &data.name)?;
        validate_email(&data.email)?;
        validate_required("Password", &data.password)?;

        let phone_num = normalize_phone(&data.phone_num);

        let location = match (data.lat, data.lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
            _ => Coordinates::origin(),
        };
        location.validate()?;

        let location_string = data
            .location_string
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string();

        Ok(Self {
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
            password: data.password.clone(),
            phone_num,
            role: data.role.unwrap_or_default(),
            lat: location.lat,
            lng: location.lng,
            location,
            location_string,
        })
    }
}

/// Successful login/signup response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Body of `PUT /api/users/location`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub lat: f64,
    pub lng: f64,
    pub location_string: String,
}

impl LocationUpdate {
    pub fn new(coords: Coordinates, location_string: impl Into<String>) -> Self {
        Self {
            lat: coords.lat,
            lng: coords.lng,
            location_string: location_string.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::from_coordinates(self.coordinates())
    }
}

/// Body of `PATCH /api/cooks/:id/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: CookStatus,
}

/// The part of a status update response this client reads
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: CookStatus,
}

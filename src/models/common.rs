//! Geographic types shared across models.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as reported by the user's device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The fallback used when a signup carries no position.
    pub fn origin() -> Self {
        Self { lat: 0.0, lng: 0.0 }
    }

    /// Check that both components are finite and within range
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err("Latitude must be between -90 and 90".to_string());
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err("Longitude must be between -180 and 180".to_string());
        }
        Ok(())
    }
}

/// GeoJSON point as stored by the backend. Coordinates are `[lng, lat]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_kind")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

fn point_kind() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self {
            kind: point_kind(),
            coordinates: vec![coords.lng, coords.lat],
        }
    }

    /// Returns the position only when the point carries exactly two components
    pub fn as_coordinates(&self) -> Option<Coordinates> {
        match self.coordinates.as_slice() {
            [lng, lat] => Some(Coordinates::new(*lat, *lng)),
            _ => None,
        }
    }
}

//! Geographic coordinates used by the sun-relative time system.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LeetClockError, Result};

/// Latitude and longitude in decimal degrees.
///
/// Values are validated on construction: latitude in `[-90, 90]`, longitude in
/// `[-180, 180]`, both finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Helsinki. Used whenever no location has been configured.
pub const FALLBACK_LOCATION: GeoCoordinate = GeoCoordinate {
    latitude: 60.1699,
    longitude: 24.9384,
};

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(LeetClockError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Resolves an optional override against the fallback location.
    pub fn or_fallback(location: Option<GeoCoordinate>) -> GeoCoordinate {
        location.unwrap_or(FALLBACK_LOCATION)
    }
}

impl Default for GeoCoordinate {
    fn default() -> Self {
        FALLBACK_LOCATION
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = LeetClockError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoCoordinate> for RawCoordinate {
    fn from(value: GeoCoordinate) -> Self {
        RawCoordinate {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::geo::GeoCoordinate;

/// Identifier of the system selected when nothing else is configured.
pub const DEFAULT_SYSTEM: &str = "leet";

/// User-facing clock configuration read at the start of every tick.
///
/// The engine never mutates it; only the control layer does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    pub system: String,
    pub show_seconds: bool,
    pub location: Option<GeoCoordinate>,
}

impl ClockSettings {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: normalize_system_id(&system.into()),
            ..Self::default()
        }
    }

    pub fn with_show_seconds(mut self, show_seconds: bool) -> Self {
        self.show_seconds = show_seconds;
        self
    }

    pub fn with_location(mut self, location: Option<GeoCoordinate>) -> Self {
        self.location = location;
        self
    }

    /// Location used for sun-relative time, falling back to Helsinki.
    pub fn effective_location(&self) -> GeoCoordinate {
        GeoCoordinate::or_fallback(self.location)
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            show_seconds: false,
            location: None,
        }
    }
}

/// System ids are matched case-insensitively and without surrounding whitespace.
pub fn normalize_system_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

use chrono::NaiveDate;
use leetclock_core::GeoCoordinate;
use thiserror::Error;

use crate::solar::SunUnavailable;

/// Errors that may occur when converting time or driving the clock runtime.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("unknown time system: {0}")]
    UnknownSystem(String),
    #[error("unsupported time system: {0}")]
    UnsupportedSystem(String),
    #[error("no sunrise/sunset on {date} at {location}: {reason}")]
    AstronomicalDataUnavailable {
        date: NaiveDate,
        location: GeoCoordinate,
        reason: SunUnavailable,
    },
    #[error("clock runtime is shutting down")]
    ShuttingDown,
}

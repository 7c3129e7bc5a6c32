//! Core shared library for the leetclock workspace.
//!
//! This crate exposes the primitives every other crate depends on: the
//! canonical error type, geographic coordinates, the clock settings owned by
//! the control layer, configuration loading and logging setup.

pub mod config;
pub mod errors;
pub mod geo;
pub mod logging;
pub mod serde_utils;
pub mod settings;

pub use config::CoreConfig;
pub use errors::{ConfigError, LeetClockError};
pub use geo::{GeoCoordinate, FALLBACK_LOCATION};
pub use settings::{ClockSettings, DEFAULT_SYSTEM};

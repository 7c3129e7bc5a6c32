//! leetclock: alternative time systems for a decorative clock.
//!
//! A wall-clock instant is converted into one of eight time systems:
//!
//! * `leet`: 13 hours of 37 minutes of 37 seconds, starting at 13:37
//! * `real` and `real24`: the ordinary 12- and 24-hour clock
//! * `sata`: 100 × 100 × 100 seconds per day
//! * `relative`: twelve stretched hours per daytime and per nighttime
//! * `binary`: 16 × 64 × 64
//! * `hex`: 16 × 16 × 16 in hexadecimal digits
//! * `martian`: 24 × 60 × 60 over one Martian sol
//!
//! The workspace is split into `leetclock-core` (settings, configuration,
//! errors, logging) and `leetclock-engine` (conversion, scheduling and the
//! tick runtime). This crate re-exports both.

pub use leetclock_core::{ClockSettings, CoreConfig, GeoCoordinate, LeetClockError};
pub use leetclock_engine::{
    ClockHandle, ClockRuntime, ConversionEngine, EngineError, Frame, HandAngles,
    NormalizedTime, PolarPolicy, Reading, SolarCalculator, TickListener, TimeSystemSpec,
};

/// Version of the leetclock crates.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Conversion engine and tick runtime for leetclock.
//!
//! [`ConversionEngine`] turns a wall-clock instant into hours, minutes and
//! seconds of one of the registered time systems. [`ClockRuntime`] drives it
//! on a tokio task and hands each [`Frame`] to a [`TickListener`].

pub mod angles;
pub mod clock;
pub mod convert;
pub mod dial;
pub mod error;
pub mod frame;
pub mod moment;
pub mod planner;
pub mod readout;
pub mod registry;
pub mod relative;
pub mod runtime;
pub mod solar;
pub mod time;

pub use angles::{project, HandAngles};
pub use clock::{Clock, OffsetClock, SystemClock};
pub use convert::{ConversionEngine, Reading};
pub use dial::{layout, DialLabel, DialRing};
pub use error::EngineError;
pub use frame::{compose_frame, Frame, MIN_TICK};
pub use moment::LeetMomentDetector;
pub use planner::{delay_for, SchedulePlanner};
pub use readout::format_readout;
pub use registry::{DigitStyle, SystemKind, TimeSystemSpec};
pub use relative::{DaylightInterval, PolarPolicy, SunPhase};
pub use runtime::{ClockHandle, ClockRuntime, TickListener};
pub use solar::{SolarCalculator, SunEventProvider, SunEvents, SunUnavailable};
pub use time::NormalizedTime;

pub type Result<T> = std::result::Result<T, EngineError>;

use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;

use crate::registry::{TimeSystemSpec, EARTH_DAY_SECONDS};

/// A moment expressed in a custom time system.
///
/// `hour`, `minute` and `second` are always below the system's cardinalities
/// and `fraction` is the progress through the current custom second, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub fraction: f64,
}

impl NormalizedTime {
    /// Splits a continuous count of custom seconds into hour > minute > second,
    /// each reduced modulo its own cardinality.
    pub fn decompose(total_seconds: f64, spec: &TimeSystemSpec) -> Self {
        let total = if total_seconds.is_finite() {
            total_seconds.max(0.0)
        } else {
            0.0
        };
        let whole = total.floor();
        let fraction = total - whole;
        let whole = whole as u64;

        let seconds_per_minute = u64::from(spec.seconds_per_minute);
        let minutes_per_hour = u64::from(spec.minutes_per_hour);
        let hours_per_day = u64::from(spec.hours_per_day);

        Self {
            hour: ((whole / spec.seconds_per_hour()) % hours_per_day) as u32,
            minute: ((whole / seconds_per_minute) % minutes_per_hour) as u32,
            second: (whole % seconds_per_minute) as u32,
            fraction,
        }
    }

    /// Inverse of [`decompose`](Self::decompose) for values inside one cycle.
    pub fn total_seconds(&self, spec: &TimeSystemSpec) -> f64 {
        f64::from(self.hour) * spec.seconds_per_hour() as f64
            + f64::from(self.minute) * f64::from(spec.seconds_per_minute)
            + f64::from(self.second)
            + self.fraction
    }

    /// Custom seconds elapsed in the current minute, including the fraction.
    pub fn second_with_fraction(&self) -> f64 {
        f64::from(self.second) + self.fraction
    }
}

/// Real seconds since local midnight in the instant's own time zone, in `[0, 86400)`.
pub fn seconds_since_midnight<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let time = instant.time();
    // Leap seconds are reported as nanosecond values past one billion.
    let nanos = time.nanosecond().min(999_999_999);
    let seconds = f64::from(time.num_seconds_from_midnight()) + f64::from(nanos) / 1e9;
    seconds.min(EARTH_DAY_SECONDS - 1e-9)
}

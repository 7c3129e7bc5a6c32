use serde::Serialize;

use crate::registry::TimeSystemSpec;
use crate::time::NormalizedTime;

/// Clockwise hand angles in degrees from twelve o'clock, each in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

/// Projects a normalized time onto the dial. Every hand includes the progress
/// of the smaller units, so hands sweep instead of jumping.
pub fn project(time: &NormalizedTime, spec: &TimeSystemSpec) -> HandAngles {
    let seconds_per_minute = f64::from(spec.seconds_per_minute);
    let minutes_per_hour = f64::from(spec.minutes_per_hour);
    let hours_per_day = f64::from(spec.hours_per_day);

    let seconds = time.second_with_fraction();
    let minutes = f64::from(time.minute) + seconds / seconds_per_minute;
    let hours = f64::from(time.hour)
        + f64::from(time.minute) / minutes_per_hour
        + seconds / (minutes_per_hour * seconds_per_minute);

    HandAngles {
        hour: wrap_degrees(hours * 360.0 / hours_per_day),
        minute: wrap_degrees(minutes * 360.0 / minutes_per_hour),
        second: wrap_degrees(seconds * 360.0 / seconds_per_minute),
    }
}

fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

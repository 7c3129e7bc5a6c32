use serde::Serialize;

use crate::registry::TimeSystemSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialRing {
    Hour,
    Minute,
}

/// One numeral printed on the clock face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialLabel {
    pub ring: DialRing,
    pub index: u32,
    pub text: String,
    /// Clockwise from twelve o'clock.
    pub angle: f64,
}

/// Hour-ring then minute-ring numerals for `spec`, evenly spaced.
pub fn layout(spec: &TimeSystemSpec) -> Vec<DialLabel> {
    let ring = |ring: DialRing, count: u32| {
        (0..count).map(move |index| DialLabel {
            ring,
            index,
            text: spec.digits.render(index),
            angle: 360.0 / f64::from(count) * f64::from(index),
        })
    };

    ring(DialRing::Hour, spec.hours_per_day)
        .chain(ring(DialRing::Minute, spec.minutes_per_hour))
        .collect()
}

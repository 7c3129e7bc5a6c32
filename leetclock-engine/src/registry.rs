//! Static table of the supported time systems.

use serde::Serialize;

use crate::error::EngineError;

/// Real seconds in one Earth day.
pub const EARTH_DAY_SECONDS: f64 = 86_400.0;

/// Real seconds in one Martian solar day (sol).
pub const MARTIAN_DAY_SECONDS: f64 = 88_775.0;

/// 13:37:00 as seconds since local midnight.
pub const LEET_SECOND_OF_DAY: u32 = 13 * 3600 + 37 * 60;

/// How a system maps real time onto its units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SystemKind {
    /// The Earth day, shifted by `day_offset_seconds`, is stretched over the
    /// system's full cycle.
    Scaled { day_offset_seconds: u32 },
    /// The wall clock itself, folded into twelve hours.
    Civil12,
    /// Elapsed Earth seconds rescaled to a planetary solar day.
    Planetary { day_seconds: f64 },
    /// Twelve hours per daytime and per nighttime, recomputed from sunrise and sunset.
    SunRelative,
}

/// How unit values are written on the dial and in the readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitStyle {
    Decimal,
    Hex,
}

impl DigitStyle {
    pub fn render(self, value: u32) -> String {
        match self {
            DigitStyle::Decimal => value.to_string(),
            DigitStyle::Hex => format!("{:X}", value),
        }
    }

    pub fn render_padded(self, value: u32) -> String {
        match self {
            DigitStyle::Decimal => format!("{:02}", value),
            DigitStyle::Hex => format!("{:02X}", value),
        }
    }
}

/// Immutable description of one time system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSystemSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub hours_per_day: u32,
    pub minutes_per_hour: u32,
    pub seconds_per_minute: u32,
    pub kind: SystemKind,
    pub digits: DigitStyle,
}

impl TimeSystemSpec {
    /// Custom seconds in one full cycle of the system.
    pub fn cycle_length(&self) -> u64 {
        u64::from(self.hours_per_day)
            * u64::from(self.minutes_per_hour)
            * u64::from(self.seconds_per_minute)
    }

    pub fn seconds_per_hour(&self) -> u64 {
        u64::from(self.minutes_per_hour) * u64::from(self.seconds_per_minute)
    }

    pub fn day_offset_seconds(&self) -> Option<u32> {
        match self.kind {
            SystemKind::Scaled { day_offset_seconds } if day_offset_seconds > 0 => {
                Some(day_offset_seconds)
            }
            _ => None,
        }
    }

    /// Custom seconds per real second, when it does not depend on the sun.
    pub fn fixed_rate(&self) -> Option<f64> {
        match self.kind {
            SystemKind::Scaled { .. } => Some(self.cycle_length() as f64 / EARTH_DAY_SECONDS),
            SystemKind::Civil12 => Some(1.0),
            SystemKind::Planetary { day_seconds } => Some(day_seconds / EARTH_DAY_SECONDS),
            SystemKind::SunRelative => None,
        }
    }

    pub fn is_sun_relative(&self) -> bool {
        matches!(self.kind, SystemKind::SunRelative)
    }
}

const fn scaled(offset: u32) -> SystemKind {
    SystemKind::Scaled {
        day_offset_seconds: offset,
    }
}

static SYSTEMS: [TimeSystemSpec; 8] = [
    TimeSystemSpec {
        id: "leet",
        label: "Leet time",
        hours_per_day: 13,
        minutes_per_hour: 37,
        seconds_per_minute: 37,
        kind: scaled(LEET_SECOND_OF_DAY),
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "real",
        label: "Real time 12h",
        hours_per_day: 12,
        minutes_per_hour: 60,
        seconds_per_minute: 60,
        kind: SystemKind::Civil12,
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "real24",
        label: "Real time 24h",
        hours_per_day: 24,
        minutes_per_hour: 60,
        seconds_per_minute: 60,
        kind: scaled(0),
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "sata",
        label: "Sata time",
        hours_per_day: 100,
        minutes_per_hour: 100,
        seconds_per_minute: 100,
        kind: scaled(0),
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "relative",
        label: "Relative Hour",
        hours_per_day: 12,
        minutes_per_hour: 60,
        seconds_per_minute: 60,
        kind: SystemKind::SunRelative,
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "binary",
        label: "Binary time",
        hours_per_day: 16,
        minutes_per_hour: 64,
        seconds_per_minute: 64,
        kind: scaled(0),
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "martian",
        label: "Martian time",
        hours_per_day: 24,
        minutes_per_hour: 60,
        seconds_per_minute: 60,
        kind: SystemKind::Planetary {
            day_seconds: MARTIAN_DAY_SECONDS,
        },
        digits: DigitStyle::Decimal,
    },
    TimeSystemSpec {
        id: "hex",
        label: "Hex time",
        hours_per_day: 16,
        minutes_per_hour: 16,
        seconds_per_minute: 16,
        kind: scaled(0),
        digits: DigitStyle::Hex,
    },
];

/// Every registered system, in display cycling order.
pub fn all() -> &'static [TimeSystemSpec] {
    &SYSTEMS
}

/// Looks a system up by id (case-insensitive).
pub fn lookup(id: &str) -> Result<&'static TimeSystemSpec, EngineError> {
    let wanted = id.trim();
    SYSTEMS
        .iter()
        .find(|spec| spec.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| EngineError::UnknownSystem(id.to_string()))
}

/// Same lookup, reported the way `convert` and the planner report a bad id.
pub(crate) fn lookup_supported(id: &str) -> Result<&'static TimeSystemSpec, EngineError> {
    lookup(id).map_err(|_| EngineError::UnsupportedSystem(id.to_string()))
}

/// The system after `id`, wrapping around to the first one.
pub fn next(id: &str) -> Result<&'static TimeSystemSpec, EngineError> {
    let current = lookup(id)?;
    let index = SYSTEMS
        .iter()
        .position(|spec| spec.id == current.id)
        .unwrap_or(0);
    Ok(&SYSTEMS[(index + 1) % SYSTEMS.len()])
}

//! Daytime/nighttime intervals for sun-relative time.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use leetclock_core::GeoCoordinate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;
use crate::registry::EARTH_DAY_SECONDS;
use crate::solar::{SunEventProvider, SunEvents, SunUnavailable};

/// Relative seconds in one interval: 12 hours of 60 minutes of 60 seconds.
pub const RELATIVE_SECONDS_PER_INTERVAL: f64 = 12.0 * 60.0 * 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SunPhase {
    Day,
    Night,
}

impl fmt::Display for SunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SunPhase::Day => write!(f, "day"),
            SunPhase::Night => write!(f, "night"),
        }
    }
}

/// What to do when the sun neither rises nor sets on the requested date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarPolicy {
    /// Report `AstronomicalDataUnavailable` to the caller.
    Propagate,
    /// Use one interval from local midnight to local midnight: daytime under
    /// the midnight sun, nighttime during polar night.
    #[default]
    WholeDay,
}

/// The daytime or nighttime interval containing an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaylightInterval {
    pub phase: SunPhase,
    pub start: DateTime<Utc>,
    /// Interval length in real seconds.
    pub length: f64,
    /// Real seconds since `start`, in `[0, length)`.
    pub elapsed: f64,
}

impl DaylightInterval {
    /// Places `instant` in a daytime `[sunrise, sunset)` or in a nighttime
    /// `[sunset, next sunrise)` taken from `days`, the sun events of
    /// consecutive dates in ascending order.
    ///
    /// Fails when the events are inconsistent or do not bracket the instant.
    pub fn locate<Tz: TimeZone>(
        instant: &DateTime<Tz>,
        days: &[SunEvents],
    ) -> Result<Self, SunUnavailable> {
        for events in days {
            let day_length = delta_seconds(events.sunset - events.sunrise);
            if !(day_length > 0.0 && day_length < EARTH_DAY_SECONDS) {
                return Err(SunUnavailable::Other(format!(
                    "implausible day length of {day_length} seconds"
                )));
            }
        }

        let now = instant.with_timezone(&Utc);
        let day = days
            .iter()
            .find(|events| now >= events.sunrise && now < events.sunset)
            .map(|events| (SunPhase::Day, events.sunrise, events.sunset));
        let night = || {
            days.windows(2)
                .find(|pair| now >= pair[0].sunset && now < pair[1].sunrise)
                .map(|pair| (SunPhase::Night, pair[0].sunset, pair[1].sunrise))
        };

        let (phase, start, end) = day.or_else(night).ok_or_else(|| {
            SunUnavailable::Other(format!("no sunrise/sunset pair brackets {now}"))
        })?;

        let length = delta_seconds(end - start);
        let elapsed = delta_seconds(now - start);
        if !(0.0..length).contains(&elapsed) {
            return Err(SunUnavailable::Other(format!(
                "{elapsed} seconds into an interval of {length} seconds"
            )));
        }

        Ok(Self {
            phase,
            start,
            length,
            elapsed,
        })
    }

    /// A single interval spanning the instant's local day, used when the sun
    /// stays up or down.
    pub fn whole_day<Tz: TimeZone>(instant: &DateTime<Tz>, reason: &SunUnavailable) -> Option<Self> {
        let phase = match reason {
            SunUnavailable::MidnightSun => SunPhase::Day,
            SunUnavailable::PolarNight => SunPhase::Night,
            SunUnavailable::Other(_) => return None,
        };

        let midnight = instant.date_naive().and_time(NaiveTime::MIN);
        let start = instant
            .timezone()
            .from_local_datetime(&midnight)
            .earliest()?
            .with_timezone(&Utc);

        Some(Self {
            phase,
            start,
            length: EARTH_DAY_SECONDS,
            elapsed: crate::time::seconds_since_midnight(instant),
        })
    }

    /// Real seconds in one relative second of this interval.
    pub fn relative_second(&self) -> f64 {
        self.length / RELATIVE_SECONDS_PER_INTERVAL
    }

    /// Relative seconds elapsed since the interval started.
    pub fn relative_elapsed(&self) -> f64 {
        self.elapsed / self.relative_second()
    }
}

/// Asks `provider` for the sun events around the civil date containing
/// `instant` and locates the instant within them.
///
/// The neighbouring dates are consulted too: when the instant's zone is far
/// from the location's, the interval it falls in can start on the day before
/// or end on the day after its civil date.
pub fn current_interval<P, Tz>(
    provider: &P,
    instant: &DateTime<Tz>,
    location: GeoCoordinate,
) -> Result<DaylightInterval, EngineError>
where
    P: SunEventProvider + ?Sized,
    Tz: TimeZone,
{
    let date = instant.date_naive();
    let unavailable = |reason| EngineError::AstronomicalDataUnavailable {
        date,
        location,
        reason,
    };

    let today = provider.sun_events(date, location).map_err(unavailable)?;
    let mut neighbour_failure = None;
    let mut around = |day: Option<NaiveDate>| match day {
        Some(day) => match provider.sun_events(day, location) {
            Ok(events) => Some(events),
            Err(reason) => {
                neighbour_failure.get_or_insert(reason);
                None
            }
        },
        None => None,
    };

    let days: Vec<SunEvents> = around(date.pred_opt())
        .into_iter()
        .chain(Some(today))
        .chain(around(date.succ_opt()))
        .collect();

    DaylightInterval::locate(instant, &days).map_err(|reason| match neighbour_failure {
        // The bracketing day is polar; report that rather than the gap.
        Some(polar) if matches!(reason, SunUnavailable::Other(_)) => unavailable(polar),
        _ => unavailable(reason),
    })
}

/// Like [`current_interval`], applying `policy` when the sun stays up or down.
pub fn interval_with_policy<P, Tz>(
    provider: &P,
    instant: &DateTime<Tz>,
    location: GeoCoordinate,
    policy: PolarPolicy,
) -> Result<DaylightInterval, EngineError>
where
    P: SunEventProvider + ?Sized,
    Tz: TimeZone,
{
    match current_interval(provider, instant, location) {
        Err(EngineError::AstronomicalDataUnavailable {
            date,
            location,
            reason,
        }) if policy == PolarPolicy::WholeDay => {
            match DaylightInterval::whole_day(instant, &reason) {
                Some(interval) => {
                    warn!(%location, %reason, "no sunrise/sunset; using the whole local day");
                    Ok(interval)
                }
                None => Err(EngineError::AstronomicalDataUnavailable {
                    date,
                    location,
                    reason,
                }),
            }
        }
        other => other,
    }
}

pub(crate) fn delta_seconds(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

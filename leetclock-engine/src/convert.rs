//! The conversion engine: real instant -> normalized custom time.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone};
use leetclock_core::GeoCoordinate;
use serde::Serialize;

use crate::error::EngineError;
use crate::planner::SchedulePlanner;
use crate::registry::{lookup_supported, SystemKind, TimeSystemSpec, EARTH_DAY_SECONDS};
use crate::relative::{interval_with_policy, PolarPolicy, SunPhase};
use crate::solar::{SolarCalculator, SunEventProvider};
use crate::time::{seconds_since_midnight, NormalizedTime};

/// Result of converting one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub system: &'static str,
    pub time: NormalizedTime,
    /// Wall-clock time the reading was derived from.
    pub local_time: NaiveTime,
    /// Day or night, for sun-relative time only.
    pub phase: Option<SunPhase>,
    /// Custom seconds per real second at this instant.
    pub rate: f64,
}

/// Stateless converter; the only thing it holds is the astronomical provider.
#[derive(Debug)]
pub struct ConversionEngine<P = SolarCalculator> {
    provider: Arc<P>,
}

impl<P> Clone for ConversionEngine<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl Default for ConversionEngine<SolarCalculator> {
    fn default() -> Self {
        Self::new(SolarCalculator)
    }
}

impl<P: SunEventProvider> ConversionEngine<P> {
    pub fn new(provider: P) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    pub fn from_shared(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// A planner sharing this engine's provider.
    pub fn planner(&self) -> SchedulePlanner<P> {
        SchedulePlanner::new(Arc::clone(&self.provider))
    }

    /// Converts `instant` into the system named `system_id`.
    ///
    /// `location` is only used by the sun-relative system and defaults to the
    /// fallback location. Polar dates fail with `AstronomicalDataUnavailable`.
    pub fn convert<Tz: TimeZone>(
        &self,
        instant: &DateTime<Tz>,
        system_id: &str,
        location: Option<GeoCoordinate>,
    ) -> Result<Reading, EngineError> {
        self.convert_with_policy(instant, system_id, location, PolarPolicy::Propagate)
    }

    /// Same as [`convert`](Self::convert), with an explicit polar fallback.
    pub fn convert_with_policy<Tz: TimeZone>(
        &self,
        instant: &DateTime<Tz>,
        system_id: &str,
        location: Option<GeoCoordinate>,
        policy: PolarPolicy,
    ) -> Result<Reading, EngineError> {
        let spec = lookup_supported(system_id)?;
        let local_time = instant.time();

        let (time, phase, rate) = match spec.kind {
            SystemKind::Scaled { day_offset_seconds } => {
                scaled(spec, seconds_since_midnight(instant), day_offset_seconds)
            }
            SystemKind::Civil12 => civil(spec, seconds_since_midnight(instant)),
            SystemKind::Planetary { day_seconds } => {
                planetary(spec, seconds_since_midnight(instant), day_seconds)
            }
            SystemKind::SunRelative => {
                let location = GeoCoordinate::or_fallback(location);
                let interval = interval_with_policy(&*self.provider, instant, location, policy)?;
                let time = NormalizedTime::decompose(interval.relative_elapsed(), spec);
                (time, Some(interval.phase), 1.0 / interval.relative_second())
            }
        };

        Ok(Reading {
            system: spec.id,
            time,
            local_time,
            phase,
            rate,
        })
    }
}

type Converted = (NormalizedTime, Option<SunPhase>, f64);

fn scaled(spec: &TimeSystemSpec, seconds: f64, day_offset_seconds: u32) -> Converted {
    let mut adjusted = (seconds - f64::from(day_offset_seconds)).rem_euclid(EARTH_DAY_SECONDS);
    if adjusted >= EARTH_DAY_SECONDS {
        adjusted = 0.0;
    }

    let cycle = spec.cycle_length() as f64;
    let mut total = adjusted / EARTH_DAY_SECONDS * cycle;
    if total >= cycle {
        total -= cycle;
    }

    (
        NormalizedTime::decompose(total, spec),
        None,
        cycle / EARTH_DAY_SECONDS,
    )
}

/// The wall clock as is; `decompose` reduces the hour modulo twelve.
fn civil(spec: &TimeSystemSpec, seconds: f64) -> Converted {
    (NormalizedTime::decompose(seconds, spec), None, 1.0)
}

fn planetary(spec: &TimeSystemSpec, seconds: f64, day_seconds: f64) -> Converted {
    let rate = day_seconds / EARTH_DAY_SECONDS;
    (NormalizedTime::decompose(seconds * rate, spec), None, rate)
}

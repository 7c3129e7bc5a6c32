//! Computes how long to wait before the displayed custom second changes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use leetclock_core::GeoCoordinate;

use crate::error::EngineError;
use crate::registry::lookup_supported;
use crate::relative::{interval_with_policy, PolarPolicy};
use crate::solar::SunEventProvider;

/// Real time until the next custom-second boundary, for a system advancing
/// `rate` custom seconds per real second and currently `fraction` of the way
/// through its second.
pub fn delay_for(rate: f64, fraction: f64) -> Duration {
    if !(rate.is_finite() && rate > 0.0) {
        return Duration::ZERO;
    }
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Duration::from_secs_f64(((1.0 - fraction) / rate).max(0.0))
}

/// Delay computation per system.
///
/// Fixed systems use their constant rate; the sun-relative system measures
/// the live relative second from the provider, applying the same polar
/// policy as the conversion it follows.
#[derive(Debug)]
pub struct SchedulePlanner<P> {
    provider: Arc<P>,
    policy: PolarPolicy,
}

impl<P: SunEventProvider> SchedulePlanner<P> {
    /// A planner that reports polar dates as errors.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            policy: PolarPolicy::Propagate,
        }
    }

    pub fn with_polar_policy(mut self, policy: PolarPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn next_tick_delay<Tz: TimeZone>(
        &self,
        system_id: &str,
        fraction: f64,
        instant: &DateTime<Tz>,
        location: Option<GeoCoordinate>,
    ) -> Result<Duration, EngineError> {
        let spec = lookup_supported(system_id)?;
        let rate = match spec.fixed_rate() {
            Some(rate) => rate,
            None => {
                let location = GeoCoordinate::or_fallback(location);
                let interval =
                    interval_with_policy(&*self.provider, instant, location, self.policy)?;
                1.0 / interval.relative_second()
            }
        };

        Ok(delay_for(rate, fraction))
    }
}

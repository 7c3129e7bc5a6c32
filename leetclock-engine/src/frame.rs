use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use leetclock_core::ClockSettings;
use serde::Serialize;

use crate::angles::{project, HandAngles};
use crate::convert::{ConversionEngine, Reading};
use crate::error::EngineError;
use crate::moment::LeetMomentDetector;
use crate::readout::format_readout;
use crate::registry::lookup_supported;
use crate::relative::PolarPolicy;
use crate::solar::SunEventProvider;

/// Shortest wait between two frames.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub at: DateTime<FixedOffset>,
    pub label: &'static str,
    pub reading: Reading,
    pub angles: HandAngles,
    pub readout: String,
    /// True on the one frame that observed 13:37:00 for the current date.
    pub leet_moment: bool,
    pub next_delay: Duration,
}

/// Converts `now` under `settings` and assembles the frame, feeding the
/// 13:37 detector along the way.
///
/// The returned delay is the time until the custom second changes, cut short
/// when 13:37:00 comes sooner.
pub fn compose_frame<P: SunEventProvider>(
    engine: &ConversionEngine<P>,
    settings: &ClockSettings,
    policy: PolarPolicy,
    now: &DateTime<FixedOffset>,
    detector: &mut LeetMomentDetector,
) -> Result<Frame, EngineError> {
    let spec = lookup_supported(&settings.system)?;
    let reading = engine.convert_with_policy(now, spec.id, settings.location, policy)?;

    let angles = project(&reading.time, spec);
    let readout = format_readout(&reading, spec, settings.show_seconds);

    let local = now.naive_local();
    let leet_moment = detector.observe(local);
    let next_delay = engine
        .planner()
        .with_polar_policy(policy)
        .next_tick_delay(spec.id, reading.time.fraction, now, settings.location)?
        .min(detector.until_next(local))
        .max(MIN_TICK);

    Ok(Frame {
        at: *now,
        label: spec.label,
        reading,
        angles,
        readout,
        leet_moment,
        next_delay,
    })
}

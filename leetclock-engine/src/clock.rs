//! Wall-clock sources for the tick runtime.

use chrono::{DateTime, FixedOffset, Local, TimeDelta};
use tokio::time::Instant;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Starts at a chosen instant and advances with the tokio clock, so it follows
/// paused test time.
#[derive(Debug, Clone)]
pub struct OffsetClock {
    base: DateTime<FixedOffset>,
    started: Instant,
}

impl OffsetClock {
    pub fn starting_at(base: DateTime<FixedOffset>) -> Self {
        Self {
            base,
            started: Instant::now(),
        }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or_else(|_| TimeDelta::zero());
        self.base.checked_add_signed(elapsed).unwrap_or(self.base)
    }
}

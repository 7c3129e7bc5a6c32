//! Detects the wall clock passing 13:37:00.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::registry::LEET_SECOND_OF_DAY;

fn leet_on(date: NaiveDate) -> NaiveDateTime {
    let time = NaiveTime::from_num_seconds_from_midnight_opt(LEET_SECOND_OF_DAY, 0)
        .unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Fires at most once per civil date.
///
/// A match is either an observation inside the 13:37:00 second or a gap
/// between two observations that steps over it.
#[derive(Debug, Clone, Default)]
pub struct LeetMomentDetector {
    last_seen: Option<NaiveDateTime>,
    last_fired: Option<NaiveDate>,
}

impl LeetMomentDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, local: NaiveDateTime) -> bool {
        let date = local.date();
        let moment = leet_on(date);
        let previous = self.last_seen.replace(local);

        if self.last_fired == Some(date) {
            return false;
        }

        let inside = local >= moment && local < moment + TimeDelta::seconds(1);
        let crossed = previous.is_some_and(|prev| prev < moment && local >= moment);
        if inside || crossed {
            self.last_fired = Some(date);
            return true;
        }
        false
    }

    /// Real time until the next 13:37:00 strictly after `local`.
    pub fn until_next(&self, local: NaiveDateTime) -> Duration {
        let today = leet_on(local.date());
        let next = if local < today {
            today
        } else {
            today + TimeDelta::days(1)
        };
        (next - local).to_std().unwrap_or(Duration::ZERO)
    }
}

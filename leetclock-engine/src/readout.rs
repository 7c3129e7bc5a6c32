use chrono::Timelike;

use crate::convert::Reading;
use crate::registry::{SystemKind, TimeSystemSpec};

/// Digital readout, e.g. `Hex time: 08:0A` or `Real time 12h: 12:05 AM`.
///
/// The 12-hour clock shows hour 0 as 12. The 12-hour and sun-relative clocks
/// get an AM/PM suffix from the wall clock when seconds are hidden.
pub fn format_readout(reading: &Reading, spec: &TimeSystemSpec, show_seconds: bool) -> String {
    let digits = spec.digits;
    let hour = match spec.kind {
        SystemKind::Civil12 if reading.time.hour == 0 => 12,
        _ => reading.time.hour,
    };

    let mut text = format!(
        "{}: {}:{}",
        spec.label,
        digits.render_padded(hour),
        digits.render_padded(reading.time.minute)
    );

    if show_seconds {
        text.push(':');
        text.push_str(&digits.render_padded(reading.time.second));
    } else if matches!(spec.kind, SystemKind::Civil12 | SystemKind::SunRelative) {
        text.push_str(if reading.local_time.hour() >= 12 {
            " PM"
        } else {
            " AM"
        });
    }

    text
}

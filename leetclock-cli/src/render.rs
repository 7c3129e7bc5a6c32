use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use colored::*;
use leetclock_core::GeoCoordinate;
use leetclock_engine::{
    DialLabel, DialRing, EngineError, Frame, SunEvents, SunUnavailable, TickListener,
    TimeSystemSpec,
};
use serde::Serialize;

/// Prints one line per frame for `leetclock watch`.
#[derive(Debug, Default)]
pub struct ConsoleListener;

#[async_trait]
impl TickListener for ConsoleListener {
    async fn on_frame(&self, frame: &Frame) -> Result<(), String> {
        if frame.leet_moment {
            println!("{}", "★ 13:37 ★".magenta().bold());
        }
        println!("{}", frame_line(frame));
        Ok(())
    }

    async fn on_error(&self, error: &EngineError) {
        eprintln!("{} {}", "✖".red().bold(), error);
    }
}

pub fn frame_line(frame: &Frame) -> String {
    let mut line = format!(
        "{}  {}",
        frame.at.format("%H:%M:%S%.3f"),
        frame.readout.bold()
    );
    if let Some(phase) = frame.reading.phase {
        line.push_str(&format!("  ({})", phase.to_string().dimmed()));
    }
    line
}

pub fn print_frame(frame: &Frame) {
    if frame.leet_moment {
        println!("{}", "★ 13:37 ★".magenta().bold());
    }
    println!("{}", frame.readout.green().bold());
    println!("  Local time: {}", frame.at.format("%Y-%m-%d %H:%M:%S%.3f %:z"));
    if let Some(phase) = frame.reading.phase {
        println!("  Sun phase: {}", phase);
    }
    println!(
        "  Hands: hour {:.2}°, minute {:.2}°, second {:.2}°",
        frame.angles.hour, frame.angles.minute, frame.angles.second
    );
    println!("  Rate: {:.6} custom s per real s", frame.reading.rate);
    println!("  Next tick in: {}", format_delay(frame.next_delay));
}

pub fn print_systems(specs: &[TimeSystemSpec], active: &str) {
    for spec in specs {
        let marker = if spec.id == active { "▶" } else { " " };
        println!(
            "{} {:<8} {:<16} {}h × {}m × {}s",
            marker,
            spec.id.bold(),
            spec.label,
            spec.hours_per_day,
            spec.minutes_per_hour,
            spec.seconds_per_minute
        );
    }
}

pub fn print_dial(spec: &TimeSystemSpec, labels: &[DialLabel]) {
    println!("{}", spec.label.green().bold());
    for ring in [DialRing::Hour, DialRing::Minute] {
        let title = match ring {
            DialRing::Hour => "Hour ring",
            DialRing::Minute => "Minute ring",
        };
        println!("  {}:", title);
        for label in labels.iter().filter(|label| label.ring == ring) {
            println!("    {:>3} at {:>7.2}°", label.text, label.angle);
        }
    }
}

/// Sunrise and sunset for one date, as printed by `leetclock sun`.
#[derive(Debug, Clone, Serialize)]
pub struct SunReport {
    pub date: NaiveDate,
    pub location: GeoCoordinate,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub day_seconds: Option<i64>,
    pub night_seconds: Option<i64>,
    pub solar_noon: Option<DateTime<Utc>>,
    pub unavailable: Option<String>,
}

impl SunReport {
    pub fn new(
        date: NaiveDate,
        location: GeoCoordinate,
        events: Result<SunEvents, SunUnavailable>,
        solar_noon: Option<DateTime<Utc>>,
    ) -> Self {
        let mut report = Self {
            date,
            location,
            sunrise: None,
            sunset: None,
            day_seconds: None,
            night_seconds: None,
            solar_noon,
            unavailable: None,
        };

        match events {
            Ok(events) => {
                let day = (events.sunset - events.sunrise).num_seconds();
                report.sunrise = Some(events.sunrise);
                report.sunset = Some(events.sunset);
                report.day_seconds = Some(day);
                report.night_seconds = Some(86_400 - day);
            }
            Err(reason) => report.unavailable = Some(reason.to_string()),
        }
        report
    }
}

pub fn print_sun(report: &SunReport) {
    println!(
        "{} {} at {}",
        "☀ Sun on".yellow().bold(),
        report.date,
        report.location
    );
    if let Some(reason) = &report.unavailable {
        println!("  {}", reason.yellow());
    }
    if let (Some(sunrise), Some(sunset)) = (report.sunrise, report.sunset) {
        println!("  Sunrise: {}", sunrise.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("  Sunset:  {}", sunset.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(noon) = report.solar_noon {
        println!("  Solar noon: {}", noon.format("%H:%M:%S UTC"));
    }
    if let (Some(day), Some(night)) = (report.day_seconds, report.night_seconds) {
        println!("  Day length:   {}", format_hms(day));
        println!("  Night length: {}", format_hms(night));
    }
}

pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

pub fn format_delay(delay: Duration) -> String {
    if delay < Duration::from_secs(1) {
        format!("{} ms", delay.as_millis())
    } else {
        format!("{:.3} s", delay.as_secs_f64())
    }
}

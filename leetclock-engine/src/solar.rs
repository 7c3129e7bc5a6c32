//! Sunrise and sunset: the astronomical provider seam and a built-in
//! implementation of the low-precision solar position algorithm.

use std::f64::consts::PI;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use leetclock_core::GeoCoordinate;
use serde::Serialize;

/// Sunrise and sunset of one civil date at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunEvents {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Why a provider could not produce sun events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SunUnavailable {
    /// The sun stays above the horizon all day.
    MidnightSun,
    /// The sun stays below the horizon all day.
    PolarNight,
    /// Provider-specific failure.
    Other(String),
}

impl fmt::Display for SunUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SunUnavailable::MidnightSun => f.write_str("the sun does not set"),
            SunUnavailable::PolarNight => f.write_str("the sun does not rise"),
            SunUnavailable::Other(reason) => f.write_str(reason),
        }
    }
}

/// Source of sunrise/sunset instants for the sun-relative time system.
pub trait SunEventProvider: Send + Sync + 'static {
    fn sun_events(
        &self,
        date: NaiveDate,
        location: GeoCoordinate,
    ) -> Result<SunEvents, SunUnavailable>;
}

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const J0: f64 = 0.0009;
/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = RAD * 23.4397;
/// Apparent altitude of the sun's upper limb at rise/set, refraction included.
const HORIZON_ALTITUDE: f64 = RAD * -0.833;

/// Computes sun events from orbital mechanics; accurate to a minute or two
/// away from the poles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarCalculator;

impl SolarCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Solar noon of `date` at `location`.
    pub fn solar_noon(&self, date: NaiveDate, location: GeoCoordinate) -> Option<DateTime<Utc>> {
        let cycle = SolarCycle::new(date, location)?;
        from_julian(cycle.transit(0.0))
    }
}

impl SunEventProvider for SolarCalculator {
    fn sun_events(
        &self,
        date: NaiveDate,
        location: GeoCoordinate,
    ) -> Result<SunEvents, SunUnavailable> {
        let cycle = SolarCycle::new(date, location)
            .ok_or_else(|| SunUnavailable::Other(format!("date {} out of range", date)))?;

        let phi = RAD * location.latitude();
        let cos_hour_angle = (HORIZON_ALTITUDE.sin() - phi.sin() * cycle.declination.sin())
            / (phi.cos() * cycle.declination.cos());

        if cos_hour_angle > 1.0 {
            return Err(SunUnavailable::PolarNight);
        }
        if cos_hour_angle < -1.0 || !cos_hour_angle.is_finite() {
            // At the exact poles the denominator vanishes; treat it as a
            // day-long sun when the declination puts the sun on that side.
            return Err(if phi * cycle.declination >= 0.0 {
                SunUnavailable::MidnightSun
            } else {
                SunUnavailable::PolarNight
            });
        }

        let hour_angle = cos_hour_angle.acos();
        let noon = cycle.transit(0.0);
        let set = cycle.transit(hour_angle);
        let rise = noon - (set - noon);

        let out_of_range = || SunUnavailable::Other("sun event out of range".to_string());
        Ok(SunEvents {
            sunrise: from_julian(rise).ok_or_else(out_of_range)?,
            sunset: from_julian(set).ok_or_else(out_of_range)?,
        })
    }
}

/// Solar quantities for the transit nearest local noon of one date.
struct SolarCycle {
    west_longitude: f64,
    cycle: f64,
    mean_anomaly: f64,
    ecliptic_longitude: f64,
    declination: f64,
}

impl SolarCycle {
    fn new(date: NaiveDate, location: GeoCoordinate) -> Option<Self> {
        let noon_utc = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0)?);
        let days = noon_utc.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970 - J2000;

        let west_longitude = RAD * -location.longitude();
        let cycle = (days - J0 - west_longitude / (2.0 * PI)).round();
        let approx_transit = J0 + west_longitude / (2.0 * PI) + cycle;

        let mean_anomaly = RAD * (357.5291 + 0.985_600_28 * approx_transit);
        let center = RAD
            * (1.9148 * mean_anomaly.sin()
                + 0.02 * (2.0 * mean_anomaly).sin()
                + 0.0003 * (3.0 * mean_anomaly).sin());
        let perihelion = RAD * 102.9372;
        let ecliptic_longitude = mean_anomaly + center + perihelion + PI;
        let declination = (OBLIQUITY.sin() * ecliptic_longitude.sin()).asin();

        Some(Self {
            west_longitude,
            cycle,
            mean_anomaly,
            ecliptic_longitude,
            declination,
        })
    }

    /// Julian date at which the sun reaches `hour_angle` (0 is the transit).
    fn transit(&self, hour_angle: f64) -> f64 {
        let approx = J0 + (hour_angle + self.west_longitude) / (2.0 * PI) + self.cycle;
        J2000 + approx + 0.0053 * self.mean_anomaly.sin()
            - 0.0069 * (2.0 * self.ecliptic_longitude).sin()
    }
}

fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let millis = (julian + 0.5 - J1970) * DAY_MS;
    if !millis.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(millis.round() as i64).single()
}

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};
use leetclock::{ConversionEngine, GeoCoordinate, SolarCalculator};
use leetclock_engine::registry::{all, lookup, SystemKind, EARTH_DAY_SECONDS};
use leetclock_engine::relative::DaylightInterval;
use leetclock_engine::{delay_for, project, SunEventProvider, SunEvents, SunPhase};
use test_case::test_case;

fn helsinki() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600).unwrap()
}

/// A spread of instants over one day, including both ends.
fn sample_instants() -> Vec<DateTime<FixedOffset>> {
    let start = helsinki().with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
    let mut instants: Vec<_> = (0..288)
        .map(|i| start + TimeDelta::milliseconds(i * 300_007))
        .collect();
    instants.push(start + TimeDelta::milliseconds(86_399_999));
    instants.push(helsinki().with_ymd_and_hms(2024, 3, 20, 13, 37, 0).unwrap());
    instants
}

#[test]
fn every_component_stays_in_range() {
    let engine = ConversionEngine::default();
    for spec in all() {
        for instant in sample_instants() {
            let reading = engine.convert(&instant, spec.id, None).unwrap();
            let time = reading.time;
            assert!(time.hour < spec.hours_per_day, "{} at {}", spec.id, instant);
            assert!(time.minute < spec.minutes_per_hour, "{} at {}", spec.id, instant);
            assert!(time.second < spec.seconds_per_minute, "{} at {}", spec.id, instant);
            assert!((0.0..1.0).contains(&time.fraction), "{} at {}", spec.id, instant);
        }
    }
}

#[test]
fn scaled_systems_round_trip_their_total() {
    let engine = ConversionEngine::default();
    for spec in all() {
        let SystemKind::Scaled { day_offset_seconds } = spec.kind else {
            continue;
        };
        let cycle = spec.cycle_length() as f64;

        for instant in sample_instants() {
            let seconds = f64::from(instant.num_seconds_from_midnight())
                + f64::from(instant.nanosecond()) / 1e9;
            let expected = (seconds - f64::from(day_offset_seconds)).rem_euclid(EARTH_DAY_SECONDS)
                / EARTH_DAY_SECONDS
                * cycle;

            let reading = engine.convert(&instant, spec.id, None).unwrap();
            let total = reading.time.total_seconds(spec);
            assert!(
                (total - expected).abs() < 1e-6,
                "{}: {} != {}",
                spec.id,
                total,
                expected
            );
        }
    }
}

/// Instants just before the next custom minute and hour boundary after
/// `instant`, so a short step crosses it.
fn boundary_instants(
    engine: &ConversionEngine,
    id: &str,
    instant: DateTime<FixedOffset>,
) -> Vec<DateTime<FixedOffset>> {
    let spec = lookup(id).unwrap();
    let reading = engine.convert(&instant, id, None).unwrap();
    let seconds_per_minute = f64::from(spec.seconds_per_minute);
    let into_minute = reading.time.second_with_fraction();
    let into_hour = f64::from(reading.time.minute) * seconds_per_minute + into_minute;

    [
        seconds_per_minute - into_minute,
        spec.seconds_per_hour() as f64 - into_hour,
    ]
    .into_iter()
    .map(|custom| {
        let real = TimeDelta::nanoseconds((custom / reading.rate * 1e9) as i64);
        instant + real - TimeDelta::milliseconds(25)
    })
    .collect()
}

#[test_case("leet")]
#[test_case("real")]
#[test_case("real24")]
#[test_case("sata")]
#[test_case("binary")]
#[test_case("martian")]
#[test_case("hex")]
#[test_case("relative")]
fn hands_move_in_proportion_to_the_rate(id: &str) {
    let engine = ConversionEngine::default();
    let spec = lookup(id).unwrap();
    let step = TimeDelta::milliseconds(50);
    let seconds_per_minute = f64::from(spec.seconds_per_minute);
    let minutes_per_hour = f64::from(spec.minutes_per_hour);
    let hours_per_day = f64::from(spec.hours_per_day);

    // Early hours only: the Martian clock restarts at Earth midnight.
    let mut instants: Vec<_> = sample_instants().into_iter().take(100).collect();
    let boundaries: Vec<_> = instants
        .iter()
        .step_by(7)
        .flat_map(|instant| boundary_instants(&engine, id, *instant))
        .collect();
    instants.extend(boundaries);

    let mut checked = 0;
    for instant in instants {
        let before = engine.convert(&instant, id, None).unwrap();
        let after = engine.convert(&(instant + step), id, None).unwrap();
        // Sunrise and sunset restart the relative clock.
        if before.phase != after.phase || before.rate != after.rate {
            continue;
        }
        let a = project(&before.time, spec);
        let b = project(&after.time, spec);

        let custom = 0.05 * before.rate;
        let hands = [
            ("second", a.second, b.second, seconds_per_minute),
            (
                "minute",
                a.minute,
                b.minute,
                minutes_per_hour * seconds_per_minute,
            ),
            (
                "hour",
                a.hour,
                b.hour,
                hours_per_day * minutes_per_hour * seconds_per_minute,
            ),
        ];
        for (hand, from, to, seconds_per_turn) in hands {
            let expected = custom * 360.0 / seconds_per_turn;
            let moved = (to - from).rem_euclid(360.0);
            assert!(
                (moved - expected).abs() < 1e-6,
                "{id} {hand} hand at {instant}: moved {moved}, expected {expected}"
            );
        }
        checked += 1;
    }
    assert!(checked >= 100, "{id}: only {checked} samples checked");
}

#[test]
fn tick_delay_shrinks_towards_zero() {
    for rate in [0.206, 1.0, 1.0274, 11.57] {
        let mut previous = delay_for(rate, 0.0);
        assert!(previous > std::time::Duration::ZERO);
        for step in 1..=100 {
            let fraction = f64::from(step) / 100.0 * 0.999_999;
            let delay = delay_for(rate, fraction);
            assert!(delay < previous, "rate {rate}, fraction {fraction}");
            previous = delay;
        }
        assert!(previous.as_secs_f64() < 1e-5);
    }
}

fn calculator_events(date: NaiveDate, location: GeoCoordinate) -> SunEvents {
    SolarCalculator::new().sun_events(date, location).unwrap()
}

#[test]
fn relative_time_resets_at_sunrise_and_sunset() {
    let calculator = SolarCalculator::new();
    let location = GeoCoordinate::default();
    let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let events = calculator.sun_events(date, location).unwrap();
    let engine = ConversionEngine::new(calculator);

    let at_sunrise = engine.convert(&events.sunrise, "relative", None).unwrap();
    assert_eq!(at_sunrise.phase, Some(SunPhase::Day));
    assert_eq!(
        (at_sunrise.time.hour, at_sunrise.time.minute, at_sunrise.time.second),
        (0, 0, 0)
    );

    let at_sunset = engine.convert(&events.sunset, "relative", None).unwrap();
    assert_eq!(at_sunset.phase, Some(SunPhase::Night));
    assert_eq!(
        (at_sunset.time.hour, at_sunset.time.minute, at_sunset.time.second),
        (0, 0, 0)
    );

    let day_length = (events.sunset - events.sunrise).num_milliseconds() as f64 / 1000.0;
    let noon = events.sunrise + TimeDelta::hours(3);
    let day = DaylightInterval::locate(&noon, &[events]).unwrap();
    assert!((day.length - day_length).abs() < 1e-3);

    let tomorrow = calculator_events(date.succ_opt().unwrap(), location);
    let night = DaylightInterval::locate(&(events.sunset + TimeDelta::hours(1)), &[events, tomorrow])
        .unwrap();
    let night_length = (tomorrow.sunrise - events.sunset).num_milliseconds() as f64 / 1000.0;
    assert!((night.length - night_length).abs() < 1e-3);
    // Near the equinox the day barely changes from one date to the next.
    assert!((night.length - (EARTH_DAY_SECONDS - day_length)).abs() < 300.0);
}

#[test]
fn leet_and_hex_reference_points() {
    let engine = ConversionEngine::default();

    let leet = engine
        .convert(&Utc.with_ymd_and_hms(2024, 1, 1, 13, 37, 0).unwrap(), "leet", None)
        .unwrap();
    assert_eq!((leet.time.hour, leet.time.minute, leet.time.second), (0, 0, 0));
    assert_eq!(leet.time.fraction, 0.0);

    let midnight = engine
        .convert(&Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), "hex", None)
        .unwrap();
    assert_eq!((midnight.time.hour, midnight.time.minute, midnight.time.second), (0, 0, 0));

    let noon = engine
        .convert(&Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(), "hex", None)
        .unwrap();
    assert_eq!(noon.time.total_seconds(lookup("hex").unwrap()), 2048.0);
    assert_eq!((noon.time.hour, noon.time.minute, noon.time.second), (8, 0, 0));
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use leetclock::{ClockRuntime, ClockSettings, ConversionEngine, EngineError, Frame, TickListener};
use leetclock_engine::OffsetClock;
use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Default)]
struct CollectingListener {
    frames: Mutex<Vec<Frame>>,
    errors: Mutex<Vec<EngineError>>,
    arrived: Notify,
}

impl CollectingListener {
    async fn wait_for(&self, count: usize) -> Vec<Frame> {
        loop {
            {
                let frames = self.frames.lock();
                if frames.len() >= count {
                    return frames.clone();
                }
            }
            self.arrived.notified().await;
        }
    }
}

#[async_trait]
impl TickListener for CollectingListener {
    async fn on_frame(&self, frame: &Frame) -> Result<(), String> {
        self.frames.lock().push(frame.clone());
        self.arrived.notify_one();
        Ok(())
    }

    async fn on_error(&self, error: &EngineError) {
        self.errors.lock().push(error.clone());
    }
}

fn start_at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 21, h, m, s)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn control_changes_are_rendered_without_waiting_for_the_tick() {
    let mut runtime = ClockRuntime::new(
        ConversionEngine::default(),
        OffsetClock::starting_at(start_at(9, 0, 0)),
        ClockSettings::new("hex"),
    )
    .unwrap();
    let listener = Arc::new(CollectingListener::default());
    runtime.start(listener.clone());
    let handle = runtime.handle();

    let first = listener.wait_for(1).await;
    assert_eq!(first[0].readout, "Hex time: 06:00");

    handle.set_show_seconds(true).unwrap();
    let frames = listener.wait_for(2).await;
    assert_eq!(frames[1].readout, "Hex time: 06:00:00");
    assert_eq!(frames[1].at, frames[0].at);

    handle.set_system("real").unwrap();
    let frames = listener.wait_for(3).await;
    assert_eq!(frames[2].readout, "Real time 12h: 09:00:00");

    runtime.shutdown().await;
    assert!(listener.errors.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn real_time_ticks_once_per_second() {
    let mut runtime = ClockRuntime::new(
        ConversionEngine::default(),
        OffsetClock::starting_at(start_at(23, 59, 58)),
        ClockSettings::new("real24").with_show_seconds(true),
    )
    .unwrap();
    let listener = Arc::new(CollectingListener::default());
    runtime.start(listener.clone());

    let frames = listener.wait_for(4).await;
    let readouts: Vec<_> = frames.iter().map(|frame| frame.readout.as_str()).collect();
    assert_eq!(
        readouts,
        [
            "Real time 24h: 23:59:58",
            "Real time 24h: 23:59:59",
            "Real time 24h: 00:00:00",
            "Real time 24h: 00:00:01",
        ]
    );
    for frame in &frames {
        assert!(frame.next_delay <= Duration::from_secs(1));
    }

    runtime.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn relative_time_keeps_ticking_under_the_midnight_sun() {
    let svalbard = leetclock::GeoCoordinate::new(78.2232, 15.6267).unwrap();
    let mut runtime = ClockRuntime::new(
        ConversionEngine::default(),
        OffsetClock::starting_at(start_at(12, 0, 0)),
        ClockSettings::new("relative").with_location(Some(svalbard)),
    )
    .unwrap();
    let listener = Arc::new(CollectingListener::default());
    runtime.start(listener.clone());

    let frames = listener.wait_for(2).await;
    assert_eq!(frames[0].reading.phase, Some(leetclock_engine::SunPhase::Day));
    assert_eq!(frames[0].reading.time.hour, 6);
    assert!(listener.errors.lock().is_empty());

    runtime.shutdown().await;
}

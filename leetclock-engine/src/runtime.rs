use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use leetclock_core::{ClockSettings, GeoCoordinate};
use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::convert::ConversionEngine;
use crate::error::EngineError;
use crate::frame::{compose_frame, Frame};
use crate::moment::LeetMomentDetector;
use crate::registry::{self, TimeSystemSpec};
use crate::relative::PolarPolicy;
use crate::solar::{SolarCalculator, SunEventProvider};

/// Wait before retrying after a failed conversion.
const ERROR_RETRY: Duration = Duration::from_secs(1);

#[async_trait]
pub trait TickListener: Send + Sync + 'static {
    async fn on_frame(&self, frame: &Frame) -> Result<(), String>;

    async fn on_error(&self, _error: &EngineError) {}
}

/// Handle used by the control layer to change what the clock shows.
///
/// Every change wakes the tick loop, which renders right away instead of
/// finishing its current wait.
#[derive(Clone)]
pub struct ClockHandle {
    settings: Arc<RwLock<ClockSettings>>,
    notify: Arc<Notify>,
    shutting_down: Arc<AtomicBool>,
}

impl ClockHandle {
    pub fn settings(&self) -> ClockSettings {
        self.settings.read().clone()
    }

    pub fn set_system(&self, id: &str) -> Result<&'static TimeSystemSpec, EngineError> {
        self.ensure_running()?;
        let spec = registry::lookup(id)?;
        self.update(|settings| settings.system = spec.id.to_string());
        info!(system = spec.id, "time system switched");
        Ok(spec)
    }

    /// Moves to the next registered system, wrapping around.
    pub fn cycle_system(&self) -> Result<&'static TimeSystemSpec, EngineError> {
        let current = self.settings.read().system.clone();
        let next = registry::next(&current)?;
        self.set_system(next.id)
    }

    pub fn set_show_seconds(&self, show_seconds: bool) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.update(|settings| settings.show_seconds = show_seconds);
        Ok(())
    }

    pub fn set_location(&self, location: Option<GeoCoordinate>) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.update(|settings| settings.location = location);
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(EngineError::ShuttingDown);
        }
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut ClockSettings)) {
        change(&mut self.settings.write());
        self.notify.notify_one();
    }
}

/// Drives the clock: convert, hand the frame to the listener, sleep until the
/// displayed second changes.
pub struct ClockRuntime<P = SolarCalculator, C = SystemClock> {
    engine: ConversionEngine<P>,
    clock: Arc<C>,
    policy: PolarPolicy,
    settings: Arc<RwLock<ClockSettings>>,
    notify: Arc<Notify>,
    shutting_down: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl<P: SunEventProvider, C: Clock> ClockRuntime<P, C> {
    pub fn new(
        engine: ConversionEngine<P>,
        clock: C,
        mut settings: ClockSettings,
    ) -> Result<Self, EngineError> {
        settings.system = registry::lookup(&settings.system)?.id.to_string();
        Ok(Self {
            engine,
            clock: Arc::new(clock),
            policy: PolarPolicy::default(),
            settings: Arc::new(RwLock::new(settings)),
            notify: Arc::new(Notify::new()),
            shutting_down: Arc::new(AtomicBool::new(false)),
            ticker: None,
        })
    }

    pub fn with_polar_policy(mut self, policy: PolarPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn handle(&self) -> ClockHandle {
        ClockHandle {
            settings: self.settings.clone(),
            notify: self.notify.clone(),
            shutting_down: self.shutting_down.clone(),
        }
    }

    pub fn start<L>(&mut self, listener: Arc<L>)
    where
        L: TickListener,
    {
        if self.ticker.is_some() {
            warn!("clock runtime already started");
            return;
        }

        let ticker = Ticker {
            engine: self.engine.clone(),
            clock: self.clock.clone(),
            policy: self.policy,
            settings: self.settings.clone(),
            notify: self.notify.clone(),
            shutting_down: self.shutting_down.clone(),
        };

        self.ticker = Some(tokio::spawn(async move {
            ticker.run(listener).await;
        }));
    }

    pub async fn shutdown(self) {
        self.shutting_down.store(true, Ordering::Release);
        self.notify.notify_one();
        if let Some(handle) = self.ticker {
            if let Err(err) = handle.await {
                error!("clock runtime crashed: {:?}", err);
            }
        }
    }
}

struct Ticker<P, C> {
    engine: ConversionEngine<P>,
    clock: Arc<C>,
    policy: PolarPolicy,
    settings: Arc<RwLock<ClockSettings>>,
    notify: Arc<Notify>,
    shutting_down: Arc<AtomicBool>,
}

impl<P: SunEventProvider, C: Clock> Ticker<P, C> {
    async fn run<L: TickListener>(self, listener: Arc<L>) {
        let mut detector = LeetMomentDetector::new();
        info!(policy = ?self.policy, "clock runtime started");

        loop {
            if self.shutting_down.load(Ordering::Acquire) {
                break;
            }

            let settings = self.settings.read().clone();
            let now = self.clock.now();

            let delay = match compose_frame(&self.engine, &settings, self.policy, &now, &mut detector)
            {
                Ok(frame) => {
                    debug!(
                        system = frame.reading.system,
                        readout = %frame.readout,
                        delay_ms = frame.next_delay.as_millis() as u64,
                        "tick"
                    );
                    if frame.leet_moment {
                        info!(at = %frame.at, "13:37");
                    }
                    if let Err(err) = listener.on_frame(&frame).await {
                        error!(system = frame.reading.system, error = %err, "tick listener failed");
                    }
                    frame.next_delay
                }
                Err(err) => {
                    warn!(system = %settings.system, error = %err, "conversion failed, retrying");
                    listener.on_error(&err).await;
                    ERROR_RETRY
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.notify.notified() => {
                    debug!("woken before the tick elapsed");
                }
            }
        }

        info!("clock runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Timelike};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

    use super::*;
    use crate::clock::OffsetClock;
    use crate::solar::{SunEvents, SunUnavailable};

    struct Recorder {
        frames: UnboundedSender<Frame>,
        errors: UnboundedSender<EngineError>,
    }

    #[async_trait]
    impl TickListener for Recorder {
        async fn on_frame(&self, frame: &Frame) -> Result<(), String> {
            self.frames.send(frame.clone()).map_err(|err| err.to_string())
        }

        async fn on_error(&self, error: &EngineError) {
            let _ = self.errors.send(error.clone());
        }
    }

    fn recorder() -> (
        Arc<Recorder>,
        UnboundedReceiver<Frame>,
        UnboundedReceiver<EngineError>,
    ) {
        let (frames, frame_rx) = unbounded_channel();
        let (errors, error_rx) = unbounded_channel();
        (Arc::new(Recorder { frames, errors }), frame_rx, error_rx)
    }

    fn local(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 20, h, m, s)
            .unwrap()
    }

    fn runtime_at(start: DateTime<FixedOffset>, system: &str) -> ClockRuntime<SolarCalculator, OffsetClock> {
        ClockRuntime::new(
            ConversionEngine::default(),
            OffsetClock::starting_at(start),
            ClockSettings::new(system).with_show_seconds(true),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn switching_systems_renders_immediately() {
        let mut runtime = runtime_at(local(12, 0, 0), "hex");
        let (listener, mut frames, _errors) = recorder();
        runtime.start(listener);
        let handle = runtime.handle();

        let first = frames.recv().await.unwrap();
        assert_eq!(first.reading.system, "hex");
        assert!(first.next_delay > Duration::from_secs(20));

        handle.set_system("LEET").unwrap();
        let switched = frames.recv().await.unwrap();
        assert_eq!(switched.reading.system, "leet");
        assert!(switched.at - first.at < chrono::TimeDelta::seconds(1));
        assert_eq!(handle.settings().system, "leet");

        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn hex_frames_are_a_hex_second_apart() {
        let mut runtime = runtime_at(local(12, 0, 0), "hex");
        let (listener, mut frames, _errors) = recorder();
        runtime.start(listener);

        let first = frames.recv().await.unwrap();
        let second = frames.recv().await.unwrap();
        let gap = (second.at - first.at).num_milliseconds();
        assert!((21_093..=21_095).contains(&gap), "gap was {gap} ms");
        assert_eq!(second.reading.time.second, 1);

        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn leet_moment_fires_exactly_once() {
        let mut runtime = runtime_at(local(13, 36, 50), "leet");
        let (listener, mut frames, _errors) = recorder();
        runtime.start(listener);

        let mut fired = Vec::new();
        loop {
            let frame = frames.recv().await.unwrap();
            if frame.leet_moment {
                fired.push(frame.at);
            }
            if frame.at >= local(13, 37, 30) {
                break;
            }
        }

        assert_eq!(fired.len(), 1);
        assert_eq!((fired[0].hour(), fired[0].minute(), fired[0].second()), (13, 37, 0));

        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cycling_walks_the_registry() {
        let mut runtime = runtime_at(local(8, 0, 0), "martian");
        let (listener, mut frames, _errors) = recorder();
        runtime.start(listener);
        let handle = runtime.handle();
        frames.recv().await.unwrap();

        assert_eq!(handle.cycle_system().unwrap().id, "hex");
        assert_eq!(frames.recv().await.unwrap().reading.system, "hex");
        assert_eq!(handle.cycle_system().unwrap().id, "leet");

        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn handle_rejects_unknown_systems_and_use_after_shutdown() {
        let mut runtime = runtime_at(local(8, 0, 0), "real");
        let (listener, _frames, _errors) = recorder();
        runtime.start(listener);
        let handle = runtime.handle();

        let err = handle.set_system("stardate").unwrap_err();
        assert!(matches!(err, EngineError::UnknownSystem(_)));
        assert_eq!(handle.settings().system, "real");

        runtime.shutdown().await;
        assert!(matches!(
            handle.set_show_seconds(false),
            Err(EngineError::ShuttingDown)
        ));
    }

    #[test]
    fn runtime_refuses_an_unknown_initial_system() {
        let result = ClockRuntime::new(
            ConversionEngine::default(),
            SystemClock,
            ClockSettings::new("stardate"),
        );
        assert!(matches!(result, Err(EngineError::UnknownSystem(_))));
    }

    struct PolarSummer;

    impl SunEventProvider for PolarSummer {
        fn sun_events(
            &self,
            _date: NaiveDate,
            _location: GeoCoordinate,
        ) -> Result<SunEvents, SunUnavailable> {
            Err(SunUnavailable::MidnightSun)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polar_dates_fall_back_or_report_errors() {
        let settings = ClockSettings::new("relative");

        let mut fallback = ClockRuntime::new(
            ConversionEngine::new(PolarSummer),
            OffsetClock::starting_at(local(6, 0, 0)),
            settings.clone(),
        )
        .unwrap();
        let (listener, mut frames, _errors) = recorder();
        fallback.start(listener);
        let frame = frames.recv().await.unwrap();
        assert_eq!(frame.reading.time.hour, 3);
        fallback.shutdown().await;

        let mut strict = ClockRuntime::new(
            ConversionEngine::new(PolarSummer),
            OffsetClock::starting_at(local(6, 0, 0)),
            settings,
        )
        .unwrap()
        .with_polar_policy(PolarPolicy::Propagate);
        let (listener, _frames, mut errors) = recorder();
        strict.start(listener);
        let first = errors.recv().await.unwrap();
        assert!(matches!(
            first,
            EngineError::AstronomicalDataUnavailable {
                reason: SunUnavailable::MidnightSun,
                ..
            }
        ));
        // The loop keeps retrying.
        errors.recv().await.unwrap();
        strict.shutdown().await;
    }
}

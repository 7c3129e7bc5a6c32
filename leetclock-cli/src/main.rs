use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use leetclock_core::config::load_core_config;
use leetclock_core::logging::{init_tracing, LogFormat};
use leetclock_core::serde_utils::to_pretty_json;
use leetclock_core::{ClockSettings, CoreConfig, GeoCoordinate, LeetClockError};
use leetclock_engine::registry;
use leetclock_engine::{
    compose_frame, layout, Clock, ClockRuntime, ConversionEngine, EngineError,
    LeetMomentDetector, OffsetClock, PolarPolicy, SolarCalculator, SunEventProvider,
    SystemClock,
};
use tracing::{debug, info, warn};

mod render;

use render::{print_dial, print_frame, print_sun, print_systems, ConsoleListener, SunReport};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] LeetClockError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("invalid --at timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },
    #[error("could not listen for ctrl-c: {0}")]
    Signal(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(name = "leetclock")]
#[command(about = "Leet, hex, binary, Martian and sun-relative time in your terminal", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Diagnostic layout: full or compact (compact by default for watch)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_format(&self, config: &CoreConfig) -> LogFormat {
        self.log_format
            .or(config.log_format)
            .unwrap_or(match self.command {
                Commands::Watch(_) => LogFormat::Compact,
                _ => LogFormat::Full,
            })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current time in one system
    Now(NowArgs),
    /// Keep printing the time until interrupted
    Watch(WatchArgs),
    /// List the available time systems
    Systems,
    /// Print the dial numerals of a system
    Dial {
        /// System id, e.g. "hex"
        id: String,
    },
    /// Print sunrise and sunset for a date
    Sun(SunArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct LocationArgs {
    /// Latitude for sun-relative time, in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude for sun-relative time, in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn resolve(&self) -> Result<Option<GeoCoordinate>, CliError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(GeoCoordinate::new(lat, lon)?)),
            _ => Ok(None),
        }
    }
}

#[derive(Args)]
struct ClockArgs {
    #[arg(long)]
    system: Option<String>,
    /// Show custom seconds in the readout
    #[arg(long)]
    seconds: bool,
    #[command(flatten)]
    location: LocationArgs,
    /// Fail instead of using a whole-day interval when the sun never rises or sets
    #[arg(long)]
    strict_polar: bool,
    /// Pretend the clock starts at this RFC 3339 instant
    #[arg(long)]
    at: Option<String>,
}

impl ClockArgs {
    fn settings(&self, config: &CoreConfig) -> Result<ClockSettings, CliError> {
        let mut settings = config.settings.clone();
        if let Some(system) = &self.system {
            settings.system = system.clone();
        }
        settings.system = registry::lookup(&settings.system)?.id.to_string();
        if self.seconds {
            settings.show_seconds = true;
        }
        if let Some(location) = self.location.resolve()? {
            settings.location = Some(location);
        }
        Ok(settings)
    }

    fn policy(&self) -> PolarPolicy {
        if self.strict_polar {
            PolarPolicy::Propagate
        } else {
            PolarPolicy::WholeDay
        }
    }

    fn start_instant(&self) -> Result<Option<DateTime<FixedOffset>>, CliError> {
        self.at
            .as_deref()
            .map(|value| {
                DateTime::parse_from_rfc3339(value).map_err(|err| CliError::InvalidTimestamp {
                    value: value.to_string(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }
}

#[derive(Args)]
struct NowArgs {
    #[command(flatten)]
    clock: ClockArgs,
    /// Print the frame as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    clock: ClockArgs,
    /// Switch to the next system every SECS seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    cycle: Option<u64>,
}

#[derive(Args)]
struct SunArgs {
    /// Date as YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    #[command(flatten)]
    location: LocationArgs,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = load_core_config()?;
    init_tracing(
        cli.log_level.as_deref().unwrap_or(&config.log_level),
        cli.log_format(&config),
    )?;
    if let Some(path) = &config.config_path {
        debug!(path = %path.display(), "using config file");
    }

    match cli.command {
        Commands::Now(args) => {
            let settings = args.clock.settings(&config)?;
            let now = args
                .clock
                .start_instant()?
                .unwrap_or_else(|| SystemClock.now());
            let engine = ConversionEngine::default();
            let frame = compose_frame(
                &engine,
                &settings,
                args.clock.policy(),
                &now,
                &mut LeetMomentDetector::new(),
            )?;

            if args.json {
                println!("{}", to_pretty_json(&frame)?);
            } else {
                print_frame(&frame);
            }
        }
        Commands::Watch(args) => {
            let settings = args.clock.settings(&config)?;
            let policy = args.clock.policy();
            let cycle = args.cycle.map(Duration::from_secs);
            match args.clock.start_instant()? {
                Some(start) => watch(OffsetClock::starting_at(start), settings, policy, cycle).await?,
                None => watch(SystemClock, settings, policy, cycle).await?,
            }
        }
        Commands::Systems => {
            print_systems(registry::all(), &config.settings.system);
        }
        Commands::Dial { id } => {
            let spec = registry::lookup(&id)?;
            print_dial(spec, &layout(spec));
        }
        Commands::Sun(args) => {
            let location = args
                .location
                .resolve()?
                .unwrap_or_else(|| config.settings.effective_location());
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let calculator = SolarCalculator::new();
            let report = SunReport::new(
                date,
                location,
                calculator.sun_events(date, location),
                calculator.solar_noon(date, location),
            );

            if args.json {
                println!("{}", to_pretty_json(&report)?);
            } else {
                print_sun(&report);
            }
        }
        Commands::Version => {
            println!("leetclock v{}", env!("CARGO_PKG_VERSION"));
            let ids: Vec<_> = registry::all().iter().map(|spec| spec.id).collect();
            println!("Time systems: {}", ids.join(", "));
        }
    }

    Ok(())
}

async fn watch<C: Clock>(
    clock: C,
    settings: ClockSettings,
    policy: PolarPolicy,
    cycle: Option<Duration>,
) -> Result<(), CliError> {
    let mut runtime =
        ClockRuntime::new(ConversionEngine::default(), clock, settings)?.with_polar_policy(policy);
    runtime.start(Arc::new(ConsoleListener));
    let handle = runtime.handle();

    let signal = match cycle {
        Some(period) => {
            let mut switcher = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    signal = tokio::signal::ctrl_c() => break signal,
                    _ = switcher.tick() => {
                        if let Err(err) = handle.cycle_system() {
                            warn!(error = %err, "could not switch system");
                        }
                    }
                }
            }
        }
        None => tokio::signal::ctrl_c().await,
    };

    info!("stopping clock");
    runtime.shutdown().await;
    signal.map_err(CliError::from)
}

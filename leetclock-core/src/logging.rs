use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::errors::{LeetClockError, Result};

/// Layout of diagnostic lines on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Timestamp, level, target and fields.
    #[default]
    Full,
    /// Level and fields only, so warnings stay short next to a live clock.
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{other}' (expected full or compact)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Full => f.write_str("full"),
            LogFormat::Compact => f.write_str("compact"),
        }
    }
}

/// `RUST_LOG` when set, otherwise `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber for the leetclock binaries.
///
/// Diagnostics always go to stderr so stdout carries only clock output.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let builder = SubscriberBuilder::default()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let installed = match format {
        LogFormat::Full => builder.with_target(true).try_init(),
        LogFormat::Compact => builder
            .compact()
            .with_target(false)
            .without_time()
            .try_init(),
    };

    installed.map_err(|err| LeetClockError::GeneralError(err.to_string()))
}

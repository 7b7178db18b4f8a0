//! Structured logging initialisation.
//!
//! Two output formats are supported:
//! - [`LogFormat::Human`] — human-readable lines (development).
//! - [`LogFormat::Json`] — newline-delimited JSON (log aggregation).
//!
//! The filter level can be overridden at runtime via the `RUST_LOG`
//! environment variable.  When `RUST_LOG` is not set, the caller-supplied
//! `level` string is used (e.g. `"info"`, `"debug,tally_consensus=trace"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt as layer_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => f.write_str("human"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format {0:?} (expected \"human\" or \"json\")")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns an error if a global subscriber is already set; logging is then
/// left as it was.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(layer_fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                layer_fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
    }
}

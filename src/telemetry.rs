//! Structured logging for applications driving MuSig sessions.
//!
//! The library itself only emits `tracing` spans and events. This module wires them
//! into a bunyan JSON subscriber, and bridges `log` records from dependencies.

use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::log::SetLoggerError;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to set logger: {0}")]
    Logger(#[from] SetLoggerError),
    #[error("Failed to set subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Telemetry settings. `RUST_LOG` overrides the level derived from `verbosity`.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub name: String,
    pub verbosity: u8,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            name: "schnorr_musig".to_string(),
            verbosity: 0,
        }
    }
}

impl TelemetryConfig {
    /// `0` is warn, `1` is info, anything higher is debug.
    pub fn default_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Composes a subscriber: env filter, JSON storage and bunyan formatting into `sink`.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `subscriber` globally and redirects `log` records into it.
///
/// Fails if a global subscriber or logger is already set.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Builds a stdout subscriber from `config` and installs it.
pub fn init_from_config(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let subscriber = get_subscriber(
        config.name.clone(),
        config.default_filter().to_string(),
        std::io::stdout,
    );
    init_subscriber(subscriber)
}

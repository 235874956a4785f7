//! Logging setup built on `tracing-subscriber`.
//!
//! The subscriber is returned as a [`Dispatch`] so that callers can hand it to
//! the components that emit events instead of relying on ambient global state.

use std::{
    fs::{File, OpenOptions},
    io,
    path::PathBuf,
    sync::Mutex,
};

use thiserror::Error;
use tracing::{Dispatch, dispatcher::SetGlobalDefaultError};
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt, layer::SubscriberExt};

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Filter directive, e.g. `info` or `hubcast_server=debug,tower_http=info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Write human readable lines to stdout.
    pub enable_console: bool,
    /// Append JSON lines to `file`.
    pub enable_file: bool,
    pub file: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_console: true,
            enable_file: false,
            file: PathBuf::from("hubcast.log"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install global logger: {0}")]
    Install(#[from] SetGlobalDefaultError),
}

/// Build the subscriber described by `config` and install it as the global
/// default.
///
/// The returned dispatch is the same one that was installed; pass it to the
/// hub so its tasks log through it explicitly.
pub fn setup_logger(config: &LoggerConfig) -> Result<Dispatch, LoggerError> {
    let dispatch = build_dispatch(config)?;
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(dispatch)
}

/// Build the subscriber described by `config` without installing it.
///
/// With both sinks disabled this returns a no-op dispatch.
pub fn build_dispatch(config: &LoggerConfig) -> Result<Dispatch, LoggerError> {
    if !config.enable_console && !config.enable_file {
        return Ok(Dispatch::none());
    }

    let filter = build_filter(&config.level)?;

    let console_layer = config
        .enable_console
        .then(|| fmt::layer().with_target(true).with_writer(io::stdout));

    let file_layer = if config.enable_file {
        let file = open_log_file(config)?;
        Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);

    Ok(Dispatch::new(subscriber))
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| LoggerError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}

fn open_log_file(config: &LoggerConfig) -> Result<File, LoggerError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| LoggerError::OpenLogFile {
            path: config.file.clone(),
            source,
        })
}

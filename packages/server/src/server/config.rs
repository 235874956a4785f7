//! Server configuration from command-line flags and environment variables.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;
use hubcast_shared::logger::LoggerConfig;

use crate::hub::{DEFAULT_INTAKE_CAPACITY, DEFAULT_OUTBOUND_CAPACITY, HubConfig};

/// Fan-out message hub over WebSocket.
///
/// Every flag can also be set through the environment variable shown in
/// `--help`, or in a `.env` file in the working directory.
#[derive(Debug, Clone, Parser)]
#[command(name = "hubcast-server", version, about)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Capacity of the hub's register, unregister and submit channels
    #[arg(
        long,
        env = "HUB_INTAKE_CAPACITY",
        default_value_t = DEFAULT_INTAKE_CAPACITY,
        value_parser = parse_capacity,
    )]
    pub intake_capacity: usize,

    /// Undelivered messages a client may have queued before it is evicted
    #[arg(
        long,
        env = "HUB_OUTBOUND_CAPACITY",
        default_value_t = DEFAULT_OUTBOUND_CAPACITY,
        value_parser = parse_capacity,
    )]
    pub outbound_capacity: usize,

    /// Log filter directive (overridden by RUST_LOG)
    ///
    /// Numeric levels are also accepted: 0 off, 1-4 error, 5 warn, 6 info,
    /// 7 debug. Any other number means error.
    #[arg(
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        value_parser = parse_log_level,
    )]
    pub log_level: String,

    /// Log human readable lines to stdout
    #[arg(
        long,
        env = "ENABLE_CONSOLE_LOG",
        default_value_t = true,
        action = clap::ArgAction::Set,
    )]
    pub enable_console_log: bool,

    /// Append JSON log lines to --log-file
    #[arg(
        long,
        env = "ENABLE_FILE_LOG",
        default_value_t = false,
        action = clap::ArgAction::Set,
    )]
    pub enable_file_log: bool,

    /// Log file path
    #[arg(long, env = "LOG_FILE", default_value = "hubcast.log")]
    pub log_file: PathBuf,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            intake_capacity: self.intake_capacity,
            outbound_capacity: self.outbound_capacity,
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.log_level.clone(),
            enable_console: self.enable_console_log,
            enable_file: self.enable_file_log,
            file: self.log_file.clone(),
        }
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    let capacity: usize = value
        .parse()
        .map_err(|e| format!("'{value}' is not a valid capacity: {e}"))?;
    if capacity == 0 {
        return Err("capacity must be at least 1".to_string());
    }
    Ok(capacity)
}

/// Pass filter directives through; map numeric levels onto tracing levels.
fn parse_log_level(value: &str) -> Result<String, String> {
    let Ok(level) = value.trim().parse::<u8>() else {
        return Ok(value.to_string());
    };
    let directive = match level {
        0 => "off",
        5 => "warn",
        6 => "info",
        7 => "debug",
        _ => "error",
    };
    Ok(directive.to_string())
}

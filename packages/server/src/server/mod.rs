//! Server bootstrap: configuration, listener and graceful shutdown.

mod config;
mod error;
mod runner;
mod signal;

pub use config::ServerConfig;
pub use error::ServerError;
pub use runner::{run, serve};

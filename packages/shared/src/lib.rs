//! Shared utilities for Hubcast.
//!
//! Logging setup and the clock used to stamp broadcast messages.

pub mod logger;
pub mod time;

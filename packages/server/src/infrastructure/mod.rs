//! Infrastructure layer: wire formats and the WebSocket transport.

pub mod connection;
pub mod dto;

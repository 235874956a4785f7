//! Connection handle implementations.

mod close_signal;
mod websocket;

pub use close_signal::CloseSignal;
pub use websocket::WsConnection;

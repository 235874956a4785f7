//! Real-time fan-out message hub over WebSocket.
//!
//! Clients connect on `/ws` and send JSON `{sender, content}` messages; the
//! hub stamps each one and broadcasts it to every connected client. Slow
//! consumers are evicted rather than allowed to stall the broadcast.

pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod server;
pub mod ui;

// Re-export entry points
pub use hub::{Hub, HubConfig};
pub use server::{ServerConfig, ServerError, run as run_server};

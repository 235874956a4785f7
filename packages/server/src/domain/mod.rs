//! Domain layer for the message hub.
//!
//! Holds the values that flow through the hub and the connection contract the
//! hub drives. Nothing here depends on the transport or on the web framework.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod value_object;

pub use connection::Connection;
pub use entity::{Message, Submission};
pub use error::ConnectionError;
pub use factory::ClientIdFactory;
pub use value_object::ClientId;

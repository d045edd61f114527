//! Client module - a table mirror and the connection that feeds it
//!
//! - [`mirror`]: pure fold of server lines into roster, snapshot, and turn
//! - [`connection`]: tokio TCP client that joins, sends intents, and updates the mirror

pub mod connection;
pub mod mirror;

pub use skyjo_adapter as adapter;
pub use skyjo_engine as engine;
pub use skyjo_types as types;

pub use connection::Connection;
pub use mirror::{ClientIntent, Mirror, MirrorError, MirrorEvent};

//! The `connection` module defines the handle the relay keeps for each
//! attached WebSocket client.
//!
//! It provides the `Connection` struct: a unique identifier plus the channel
//! that feeds the client's writer task.

pub mod handle;
pub use handle::{Connection, ConnectionId};

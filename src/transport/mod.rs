//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It implements the listener and the per-connection ingest loop: extract
//! the article id from the upgrade request, register the connection, read
//! client updates, and republish them to the bus.

pub mod handshake;
pub mod websocket;

#[cfg(test)]
mod tests;

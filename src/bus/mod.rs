//! The `bus` module wraps the Redis pub/sub transport that connects relay
//! processes.
//!
//! Every process publishes client updates to one shared channel and runs a
//! single subscription against it; topic filtering happens at fan-out, not
//! at the bus layer.

pub mod client;

pub use client::{Bus, UPDATES_CHANNEL};

//! # newsrelay
//!
//! `newsrelay` is a real-time fan-out relay for article updates. Clients
//! subscribe to one article over a WebSocket connection; any client may
//! publish an update, and every subscriber of that article receives it,
//! across all relay processes. Processes share state through a Redis
//! pub/sub channel instead of a shared address space.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `relay`: The registry mapping articles to subscribed connections, plus the fan-out loop.
//! - `connection`: The handle kept for each attached WebSocket client.
//! - `transport`: The WebSocket listener and the per-connection ingest loop.
//! - `bus`: The Redis pub/sub transport connecting relay processes.
//! - `config`: Handles loading and managing server configuration.
//! - `utils`: Shared utilities, such as error handling and logging setup.

pub mod bus;
pub mod config;
pub mod connection;
pub mod relay;
pub mod transport;
pub mod utils;

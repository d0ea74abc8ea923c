//! The `utils` module collects shared pieces used across `newsrelay`:
//! the crate-wide error type and the tracing setup.

pub mod error;
pub mod logging;

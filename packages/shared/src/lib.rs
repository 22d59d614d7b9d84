//! Shared utilities for the fukubiki raffle application.
//!
//! Logging setup and clock/timestamp helpers used by both the relay server
//! and the CLI client binaries.

pub mod logger;
pub mod time;

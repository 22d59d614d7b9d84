//! Data Transfer Objects (DTOs) for the raffle relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: the relay event catalog (tagged JSON messages)
//! - `http`: HTTP API response DTOs
//!
//! `conversion` maps between DTOs and domain entities.

pub mod conversion;
pub mod http;
pub mod websocket;

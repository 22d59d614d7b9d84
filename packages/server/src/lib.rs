//! Relay server library for the fukubiki live raffle tool.
//!
//! One admin client builds a participant roster and triggers draws; any
//! number of passive viewers mirror the admin's state through this relay.
//! State is partitioned by room and lives only in process memory.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

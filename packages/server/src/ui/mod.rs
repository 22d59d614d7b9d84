//! WebSocket raffle relay server implementation.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase 層を束ねるためハンドラから参照する

pub use server::Server;

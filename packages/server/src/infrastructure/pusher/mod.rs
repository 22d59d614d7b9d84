//! EventPusher 実装
//!
//! - `websocket`: WebSocket の `UnboundedSender` を使った実装

pub mod websocket;

pub use websocket::WebSocketEventPusher;

//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` の管理
//! - 接続へのイベント送信（push_to, broadcast）
//!
//! WebSocket 自体の受付は UI 層（`ui/handler/websocket.rs`）が行い、
//! ここでは生成済みの sender を預かって送信にのみ使う。チャンネルは
//! 接続ごとに FIFO なので、1 接続に対する配信順序は入力順に保たれる。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, PushError, PusherChannel};

/// WebSocket-backed event pusher.
pub struct WebSocketEventPusher {
    /// Key: connection id, Value: outbound channel of that connection
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.clone(), sender);
        tracing::debug!("Connection '{}' registered to EventPusher", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from EventPusher", connection_id);
    }

    async fn push_to(&self, connection_id: &ConnectionId, event: &str) -> Result<(), PushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(event.to_string())
                .map_err(|e| PushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(PushError::ConnectionNotFound(connection_id.to_string()))
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &str) -> Result<(), PushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // 一部の送信失敗はファンアウト全体を止めない
                if let Err(e) = sender.send(event.to_string()) {
                    tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

//! EventPusher trait 定義
//!
//! 接続へのイベント送信（push / fan-out）の抽象化。WebSocket などの
//! トランスポート実装は Infrastructure 層が提供する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::PushError, value_object::ConnectionId};

/// Channel used to push serialized events to one connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Pushes serialized events to registered connections.
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register a connection's outbound channel.
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop a connection's outbound channel.
    async fn unregister(&self, connection_id: &ConnectionId);

    /// Push one serialized event to a single connection (unicast reply).
    async fn push_to(&self, connection_id: &ConnectionId, event: &str) -> Result<(), PushError>;

    /// Fan one serialized event out to the given targets. Individual
    /// send failures are tolerated; the event is delivered best-effort.
    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &str) -> Result<(), PushError>;
}

//! ConnectionRegistry trait 定義
//!
//! トランスポート接続とルームの対応関係を管理するインターフェース。
//! 1 接続は高々 1 ルームに属する（セッションごとに join は 1 回）。

use async_trait::async_trait;

use super::value_object::{ConnectionId, RoomId};

/// Tracks which transport connection belongs to which room and computes
/// viewer counts. Cleans up membership on disconnect.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add the connection to the room's viewer set.
    ///
    /// Returns the new self-inclusive viewer count of the room.
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> usize;

    /// Remove the connection from whichever room it belongs to.
    ///
    /// Returns the affected room and its remaining viewer count, or `None`
    /// when the connection had not joined any room.
    async fn leave(&self, connection_id: &ConnectionId) -> Option<(RoomId, usize)>;

    /// All connections currently in the room (including any sender).
    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Self-inclusive viewer count of the room; zero for unknown rooms.
    async fn count(&self, room_id: &RoomId) -> usize;

    /// The room a connection has joined, if any.
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// Total number of connections across all rooms.
    async fn total_connections(&self) -> usize;
}

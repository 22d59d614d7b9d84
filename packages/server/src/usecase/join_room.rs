//! UseCase: ルーム参加処理
//!
//! 接続をルームの視聴者集合へ追加し、ルームを遅延生成する。視聴者数は
//! 参加した本人を含めてルーム全体へブロードキャストする（各クライアント
//! が自分込みの正確な人数を表示できるようにするため）。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, EventPusher, PusherChannel, RoomId, RoomStore,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
        }
    }

    /// ルーム参加を実行する。
    ///
    /// # Returns
    ///
    /// 参加後の（本人を含む）視聴者数
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        sender: PusherChannel,
    ) -> usize {
        // 1. ルームを遅延生成（冪等）
        self.store.ensure_room(&room_id).await;

        // 2. 視聴者集合へ追加
        let viewer_count = self
            .registry
            .join(connection_id.clone(), room_id.clone())
            .await;

        // 3. EventPusher へ接続を登録
        self.pusher.register(connection_id, sender).await;

        viewer_count
    }

    /// 視聴者数イベントをルーム全体（本人を含む）へブロードキャストする。
    pub async fn broadcast_viewer_count(&self, room_id: &RoomId, event_json: &str) {
        let targets = self.registry.members(room_id).await;
        if let Err(e) = self.pusher.broadcast(targets, event_json).await {
            tracing::warn!("Failed to broadcast viewer count to '{}': {}", room_id, e);
        }
    }
}

//! UseCase: ルーム一覧・詳細の取得（HTTP API 用）
//!
//! 監視・運用のための読み取り専用クエリ。リレーのコアロジックからは
//! 独立しており、store と registry を読むだけで副作用は無い。

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    ConnectionRegistry, RoomId, RoomSnapshot, RoomStore, RoomSummary, StoreError,
};

/// One room with its live viewer count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOverview {
    pub summary: RoomSummary,
    pub viewer_count: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn execute(&self) -> Vec<RoomOverview> {
        let summaries = self.store.list_rooms().await;
        let mut overviews = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let viewer_count = self.registry.count(&summary.id).await;
            overviews.push(RoomOverview {
                summary,
                viewer_count,
            });
        }
        overviews
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// 詳細エンドポイントは snapshot と異なり、ルームの不存在を 404 と
    /// して区別する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
    ) -> Result<(RoomSummary, RoomSnapshot, usize), GetRoomDetailError> {
        let summary = self
            .store
            .room_summary(room_id)
            .await
            .map_err(|_: StoreError| GetRoomDetailError::RoomNotFound)?;
        let snapshot = self.store.snapshot(room_id).await;
        let viewer_count = self.registry.count(room_id).await;
        Ok((summary, snapshot, viewer_count))
    }
}

//! UseCase: プロセス統計の取得（ヘルスチェック用）
//!
//! 稼働時間・ルーム数・総視聴者数を外部監視向けに返す。コアロジックは
//! この値を消費しない。

use std::{
    sync::Arc,
    time::Instant,
};

use crate::domain::{ConnectionRegistry, RoomStore};

/// Health snapshot served by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub active_rooms: usize,
    pub total_viewers: usize,
}

/// 統計取得のユースケース
pub struct GetStatsUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
    started_at: Instant,
}

impl GetStatsUseCase {
    pub fn new(store: Arc<dyn RoomStore>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            started_at: Instant::now(),
        }
    }

    pub async fn execute(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs(),
            active_rooms: self.store.active_rooms().await,
            total_viewers: self.registry.total_connections().await,
        }
    }
}

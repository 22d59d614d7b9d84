//! UseCase: ドメインイベントの中継（EventRelay の中核）
//!
//! 受信イベントごとの「store への反映」と「ファンアウト対象の決定」を
//! 一箇所に集約する。ファンアウトは原則として送信者を除くルーム全体：
//! 送信元クライアントは変更を適用済みであり、再配送は冗長なうえ
//! ハンドラが冪等でない場合に二重適用を招く。
//!
//! ルーム内の配信順序はリレーが受信した順（単一プロセス・接続ごとの
//! FIFO チャンネル）。ルームをまたぐ順序は保証しない。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, EventPusher, Participant, RoomId, RoomStore, Timestamp,
    WinnerRecord,
};
use fukubiki_shared::time::Clock;

use super::error::RelayError;

/// イベント中継のユースケース
pub struct RelayEventUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl RelayEventUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
            clock,
        }
    }

    /// 参加者リストの置換を store へ反映し、送信者以外へ中継する。
    pub async fn update_participants(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        participants: Vec<Participant>,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        self.store
            .apply_participants_update(room_id, participants)
            .await;
        self.fan_out(room_id, sender, event_json).await
    }

    /// 当選者リストの置換を store へ反映し、送信者以外へ中継する。
    pub async fn update_winners(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        winners: Vec<WinnerRecord>,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        self.store.apply_winners_update(room_id, winners).await;
        self.fan_out(room_id, sender, event_json).await
    }

    /// 抽選開始を送信者以外へ中継する。当選者は既に決定済みでデータと
    /// して運ばれるため、store の変異は無い。空のロスターでは開始を
    /// 拒否する。
    pub async fn start_raffle(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        participant_count: usize,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        if participant_count == 0 {
            return Err(RelayError::EmptyRoster);
        }
        self.fan_out(room_id, sender, event_json).await
    }

    /// 抽選完了。当選者レコードの追加とロスターからの除去を 1 回の
    /// store 変異で行い、送信者以外へ中継する。
    pub async fn complete_raffle(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        winner: &Participant,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let won_at = Timestamp::new(self.clock.now_millis());
        self.store
            .apply_draw_completed(room_id, winner, won_at)
            .await;
        self.fan_out(room_id, sender, event_json).await
    }

    /// 当選発表の表示。遅参加者が同じ画面を見られるよう表示ブロブを
    /// 記録し、送信者以外へ中継する。
    pub async fn show_winner_modal(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        display_blob: String,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        self.store
            .record_display_snapshot(room_id, display_blob)
            .await;
        self.fan_out(room_id, sender, event_json).await
    }

    /// 当選発表の終了。表示ブロブを消去し、送信者以外へ中継する。
    pub async fn close_winner_modal(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        self.store
            .record_display_snapshot(room_id, String::new())
            .await;
        self.fan_out(room_id, sender, event_json).await
    }

    /// 送信者を除くルーム全体へブロードキャストする。
    async fn fan_out(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        event_json: &str,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let targets: Vec<ConnectionId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .filter(|connection_id| connection_id != sender)
            .collect();

        self.pusher
            .broadcast(targets.clone(), event_json)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}

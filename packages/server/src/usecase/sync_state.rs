//! UseCase: 権威状態の同期（sync-state）
//!
//! 管理者クライアントが接続時・再接続時に自身のロスターを正として
//! 押し込む。store への書き込みのみでファンアウトは行わない。送信者が
//! 本当に管理者かどうかはリレーでは検証しない（意図的なギャップ、
//! DESIGN.md 参照）。同一ルームに複数の管理者がいる場合は last writer
//! wins。

use std::sync::Arc;

use crate::domain::{Participant, RoomId, RoomStore, WinnerRecord};

/// 権威状態同期のユースケース
pub struct SyncStateUseCase {
    store: Arc<dyn RoomStore>,
}

impl SyncStateUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// 両コレクションを丸ごと置き換える（マージしない）。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        participants: Vec<Participant>,
        winners: Vec<WinnerRecord>,
    ) {
        self.store.set_roster(room_id, participants, winners).await;
    }
}

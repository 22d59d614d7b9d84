//! WebSocket event catalog of the raffle relay protocol.
//!
//! Every message is a JSON object tagged by a kebab-case `type` field.
//! Payload fields are camelCase; collections default to empty when absent
//! (malformed senders degrade gracefully instead of raising).
//!
//! The same catalog is consumed by the CLI client crate, so the protocol
//! contract (including the presentation duration) lives here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed duration of the draw animation, shared by the admin and viewer
/// state machines so both sides converge on the same Drawing→Displaying
/// transition without wall-clock polling.
pub const DRAW_SPIN_DURATION: Duration = Duration::from_secs(10);

/// One raffle entrant on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub id: String,
    #[serde(default)]
    pub sequence: u32,
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub added_at: i64,
}

/// One past winner on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub won_at: i64,
    #[serde(default)]
    pub position: u32,
}

/// Events a client sends to the relay. Routing is scoped by the sending
/// connection's joined room; payloads carry no room field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Late joiner asks for the authoritative snapshot (unicast reply).
    RequestCurrentState,

    /// Admin pushes its authoritative state; store-only, no fan-out.
    #[serde(rename_all = "camelCase")]
    SyncState {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
        #[serde(default)]
        winners: Vec<WinnerDto>,
    },

    /// Full participant list replacement.
    #[serde(rename_all = "camelCase")]
    UpdateParticipants {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
    },

    /// Full winner list replacement.
    #[serde(rename_all = "camelCase")]
    UpdateWinners {
        #[serde(default)]
        winners: Vec<WinnerDto>,
    },

    /// Admin starts a draw; the winner is already decided and travels as
    /// data so every viewer converges on the same outcome.
    #[serde(rename_all = "camelCase")]
    StartRaffle {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
        winner_id: String,
    },

    /// The spin finished; the winner becomes a record.
    #[serde(rename_all = "camelCase")]
    CompleteRaffle { winner: ParticipantDto },

    /// Admin opened the winner announcement.
    #[serde(rename_all = "camelCase")]
    ShowWinnerModal { winner: ParticipantDto },

    /// Admin dismissed the winner announcement.
    CloseWinnerModal,
}

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Self-inclusive viewer count, broadcast to the whole room on every
    /// join and leave.
    #[serde(rename_all = "camelCase")]
    ViewersCount { count: usize },

    /// Authoritative snapshot, unicast to the requester.
    #[serde(rename_all = "camelCase")]
    CurrentState {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
        #[serde(default)]
        winners: Vec<WinnerDto>,
        #[serde(default)]
        current_display: String,
    },

    #[serde(rename_all = "camelCase")]
    RaffleStarted {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
        winner_id: String,
    },

    #[serde(rename_all = "camelCase")]
    RaffleCompleted { winner: ParticipantDto },

    #[serde(rename_all = "camelCase")]
    ParticipantsUpdated {
        #[serde(default)]
        participants: Vec<ParticipantDto>,
    },

    #[serde(rename_all = "camelCase")]
    WinnersUpdated {
        #[serde(default)]
        winners: Vec<WinnerDto>,
    },

    #[serde(rename_all = "camelCase")]
    ShowWinnerModal { winner: ParticipantDto },

    CloseWinnerModal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_tagged_by_kebab_case_type() {
        // テスト項目: インバウンドイベントが kebab-case の type タグで判別される
        // given (前提条件):
        let json = r#"{"type":"update-participants","participants":[
            {"id":"p1","sequence":1,"name":"Ana","group":"Sales","addedAt":1000}
        ]}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::UpdateParticipants { participants } => {
                assert_eq!(participants.len(), 1);
                assert_eq!(participants[0].name, "Ana");
                assert_eq!(participants[0].added_at, 1000);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_absent_collections_default_to_empty() {
        // テスト項目: コレクション欠落時は空リストとして解釈される（エラーにしない）
        // given (前提条件):
        let json = r#"{"type":"sync-state"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::SyncState {
                participants: vec![],
                winners: vec![],
            }
        );
    }

    #[test]
    fn test_start_raffle_round_trips_winner_id() {
        // テスト項目: start-raffle の winnerId が camelCase で往復する
        // given (前提条件):
        let event = ClientEvent::StartRaffle {
            participants: vec![],
            winner_id: "p2".to_string(),
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"start-raffle""#));
        assert!(json.contains(r#""winnerId":"p2""#));
        assert_eq!(serde_json::from_str::<ClientEvent>(&json).unwrap(), event);
    }

    #[test]
    fn test_close_winner_modal_has_no_payload() {
        // テスト項目: close-winner-modal はペイロードなしで解釈される
        // given (前提条件):
        let json = r#"{"type":"close-winner-modal"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::CloseWinnerModal);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // テスト項目: 未知の type は解釈エラーになる（ハンドラ側で警告して破棄）
        // given (前提条件):
        let json = r#"{"type":"hijack-room"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_current_state_serializes_current_display() {
        // テスト項目: current-state が currentDisplay キーで直列化される
        // given (前提条件):
        let event = ServerEvent::CurrentState {
            participants: vec![],
            winners: vec![],
            current_display: "<blob>".to_string(),
        };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"current-state""#));
        assert!(json.contains(r#""currentDisplay":"<blob>""#));
    }

    #[test]
    fn test_viewers_count_wire_shape() {
        // テスト項目: viewers-count の直列化形状
        // given (前提条件):
        let event = ServerEvent::ViewersCount { count: 4 };

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"viewers-count","count":4}"#);
    }

    #[test]
    fn test_draw_spin_duration_is_ten_seconds() {
        // テスト項目: 抽選アニメーションの規定時間は 10 秒
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(DRAW_SPIN_DURATION, Duration::from_secs(10));
    }
}

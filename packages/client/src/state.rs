//! Per-client role and phase state machine.
//!
//! The role is fixed once at connection time and never changes within a
//! session. The admin drives its own transitions; the viewer's phase is
//! driven purely by received relay events and never self-initiates a
//! draw.

use thiserror::Error;

use fukubiki_server::infrastructure::dto::websocket::ServerEvent;

use crate::{roster::Roster, selection};

/// Client role, decided by the `--view` flag at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Viewer,
}

/// Presentation phase of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Viewer only: connected but no snapshot or live event seen yet.
    WaitingForState,
    Idle,
    Drawing,
    Displaying,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("only the admin can trigger a draw")]
    NotAdmin,

    #[error("cannot draw from an empty roster")]
    EmptyRoster,

    #[error("a draw is already in progress")]
    DrawInProgress,
}

/// The client's mirror of the room plus its own phase.
#[derive(Debug)]
pub struct ClientState {
    role: Role,
    phase: Phase,
    pub roster: Roster,
    viewer_count: usize,
    current_display: String,
}

impl ClientState {
    pub fn new(role: Role) -> Self {
        let phase = match role {
            Role::Admin => Phase::Idle,
            Role::Viewer => Phase::WaitingForState,
        };
        Self {
            role,
            phase,
            roster: Roster::new(),
            viewer_count: 0,
            current_display: String::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn viewer_count(&self) -> usize {
        self.viewer_count
    }

    pub fn current_display(&self) -> &str {
        &self.current_display
    }

    /// Whether the draw control is currently enabled.
    pub fn can_draw(&self) -> bool {
        self.role == Role::Admin
            && self.phase == Phase::Idle
            && !self.roster.participants().is_empty()
    }

    /// Admin: Idle → Drawing. Guarded on role, phase and a non-empty
    /// roster; the draw command stays disabled while Drawing.
    pub fn begin_draw(&mut self) -> Result<(), StateError> {
        if self.role != Role::Admin {
            return Err(StateError::NotAdmin);
        }
        match self.phase {
            Phase::Drawing | Phase::Displaying => return Err(StateError::DrawInProgress),
            _ => {}
        }
        if self.roster.participants().is_empty() {
            return Err(StateError::EmptyRoster);
        }
        self.phase = Phase::Drawing;
        Ok(())
    }

    /// Admin: Drawing → Displaying once the spin duration has elapsed.
    /// Applies the draw to the local mirror and returns the new record.
    pub fn finish_draw(
        &mut self,
        winner_id: &str,
        won_at: i64,
    ) -> Option<fukubiki_server::infrastructure::dto::websocket::WinnerDto> {
        let mut participants = self.roster.participants().to_vec();
        let mut winners = self.roster.winners().to_vec();
        let record = selection::complete_draw(&mut participants, &mut winners, winner_id, won_at);
        if record.is_some() {
            self.roster.replace(participants, winners);
        }
        self.phase = Phase::Displaying;
        record
    }

    /// Admin: Displaying → Idle when the operator dismisses the
    /// announcement.
    pub fn dismiss(&mut self) {
        self.phase = Phase::Idle;
        self.current_display.clear();
    }

    /// Leave `WaitingForState` the first time any room state arrives.
    fn settle(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Merge one relay event into the mirror.
    ///
    /// The admin only consumes the viewer count; everything else is its
    /// own authoritative state echoing back concerns it already applied.
    /// The viewer mirrors every event.
    pub fn apply_server_event(&mut self, event: &ServerEvent, now: i64) {
        if let ServerEvent::ViewersCount { count } = event {
            self.viewer_count = *count;
            return;
        }

        if self.role == Role::Admin {
            return;
        }

        match event {
            ServerEvent::ViewersCount { .. } => unreachable!("handled above"),

            ServerEvent::CurrentState {
                participants,
                winners,
                current_display,
            } => {
                self.roster.replace(participants.clone(), winners.clone());
                self.current_display = current_display.clone();
                // The late joiner lands on the same screen an existing
                // viewer sees.
                if self.current_display.is_empty() {
                    self.settle(Phase::Idle);
                } else {
                    self.settle(Phase::Displaying);
                }
            }

            ServerEvent::RaffleStarted { participants, .. } => {
                self.roster.replace_participants(participants.clone());
                self.settle(Phase::Drawing);
            }

            ServerEvent::RaffleCompleted { winner } => {
                let mut participants = self.roster.participants().to_vec();
                let mut winners = self.roster.winners().to_vec();
                selection::complete_draw(&mut participants, &mut winners, &winner.id, now);
                self.roster.replace(participants, winners);
                self.settle(Phase::Displaying);
            }

            ServerEvent::ParticipantsUpdated { participants } => {
                self.roster.replace_participants(participants.clone());
                if self.phase == Phase::WaitingForState {
                    self.settle(Phase::Idle);
                }
            }

            ServerEvent::WinnersUpdated { winners } => {
                self.roster.replace_winners(winners.clone());
                if self.phase == Phase::WaitingForState {
                    self.settle(Phase::Idle);
                }
            }

            ServerEvent::ShowWinnerModal { winner } => {
                self.current_display = serde_json::to_string(winner).unwrap_or_default();
                self.settle(Phase::Displaying);
            }

            ServerEvent::CloseWinnerModal => {
                self.current_display.clear();
                self.settle(Phase::Idle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fukubiki_server::infrastructure::dto::websocket::{ParticipantDto, WinnerDto};

    fn participant(id: &str, name: &str) -> ParticipantDto {
        ParticipantDto {
            id: id.to_string(),
            sequence: 1,
            name: name.to_string(),
            group: "unspecified".to_string(),
            added_at: 1_000,
        }
    }

    #[test]
    fn test_admin_starts_idle_and_viewer_waits_for_state() {
        // テスト項目: 初期フェーズはロールで決まる
        // given (前提条件) / when (操作):
        let admin = ClientState::new(Role::Admin);
        let viewer = ClientState::new(Role::Viewer);

        // then (期待する結果):
        assert_eq!(admin.phase(), Phase::Idle);
        assert_eq!(viewer.phase(), Phase::WaitingForState);
    }

    #[test]
    fn test_admin_cannot_draw_from_empty_roster() {
        // テスト項目: 空のロスターでは抽選を開始できない
        // given (前提条件):
        let mut admin = ClientState::new(Role::Admin);

        // when (操作):
        let result = admin.begin_draw();

        // then (期待する結果):
        assert_eq!(result, Err(StateError::EmptyRoster));
        assert!(!admin.can_draw());
    }

    #[test]
    fn test_admin_draw_lifecycle() {
        // テスト項目: Idle → Drawing → Displaying → Idle の遷移
        // given (前提条件):
        let mut admin = ClientState::new(Role::Admin);
        admin.roster.add("Ana", None, 1_000).unwrap();
        let winner_id = admin.roster.participants()[0].id.clone();

        // when (操作): 抽選開始
        admin.begin_draw().unwrap();

        // then (期待する結果): Drawing 中は再抽選できない
        assert_eq!(admin.phase(), Phase::Drawing);
        assert_eq!(admin.begin_draw(), Err(StateError::DrawInProgress));

        // when (操作): 規定時間経過後
        let record = admin.finish_draw(&winner_id, 9_000).unwrap();

        // then (期待する結果):
        assert_eq!(record.name, "Ana");
        assert_eq!(admin.phase(), Phase::Displaying);
        assert!(admin.roster.participants().is_empty());

        // when (操作): 発表を閉じる
        admin.dismiss();

        // then (期待する結果):
        assert_eq!(admin.phase(), Phase::Idle);
    }

    #[test]
    fn test_viewer_never_draws() {
        // テスト項目: 視聴者は抽選を自発できない
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);

        // when (操作):
        let result = viewer.begin_draw();

        // then (期待する結果):
        assert_eq!(result, Err(StateError::NotAdmin));
    }

    #[test]
    fn test_viewer_exits_waiting_on_snapshot() {
        // テスト項目: スナップショット受信で WaitingForState を抜ける
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);

        // when (操作):
        viewer.apply_server_event(
            &ServerEvent::CurrentState {
                participants: vec![participant("a", "Ana")],
                winners: vec![],
                current_display: String::new(),
            },
            1_000,
        );

        // then (期待する結果):
        assert_eq!(viewer.phase(), Phase::Idle);
        assert_eq!(viewer.roster.participants().len(), 1);
    }

    #[test]
    fn test_viewer_exits_waiting_on_live_event() {
        // テスト項目: スナップショットより先に届いたライブイベントでも抜ける
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);

        // when (操作):
        viewer.apply_server_event(
            &ServerEvent::RaffleStarted {
                participants: vec![participant("a", "Ana")],
                winner_id: "a".to_string(),
            },
            1_000,
        );

        // then (期待する結果): そのままライブの抽選を追従する
        assert_eq!(viewer.phase(), Phase::Drawing);
    }

    #[test]
    fn test_viewer_count_does_not_exit_waiting() {
        // テスト項目: viewers-count は在席通知であり、状態待ちは継続する
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);

        // when (操作):
        viewer.apply_server_event(&ServerEvent::ViewersCount { count: 3 }, 1_000);

        // then (期待する結果):
        assert_eq!(viewer.viewer_count(), 3);
        assert_eq!(viewer.phase(), Phase::WaitingForState);
    }

    #[test]
    fn test_viewer_mirrors_full_draw_sequence() {
        // テスト項目: 視聴者が抽選の開始〜完了〜発表〜終了を追従する
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);
        let roster = vec![
            participant("a", "Ana"),
            participant("b", "Beto"),
            participant("c", "Carla"),
        ];

        // when (操作): 開始
        viewer.apply_server_event(
            &ServerEvent::RaffleStarted {
                participants: roster.clone(),
                winner_id: "b".to_string(),
            },
            1_000,
        );
        assert_eq!(viewer.phase(), Phase::Drawing);

        // when (操作): 完了
        viewer.apply_server_event(
            &ServerEvent::RaffleCompleted {
                winner: roster[1].clone(),
            },
            9_000,
        );

        // then (期待する結果): 当選者が移動し、表示フェーズへ
        assert_eq!(viewer.phase(), Phase::Displaying);
        let names: Vec<&str> = viewer
            .roster
            .participants()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Carla"]);
        assert_eq!(viewer.roster.winners()[0].name, "Beto");
        assert_eq!(viewer.roster.winners()[0].position, 1);

        // when (操作): 発表終了
        viewer.apply_server_event(&ServerEvent::CloseWinnerModal, 10_000);

        // then (期待する結果):
        assert_eq!(viewer.phase(), Phase::Idle);
        assert_eq!(viewer.current_display(), "");
    }

    #[test]
    fn test_late_joiner_with_display_lands_on_displaying() {
        // テスト項目: 発表中のルームへ遅参加すると同じ画面（表示中）になる
        // given (前提条件):
        let mut viewer = ClientState::new(Role::Viewer);

        // when (操作):
        viewer.apply_server_event(
            &ServerEvent::CurrentState {
                participants: vec![],
                winners: vec![WinnerDto {
                    id: "b".to_string(),
                    name: "Beto".to_string(),
                    group: "unspecified".to_string(),
                    won_at: 9_000,
                    position: 1,
                }],
                current_display: r#"{"id":"b","name":"Beto"}"#.to_string(),
            },
            10_000,
        );

        // then (期待する結果):
        assert_eq!(viewer.phase(), Phase::Displaying);
        assert!(!viewer.current_display().is_empty());
    }

    #[test]
    fn test_admin_ignores_mirror_events() {
        // テスト項目: 管理者は自分の権威状態を echo で上書きしない
        // given (前提条件):
        let mut admin = ClientState::new(Role::Admin);
        admin.roster.add("Ana", None, 1_000).unwrap();

        // when (操作):
        admin.apply_server_event(
            &ServerEvent::ParticipantsUpdated { participants: vec![] },
            2_000,
        );

        // then (期待する結果): ロスターは維持され、視聴者数だけ更新される
        assert_eq!(admin.roster.participants().len(), 1);
        admin.apply_server_event(&ServerEvent::ViewersCount { count: 7 }, 2_000);
        assert_eq!(admin.viewer_count(), 7);
    }
}

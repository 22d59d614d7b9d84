//! Admin-side roster editing.
//!
//! The roster lives on the admin client; the relay only mirrors it. All
//! uniqueness checks happen here, before any event is emitted: a
//! duplicate name never reaches the relay.

use thiserror::Error;
use uuid::Uuid;

use fukubiki_server::infrastructure::dto::websocket::{ParticipantDto, WinnerDto};

/// Sentinel group for entrants without one.
pub const UNSPECIFIED_GROUP: &str = "unspecified";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("entrant name must not be empty")]
    EmptyName,

    #[error("'{0}' is already on the roster")]
    DuplicateName(String),
}

/// Result of a CSV import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// The admin's local participant and winner lists.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<ParticipantDto>,
    winners: Vec<WinnerDto>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> &[ParticipantDto] {
        &self.participants
    }

    pub fn winners(&self) -> &[WinnerDto] {
        &self.winners
    }

    /// Replace both collections (e.g. from a received snapshot).
    pub fn replace(&mut self, participants: Vec<ParticipantDto>, winners: Vec<WinnerDto>) {
        self.participants = participants;
        self.winners = winners;
    }

    /// Replace only the participant list.
    pub fn replace_participants(&mut self, participants: Vec<ParticipantDto>) {
        self.participants = participants;
    }

    /// Replace only the winner list.
    pub fn replace_winners(&mut self, winners: Vec<WinnerDto>) {
        self.winners = winners;
    }

    fn has_name(&self, name: &str) -> bool {
        let needle = name.trim();
        self.participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(needle))
    }

    /// Add one entrant. Names are unique case-insensitively within the
    /// active roster; the group defaults to the sentinel.
    pub fn add(
        &mut self,
        name: &str,
        group: Option<&str>,
        added_at: i64,
    ) -> Result<&ParticipantDto, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.has_name(name) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        let group = group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(UNSPECIFIED_GROUP);

        self.participants.push(ParticipantDto {
            id: Uuid::new_v4().to_string(),
            sequence: self.participants.len() as u32 + 1,
            name: name.to_string(),
            group: group.to_string(),
            added_at,
        });

        Ok(self.participants.last().expect("just pushed"))
    }

    /// Remove one entrant by name (case-insensitive). Returns the removed
    /// entry when found.
    pub fn remove_by_name(&mut self, name: &str) -> Option<ParticipantDto> {
        let needle = name.trim();
        let index = self
            .participants
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(needle))?;
        Some(self.participants.remove(index))
    }

    /// Import semicolon-separated lines of `sequence;name;group`.
    ///
    /// The first line is treated as a header and skipped. Duplicate names
    /// are counted and skipped; lines without a name column are skipped.
    pub fn import_csv(&mut self, text: &str, added_at: i64) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (index, line) in text.lines().enumerate() {
            if index == 0 {
                continue; // header
            }

            let parts: Vec<&str> = line.split(';').map(str::trim).collect();
            let Some(name) = parts.get(1).filter(|name| !name.is_empty()) else {
                if !line.trim().is_empty() {
                    summary.skipped += 1;
                }
                continue;
            };

            let group = parts.get(2).copied();
            match self.add(name, group, added_at) {
                Ok(_) => summary.added += 1,
                Err(RosterError::DuplicateName(_)) => summary.duplicates += 1,
                Err(RosterError::EmptyName) => summary.skipped += 1,
            }
        }

        summary
    }

    /// Reset both collections.
    pub fn clear(&mut self) {
        self.participants.clear();
        self.winners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_id_sequence_and_group_sentinel() {
        // テスト項目: 追加された参加者に id・連番・グループ既定値が付く
        // given (前提条件):
        let mut roster = Roster::new();

        // when (操作):
        let added = roster.add("Ana", None, 1_000).unwrap().clone();

        // then (期待する結果):
        assert!(!added.id.is_empty());
        assert_eq!(added.sequence, 1);
        assert_eq!(added.group, UNSPECIFIED_GROUP);
        assert_eq!(added.added_at, 1_000);
    }

    #[test]
    fn test_duplicate_name_is_rejected_case_insensitively() {
        // テスト項目: 大文字小文字を無視した重複名は拒否される
        // given (前提条件):
        let mut roster = Roster::new();
        roster.add("Beto", None, 1_000).unwrap();

        // when (操作):
        let result = roster.add("  beto ", None, 2_000);

        // then (期待する結果): リレーへ届く前にローカルで拒否される
        assert_eq!(result, Err(RosterError::DuplicateName("beto".to_string())));
        assert_eq!(roster.participants().len(), 1);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        // テスト項目: 空の名前は拒否される
        // given (前提条件):
        let mut roster = Roster::new();

        // when (操作):
        let result = roster.add("   ", None, 1_000);

        // then (期待する結果):
        assert_eq!(result, Err(RosterError::EmptyName));
    }

    #[test]
    fn test_add_then_remove_leaves_roster_unchanged() {
        // テスト項目: 追加して即削除するとロスターは元のサイズに戻る
        // given (前提条件):
        let mut roster = Roster::new();
        roster.add("Ana", None, 1_000).unwrap();
        let before = roster.participants().len();

        // when (操作):
        roster.add("Beto", None, 2_000).unwrap();
        let removed = roster.remove_by_name("Beto");

        // then (期待する結果):
        assert!(removed.is_some());
        assert_eq!(roster.participants().len(), before);
        assert!(!roster.participants().iter().any(|p| p.name == "Beto"));
    }

    #[test]
    fn test_remove_unknown_name_is_none() {
        // テスト項目: 存在しない名前の削除は None
        // given (前提条件):
        let mut roster = Roster::new();

        // when (操作):
        let removed = roster.remove_by_name("Ghost");

        // then (期待する結果):
        assert!(removed.is_none());
    }

    #[test]
    fn test_import_csv_skips_header_duplicates_and_blanks() {
        // テスト項目: CSV 取り込みがヘッダ・重複・名前なし行を読み飛ばす
        // given (前提条件):
        let mut roster = Roster::new();
        roster.add("Ana", None, 500).unwrap();
        let csv = "No;Nombre;Gerencia\n\
                   1;Beto;Sales\n\
                   2;ana;\n\
                   3;;Marketing\n\
                   4;Carla;Marketing\n";

        // when (操作):
        let summary = roster.import_csv(csv, 1_000);

        // then (期待する結果):
        assert_eq!(
            summary,
            ImportSummary {
                added: 2,
                duplicates: 1,
                skipped: 1,
            }
        );
        let names: Vec<&str> = roster.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beto", "Carla"]);
    }

    #[test]
    fn test_import_csv_defaults_missing_group() {
        // テスト項目: グループ列が無い行はセンチネルになる
        // given (前提条件):
        let mut roster = Roster::new();
        let csv = "No;Nombre\n1;Beto\n";

        // when (操作):
        roster.import_csv(csv, 1_000);

        // then (期待する結果):
        assert_eq!(roster.participants()[0].group, UNSPECIFIED_GROUP);
    }

    #[test]
    fn test_clear_resets_both_collections() {
        // テスト項目: clear で両コレクションが空になる
        // given (前提条件):
        let mut roster = Roster::new();
        roster.add("Ana", None, 1_000).unwrap();
        roster.replace_winners(vec![WinnerDto {
            id: "w".to_string(),
            name: "Old".to_string(),
            group: UNSPECIFIED_GROUP.to_string(),
            won_at: 1,
            position: 1,
        }]);

        // when (操作):
        roster.clear();

        // then (期待する結果):
        assert!(roster.participants().is_empty());
        assert!(roster.winners().is_empty());
    }
}

//! Domain entities: raffle entrants, winner records and rooms.

use super::value_object::{EntrantName, GroupName, RoomId, Timestamp};

/// One raffle entrant on a room's active roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Opaque identifier, generated by the admin client.
    pub id: String,
    /// Display order on the roster (1-based).
    pub sequence: u32,
    pub name: EntrantName,
    pub group: GroupName,
    pub added_at: Timestamp,
}

/// A past winner, snapshot-copied from the `Participant` at the moment of
/// winning. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerRecord {
    pub id: String,
    pub name: EntrantName,
    pub group: GroupName,
    pub won_at: Timestamp,
    /// 1-based rank among the room's winners.
    pub position: u32,
}

impl WinnerRecord {
    /// Snapshot a participant into a winner record.
    pub fn from_participant(participant: &Participant, won_at: Timestamp, position: u32) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            group: participant.group.clone(),
            won_at,
            position,
        }
    }
}

/// Full, authoritative copy of a room's synchronized state, served to late
/// joiners. An unknown room yields the empty snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomSnapshot {
    pub participants: Vec<Participant>,
    pub winners: Vec<WinnerRecord>,
    /// Opaque renderable blob of the current winner announcement; empty
    /// when nothing is displayed.
    pub display: String,
}

/// Isolated namespace partitioning all relay state and routing.
///
/// 参加者リストは追加順、当選者リストは新しい順に保持する。両リストは
/// 常に互いに素である（当選の瞬間に participant は roster から外れる）。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub winners: Vec<WinnerRecord>,
    pub display: String,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            winners: Vec::new(),
            display: String::new(),
            created_at,
        }
    }

    /// Full replacement of both collections; last writer wins.
    pub fn set_roster(&mut self, participants: Vec<Participant>, winners: Vec<WinnerRecord>) {
        self.participants = participants;
        self.winners = winners;
    }

    /// Partial replacement of the participant list only.
    pub fn apply_participants_update(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
    }

    /// Partial replacement of the winner list only.
    pub fn apply_winners_update(&mut self, winners: Vec<WinnerRecord>) {
        self.winners = winners;
    }

    /// Apply a completed draw: append the winner record at the front
    /// (position = previous count + 1) and drop the participant from the
    /// roster in the same mutation.
    pub fn apply_draw_completed(&mut self, winner: &Participant, won_at: Timestamp) -> WinnerRecord {
        let position = self.winners.len() as u32 + 1;
        let record = WinnerRecord::from_participant(winner, won_at, position);
        self.winners.insert(0, record.clone());
        self.participants.retain(|p| p.id != winner.id);
        record
    }

    /// Store the latest renderable winner-announcement state.
    pub fn record_display(&mut self, blob: String) {
        self.display = blob;
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            participants: self.participants.clone(),
            winners: self.winners.clone(),
            display: self.display.clone(),
        }
    }
}

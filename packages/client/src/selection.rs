//! Selection engine: the randomized-decision core of a draw.
//!
//! The admin picks the winner exactly once and ships the decision as data
//! (the winner id); viewers never redraw. The wheel geometry is a pure
//! function of (participant order, winner index), so admin and viewers
//! compute consistent presentations independently.

use rand::Rng;

use fukubiki_server::infrastructure::dto::websocket::{ParticipantDto, WinnerDto};

/// Full turns the wheel makes before settling on the winning segment.
const BASE_TURNS: f64 = 5.0;

/// Draw one uniformly-random index over the current roster.
///
/// Generic over the RNG so tests can seed a `StdRng` and stay
/// deterministic. Returns `None` for an empty roster.
pub fn draw_winner_index<R: Rng + ?Sized>(rng: &mut R, roster_len: usize) -> Option<usize> {
    if roster_len == 0 {
        return None;
    }
    Some(rng.random_range(0..roster_len))
}

/// Angle of one wheel segment in degrees.
pub fn segment_angle(count: usize) -> f64 {
    360.0 / count as f64
}

/// Rotation offset of the segment at `index`.
pub fn segment_rotation(index: usize, count: usize) -> f64 {
    segment_angle(count) * index as f64
}

/// Derived animation target for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelTarget {
    pub segment_angle: f64,
    /// Total rotation in degrees: base turns plus whatever lands the
    /// pointer on the center of the winning segment.
    pub total_rotation: f64,
}

/// Compute the wheel target for the winner at `index` among `count`
/// participants. `None` when the index is out of range.
pub fn wheel_target(index: usize, count: usize) -> Option<WheelTarget> {
    if count == 0 || index >= count {
        return None;
    }
    let segment = segment_angle(count);
    let total_rotation = BASE_TURNS * 360.0 + (360.0 - segment_rotation(index, count)) + segment / 2.0;
    Some(WheelTarget {
        segment_angle: segment,
        total_rotation,
    })
}

/// Apply a completed draw to the local mirror: the winner is appended at
/// the front of the winner list (position = previous count + 1) and
/// removed from the participants in the same call, so no reader ever
/// observes the two lists overlapping.
pub fn complete_draw(
    participants: &mut Vec<ParticipantDto>,
    winners: &mut Vec<WinnerDto>,
    winner_id: &str,
    won_at: i64,
) -> Option<WinnerDto> {
    let winner = participants.iter().find(|p| p.id == winner_id)?.clone();

    let record = WinnerDto {
        id: winner.id.clone(),
        name: winner.name,
        group: winner.group,
        won_at,
        position: winners.len() as u32 + 1,
    };
    winners.insert(0, record.clone());
    participants.retain(|p| p.id != winner_id);

    Some(record)
}

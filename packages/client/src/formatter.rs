//! Message formatting utilities for terminal display.

use fukubiki_server::infrastructure::dto::websocket::{ParticipantDto, WinnerDto};
use fukubiki_shared::time::millis_to_rfc3339;

use crate::{roster::ImportSummary, selection::WheelTarget};

/// Message formatter for the raffle CLI.
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the participant list.
    pub fn format_participants(participants: &[ParticipantDto]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Participants ({}):\n", participants.len()));

        if participants.is_empty() {
            output.push_str("(no participants yet)\n");
        } else {
            for participant in participants {
                output.push_str(&format!(
                    "{:>3}. {} [{}]\n",
                    participant.sequence, participant.name, participant.group
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the winner list, most recent first.
    pub fn format_winners(winners: &[WinnerDto]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Winners ({}):\n", winners.len()));

        if winners.is_empty() {
            output.push_str("(no winners yet)\n");
        } else {
            for winner in winners {
                output.push_str(&format!(
                    "#{} {} [{}] - won at {}\n",
                    winner.position,
                    winner.name,
                    winner.group,
                    millis_to_rfc3339(winner.won_at)
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a viewer count notification.
    pub fn format_viewer_count(count: usize) -> String {
        let noun = if count == 1 { "viewer" } else { "viewers" };
        format!("\n* {} {} in the room\n", count, noun)
    }

    /// Format the start of a draw. The winner id is deliberately not
    /// shown; the reveal happens when the spin completes.
    pub fn format_raffle_started(participant_count: usize, target: Option<WheelTarget>) -> String {
        match target {
            Some(target) => format!(
                "\n>>> The wheel is spinning among {} participants ({:.0} degrees)...\n",
                participant_count, target.total_rotation
            ),
            None => format!(
                "\n>>> The wheel is spinning among {} participants...\n",
                participant_count
            ),
        }
    }

    /// Format the winner announcement after a completed draw.
    pub fn format_winner_announcement(winner: &WinnerDto) -> String {
        format!(
            "\n*** Winner #{}: {} [{}] ***\n",
            winner.position, winner.name, winner.group
        )
    }

    /// Format the announcement modal of a winner.
    pub fn format_winner_modal(name: &str, group: &str) -> String {
        format!("\n[ {} - {} - congratulations! ]\n", name, group)
    }

    /// Format an import summary.
    pub fn format_import_summary(summary: ImportSummary) -> String {
        let mut message = format!("{} participants added", summary.added);
        if summary.duplicates > 0 {
            message.push_str(&format!(" ({} duplicates skipped)", summary.duplicates));
        }
        if summary.skipped > 0 {
            message.push_str(&format!(" ({} malformed lines skipped)", summary.skipped));
        }
        message.push('\n');
        message
    }
}

/// Redisplay the prompt after printing a notification.
pub fn redisplay_prompt(room: &str) {
    use std::io::Write;

    print!("{}> ", room);
    std::io::stdout().flush().ok();
}

//! Message formatting utilities for client display.

use mitsumori_server::infrastructure::dto::websocket::{
    ParticipantInfo, PhaseDto, ServerMessage, VoteInfo,
};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any message received from the server
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server message
    /// * `my_name` - This client's display name (to mark as "me")
    pub fn format_server_message(message: &ServerMessage, my_name: &str) -> String {
        match message {
            ServerMessage::RoomState {
                room_id,
                participants,
                phase,
                round,
                votes,
            } => Self::format_room_state(
                room_id,
                participants,
                *phase,
                *round,
                votes.as_deref(),
                my_name,
            ),
            ServerMessage::VotingStarted => Self::format_voting_started(),
            ServerMessage::VoteCount {
                voted_count,
                total_players,
            } => Self::format_vote_count(*voted_count, *total_players),
            ServerMessage::CountdownStart => Self::format_countdown(),
            ServerMessage::VotingComplete { votes, average } => {
                Self::format_voting_complete(votes, *average)
            }
            ServerMessage::Rejected { reason } => Self::format_rejected(reason),
        }
    }

    /// Format the full room state: phase, participants and (after reveal) votes
    pub fn format_room_state(
        room_id: &str,
        participants: &[ParticipantInfo],
        phase: PhaseDto,
        round: u64,
        votes: Option<&[VoteInfo]>,
        my_name: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!(
            "Room '{}' - {} (round {})\n",
            room_id,
            phase_label(phase),
            round
        ));
        output.push_str("Participants:\n");

        if participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in participants {
                let me_suffix = if participant.name == my_name {
                    " (me)"
                } else {
                    ""
                };
                let vote = votes
                    .and_then(|votes| votes.iter().find(|v| v.participant_id == participant.id))
                    .map(|v| format!(": {}", v.value))
                    .unwrap_or_default();
                output.push_str(&format!("  {}{}{}\n", participant.name, me_suffix, vote));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_voting_started() -> String {
        "\n* Voting started! Type a number to vote.\n".to_string()
    }

    pub fn format_vote_count(voted_count: usize, total_players: usize) -> String {
        format!("\n* {}/{} voted\n", voted_count, total_players)
    }

    pub fn format_countdown() -> String {
        "\n* Everyone has voted. Revealing soon...\n".to_string()
    }

    /// Format the round result with each vote and the average
    pub fn format_voting_complete(votes: &[VoteInfo], average: f64) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\nResults:\n", THIN_RULE));
        for vote in votes {
            output.push_str(&format!("  {}: {}\n", vote.name, vote.value));
        }
        output.push_str(&format!("Average: {:.1}\n{}\n", average, THIN_RULE));
        output
    }

    pub fn format_rejected(reason: &str) -> String {
        format!("\n! Rejected: {}\n", reason)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn phase_label(phase: PhaseDto) -> &'static str {
    match phase {
        PhaseDto::Waiting => "waiting",
        PhaseDto::Voting => "voting",
        PhaseDto::Results => "results",
    }
}

//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` (kebab-case) with
//! camelCase fields.

use serde::{Deserialize, Serialize};

/// Inbound messages (participant → server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join { name: String },
    StartVoting,
    SubmitVote { value: u32 },
    NextRound,
}

/// Outbound messages (server → participants)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomState {
        room_id: String,
        participants: Vec<ParticipantInfo>,
        phase: PhaseDto,
        round: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        votes: Option<Vec<VoteInfo>>,
    },
    VotingStarted,
    VoteCount {
        voted_count: usize,
        total_players: usize,
    },
    CountdownStart,
    VotingComplete {
        votes: Vec<VoteInfo>,
        average: f64,
    },
    Rejected {
        reason: String,
    },
}

/// Participant information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: String,
    pub name: String,
    pub connected: bool,
}

/// Vote information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInfo {
    pub participant_id: String,
    pub name: String,
    pub value: u32,
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseDto {
    Waiting,
    Voting,
    Results,
}

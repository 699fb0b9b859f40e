//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PhaseDto;

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// Participant display names in join order
    pub participants: Vec<String>,
    pub phase: PhaseDto,
    pub created_at: String,
}

/// Participant detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub id: String,
    pub name: String,
    pub joined_at: String,
    pub has_voted: bool,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub phase: PhaseDto,
    pub round: u64,
    pub participants: Vec<ParticipantDetailDto>,
    pub voted_count: usize,
    pub deck: Vec<u32>,
    pub created_at: String,
}

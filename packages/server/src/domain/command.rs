//! Commands accepted by a room session.

use super::value_object::ParticipantId;

/// ルームに対する操作の閉じた集合
///
/// `Reveal` は遅延公開タイマーだけが発行する内部コマンド。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    Join {
        participant_id: ParticipantId,
        name: String,
    },
    StartVoting {
        participant_id: ParticipantId,
    },
    SubmitVote {
        participant_id: ParticipantId,
        value: u32,
    },
    NextRound {
        participant_id: ParticipantId,
    },
    Leave {
        participant_id: ParticipantId,
    },
    Reveal {
        round: u64,
    },
}

impl RoomCommand {
    /// コマンドを発行した参加者（内部コマンドなら `None`）
    pub fn sender(&self) -> Option<&ParticipantId> {
        match self {
            RoomCommand::Join { participant_id, .. }
            | RoomCommand::StartVoting { participant_id }
            | RoomCommand::SubmitVote { participant_id, .. }
            | RoomCommand::NextRound { participant_id }
            | RoomCommand::Leave { participant_id } => Some(participant_id),
            RoomCommand::Reveal { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomCommand::Join { .. } => "join",
            RoomCommand::StartVoting { .. } => "start-voting",
            RoomCommand::SubmitVote { .. } => "submit-vote",
            RoomCommand::NextRound { .. } => "next-round",
            RoomCommand::Leave { .. } => "leave",
            RoomCommand::Reveal { .. } => "reveal",
        }
    }
}

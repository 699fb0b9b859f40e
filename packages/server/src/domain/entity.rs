//! Entities
//!
//! ルームを構成するエンティティ。所有者は `RoomSession` のみ。

use std::fmt;

use super::value_object::{DisplayName, ParticipantId, Timestamp};

/// ラウンドのフェーズ
///
/// `Waiting` → `Voting` → `Results` → `Waiting` の順に循環する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Waiting,
    Voting,
    Results,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Voting => "voting",
            Phase::Results => "results",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: DisplayName,
    pub connected: bool,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ParticipantId, name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            connected: true,
            joined_at,
        }
    }
}

/// 投票
///
/// 名前は投票時点のスナップショット。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub participant_id: ParticipantId,
    pub name: DisplayName,
    pub value: u32,
}

/// 確定したラウンドの結果
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub votes: Vec<Vote>,
    pub average: f64,
}

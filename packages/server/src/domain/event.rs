//! Events emitted by a room session.

use std::time::Duration;

use super::{
    entity::{Participant, Phase, RoundResult, Vote},
    value_object::{ParticipantId, RoomId},
};

/// ルーム状態のスナップショット
///
/// `votes` は `Results` フェーズのときだけ `Some`。
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub participants: Vec<Participant>,
    pub phase: Phase,
    pub round: u64,
    pub votes: Option<Vec<Vote>>,
}

/// 送信イベント
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// ルーム状態全体
    StateChanged(RoomSnapshot),
    /// 投票開始（クライアントは選択中のカードをリセットする）
    VotingStarted,
    /// 投票の進捗
    VoteProgress {
        voted_count: usize,
        total_players: usize,
    },
    /// 結果公開前のカウントダウン開始
    CountdownStarted { round: u64, delay: Duration },
    /// ラウンドの確定結果
    VotingComplete(RoundResult),
    /// 送信者だけに返す拒否通知（strict モード）
    Rejected { reason: String },
}

/// 1 回の状態遷移の結果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// 順序通りに配信するイベント
    pub events: Vec<RoomEvent>,
    /// 遷移後にルームに参加している全員
    pub recipients: Vec<ParticipantId>,
}

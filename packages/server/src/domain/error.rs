//! Domain errors

use thiserror::Error;

use super::entity::Phase;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("room id must be at most {0} characters")]
    RoomIdTooLong(usize),

    #[error("room id contains invalid characters: '{0}'")]
    RoomIdInvalidCharacter(String),

    #[error("participant id is not a valid UUID: '{0}'")]
    ParticipantIdInvalid(String),

    #[error("display name must not be empty")]
    DisplayNameEmpty,

    #[error("deck must contain at least one value")]
    DeckEmpty,
}

/// SessionError の分類
///
/// ログレベルと strict モードでの通知内容の判断に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 不正な入力（空の名前、デッキ外の値など）
    InvalidInput,
    /// 現在のフェーズや参加状態では実行できない操作
    InvalidForPhase,
    /// 存在しないルームへの参照など、内部的な不整合
    Internal,
}

/// RoomSession の状態遷移エラー
///
/// いずれの場合も状態は一切変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("display name must not be empty")]
    InvalidName,

    #[error("sender has not joined the room")]
    NotAParticipant,

    #[error("action requires phase '{expected}' but room is in '{actual}'")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("value {0} is not in the deck")]
    ValueNotInDeck(u32),

    #[error("at least {required} participants are required to start voting (currently {actual})")]
    NotEnoughParticipants { required: usize, actual: usize },

    #[error("reveal for round {round} is no longer pending")]
    StaleReveal { round: u64 },

    #[error("room not found")]
    RoomNotFound,
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::InvalidName | SessionError::ValueNotInDeck(_) => {
                ErrorCategory::InvalidInput
            }
            SessionError::NotAParticipant
            | SessionError::WrongPhase { .. }
            | SessionError::NotEnoughParticipants { .. } => ErrorCategory::InvalidForPhase,
            SessionError::StaleReveal { .. } | SessionError::RoomNotFound => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}

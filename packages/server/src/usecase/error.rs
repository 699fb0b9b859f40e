//! UseCase 層のエラー

use thiserror::Error;

use crate::domain::SessionError;

/// コマンド適用のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// 前提条件を満たさずルームの状態が変更されなかった
    #[error("command rejected: {0}")]
    Rejected(#[from] SessionError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}

//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::time::Duration;

use async_trait::async_trait;

use super::{
    RoomCommand, RoomId, RoomSession, SessionError, Timestamp, Transition, error::RepositoryError,
};

/// Room Repository trait
///
/// ルーム ID から RoomSession へのレジストリ。各ルームの状態は完全に独立している。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// コマンドをルームに適用する
    ///
    /// 未知のルーム ID への `Join` は新しいルームを作成する。
    /// それ以外のコマンドが未知のルームを指す場合は `SessionError::RoomNotFound`。
    async fn apply(
        &self,
        room_id: &RoomId,
        command: RoomCommand,
        now: Timestamp,
    ) -> Result<Transition, SessionError>;

    /// RoomSession を取得
    async fn get_room(&self, room_id: &RoomId) -> Result<RoomSession, RepositoryError>;

    /// 全てのルームを取得（ID 順）
    async fn list_rooms(&self) -> Vec<RoomSession>;

    /// 参加者がいない状態が `grace` 以上続いたルームを削除し、その ID を返す
    async fn evict_idle_rooms(&self, now: Timestamp, grace: Duration) -> Vec<RoomId>;
}

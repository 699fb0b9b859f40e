//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース。
//! ワイヤフォーマットへの変換は実装側（Infrastructure 層）の責務。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ParticipantId, RoomEvent, error::MessagePushError};

/// クライアントへの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録
    async fn register_client(&self, participant_id: ParticipantId, sender: PusherChannel);

    /// クライアントの登録を解除
    async fn unregister_client(&self, participant_id: &ParticipantId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        participant_id: &ParticipantId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信
    ///
    /// 一部のクライアントへの送信失敗は許容する。
    async fn broadcast(
        &self,
        targets: &[ParticipantId],
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;
}

//! UseCase: 参加者接続処理
//!
//! WebSocket 接続ごとに ParticipantId を払い出し、送信チャンネルを MessagePusher に登録する。
//! ルームへの参加（名前の登録）は接続後の `join` メッセージで行う。

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, ParticipantIdFactory, PusherChannel};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// この接続の間だけ有効な ParticipantId
    pub async fn execute(&self, sender: PusherChannel) -> ParticipantId {
        let participant_id = ParticipantIdFactory::generate();
        self.message_pusher
            .register_client(participant_id, sender)
            .await;
        participant_id
    }
}

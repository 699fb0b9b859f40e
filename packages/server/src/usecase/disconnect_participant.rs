//! UseCase: 参加者切断処理
//!
//! 接続が閉じたら、その参加者をルームから外して残りの参加者に最新の状態を届け、
//! 送信チャンネルの登録を解除する。

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, RoomCommand, RoomId};

use super::dispatch_command::DispatchCommandUseCase;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// leave の適用と通知
    dispatcher: DispatchCommandUseCase,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, dispatcher: DispatchCommandUseCase) -> Self {
        Self {
            message_pusher,
            dispatcher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 参加者がルームから外れた場合は `true`。
    /// join する前に切断した接続では `false`（登録解除だけ行う）。
    pub async fn execute(&self, room_id: &RoomId, participant_id: ParticipantId) -> bool {
        let left = self
            .dispatcher
            .execute(room_id, RoomCommand::Leave { participant_id })
            .await
            .is_ok();

        self.message_pusher.unregister_client(&participant_id).await;
        left
    }
}

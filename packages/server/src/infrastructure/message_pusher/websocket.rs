//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - ドメインイベントを JSON テキストフレームに変換して送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, ParticipantId, PusherChannel, RoomEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ParticipantId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// 登録中のクライアント数
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, participant_id: ParticipantId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(participant_id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", participant_id);
    }

    async fn unregister_client(&self, participant_id: &ParticipantId) {
        let mut clients = self.clients.lock().await;
        clients.remove(participant_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", participant_id);
    }

    async fn push_to(
        &self,
        participant_id: &ParticipantId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let payload = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(participant_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(participant_id.to_string()))?;
        sender
            .send(payload)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", participant_id);

        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ParticipantId],
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let payload = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(payload.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }
        tracing::debug!("Broadcasted message to {} client(s)", targets.len());

        Ok(())
    }
}

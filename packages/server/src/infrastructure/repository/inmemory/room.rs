//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセス再起動で状態は失われます。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    RepositoryError, RoomCommand, RoomId, RoomPolicy, RoomRepository, RoomSession, SessionError,
    Timestamp, Transition,
};

/// インメモリ Room Repository 実装
///
/// ルーム ID ごとに RoomSession を保持する。
/// 新しく作られるルームには全て同じ `RoomPolicy` が適用される。
pub struct InMemoryRoomRepository {
    /// ルーム ID → RoomSession
    rooms: Mutex<HashMap<RoomId, RoomSession>>,
    /// 新規ルームに適用するポリシー
    policy: RoomPolicy,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(policy: RoomPolicy) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            policy,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn apply(
        &self,
        room_id: &RoomId,
        command: RoomCommand,
        now: Timestamp,
    ) -> Result<Transition, SessionError> {
        let mut rooms = self.rooms.lock().await;

        if let Some(session) = rooms.get_mut(room_id) {
            return session.apply(command, now);
        }

        if !matches!(command, RoomCommand::Join { .. }) {
            return Err(SessionError::RoomNotFound);
        }

        // 参加に成功した場合のみルームを登録する
        let mut session = RoomSession::new(room_id.clone(), now, self.policy.clone());
        let transition = session.apply(command, now)?;
        rooms.insert(room_id.clone(), session);
        tracing::info!("Room '{}' created", room_id);

        Ok(transition)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<RoomSession, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn list_rooms(&self) -> Vec<RoomSession> {
        let rooms = self.rooms.lock().await;
        let mut sessions: Vec<RoomSession> = rooms.values().cloned().collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        sessions
    }

    async fn evict_idle_rooms(&self, now: Timestamp, grace: Duration) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().await;
        let idle: Vec<RoomId> = rooms
            .values()
            .filter(|session| session.is_idle(now, grace))
            .map(|session| session.id.clone())
            .collect();

        for room_id in &idle {
            rooms.remove(room_id);
        }

        idle
    }
}

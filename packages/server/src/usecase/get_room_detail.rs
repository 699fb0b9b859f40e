//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, RoomSession};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// # Arguments
    ///
    /// * `room_id` - パスから受け取ったルーム ID（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSession)` - ルームの現在の状態
    /// * `Err(GetRoomDetailError::RoomNotFound)` - ID が不正、またはルームが存在しない
    pub async fn execute(&self, room_id: String) -> Result<RoomSession, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_id)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}

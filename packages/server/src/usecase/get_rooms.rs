//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomSession};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全てのルームを ID 順で返す
    pub async fn execute(&self) -> Vec<RoomSession> {
        self.repository.list_rooms().await
    }
}

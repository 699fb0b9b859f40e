//! UseCase: 空きルームの削除
//!
//! 参加者がいない状態が猶予期間を超えたルームをレジストリから取り除く。
//! 猶予期間中に誰かが参加し直せばルームはそのまま使われる。

use std::{sync::Arc, time::Duration};

use mitsumori_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// 空きルーム削除のユースケース
pub struct EvictIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    /// 空になってから削除するまでの猶予
    grace: Duration,
}

impl EvictIdleRoomsUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        grace: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            grace,
        }
    }

    /// 猶予期間
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// 削除したルームの ID を返す
    pub async fn execute(&self) -> Vec<RoomId> {
        let now = Timestamp::new(self.clock.now_millis());
        let evicted = self.repository.evict_idle_rooms(now, self.grace).await;
        for room_id in &evicted {
            tracing::info!(
                "Room '{}' evicted after {:?} without participants",
                room_id,
                self.grace
            );
        }
        evicted
    }
}

//! UseCase layer
//!
//! 参加者の操作ごとにユースケースを 1 つ用意し、Repository と MessagePusher を組み合わせる。

mod connect_participant;
mod disconnect_participant;
mod dispatch_command;
mod error;
mod evict_idle_rooms;
mod get_room_detail;
mod get_rooms;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatch_command::DispatchCommandUseCase;
pub use error::{DispatchError, GetRoomDetailError};
pub use evict_idle_rooms::EvictIdleRoomsUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;

//! Domain layer
//!
//! プランニングポーカーのルームを表すドメインモデル。
//! 状態遷移は純粋なロジックとして実装し、I/O は trait 越しに外側の層へ委ねる。

pub mod command;
pub mod deck;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod tally;
pub mod value_object;

pub use command::RoomCommand;
pub use deck::Deck;
pub use entity::{Participant, Phase, RoundResult, Vote};
pub use error::{
    ErrorCategory, MessagePushError, RepositoryError, SessionError, ValueObjectError,
};
pub use event::{RoomEvent, RoomSnapshot, Transition};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use session::{PendingReveal, RoomPolicy, RoomSession};
pub use tally::average_of;
pub use value_object::{DisplayName, ParticipantId, ParticipantIdFactory, RoomId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;

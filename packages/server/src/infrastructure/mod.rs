//! Infrastructure layer
//!
//! ドメイン層が定義する trait の具体的な実装と、ワイヤフォーマット（DTO）。

pub mod dto;
pub mod message_pusher;
pub mod repository;

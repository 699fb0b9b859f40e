//! Planning poker room server library.
//!
//! Participants join a room over WebSocket, vote on an estimate, and every
//! member of the room receives the same ordered stream of state updates.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

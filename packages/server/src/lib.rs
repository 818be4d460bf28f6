//! Hiroba: room broadcast relay over WebSocket.
//!
//! Authenticated clients join named rooms and exchange messages. Every message
//! is persisted exactly once before it is fanned out to the room's current
//! members.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

//! Data Transfer Objects (DTOs) for the relay.
//!
//! - `websocket`: WebSocket frame DTOs (JSON object per frame)
//! - `conversion`: conversions between DTOs and domain types

pub mod conversion;
pub mod websocket;

//! WebSocket frame DTOs.
//!
//! Field names follow the wire protocol (`roomId`, `userId`), so every struct
//! variant renames its fields to camelCase.

use serde::{Deserialize, Serialize};

/// Inbound command frame, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String },
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, message: String },
    /// Any `type` this relay does not know about.
    #[serde(other)]
    Unrecognized,
}

/// Outbound frame, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    #[serde(rename_all = "camelCase")]
    Connected { user_id: String },
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: String },
    #[serde(rename_all = "camelCase")]
    ReceiveMessage {
        id: String,
        message: String,
        sender: String,
        room_id: String,
        /// RFC 3339 (UTC)
        timestamp: String,
    },
    Error { message: String },
}

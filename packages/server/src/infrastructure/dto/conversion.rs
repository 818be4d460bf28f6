//! Conversion logic between DTOs and domain types.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{Command, MessageContent, ProtocolError, RoomId, ServerEvent};
use crate::infrastructure::dto::websocket::{ClientFrame, ServerFrame};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientFrame> for Command {
    type Error = ProtocolError;

    fn try_from(frame: ClientFrame) -> Result<Self, Self::Error> {
        let command = match frame {
            ClientFrame::JoinRoom { room_id } => Command::JoinRoom {
                room_id: RoomId::new(room_id)?,
            },
            ClientFrame::LeaveRoom { room_id } => Command::LeaveRoom {
                room_id: RoomId::new(room_id)?,
            },
            ClientFrame::SendMessage { room_id, message } => Command::SendMessage {
                room_id: RoomId::new(room_id)?,
                content: MessageContent::new(message)?,
            },
            ClientFrame::Unrecognized => Command::Unrecognized,
        };
        Ok(command)
    }
}

/// Decode one inbound text frame into a typed command.
pub fn decode_command(text: &str) -> Result<Command, ProtocolError> {
    let frame: ClientFrame =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    Command::try_from(frame)
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ServerEvent> for ServerFrame {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Connected { user_id } => ServerFrame::Connected {
                user_id: user_id.as_str().to_string(),
            },
            ServerEvent::RoomJoined { room_id } => ServerFrame::RoomJoined {
                room_id: room_id.as_str().to_string(),
            },
            ServerEvent::MessageReceived(message) => ServerFrame::ReceiveMessage {
                id: message.id.to_string(),
                message: message.content.as_str().to_string(),
                sender: message.sender.as_str().to_string(),
                room_id: message.room_id.as_str().to_string(),
                timestamp: timestamp_to_rfc3339(message.created_at.value()),
            },
            ServerEvent::Error { message } => ServerFrame::Error {
                message: message.clone(),
            },
        }
    }
}

/// Encode an outbound event as a JSON text frame.
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerFrame::from(event))
}

//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Tags and fields are
//! camelCase on the wire (`createRoom`, `roomUsers`, `avatarColor`).

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Client → Server message
///
/// Every variant except the connection lifecycle itself; each one is
/// answered with exactly one acknowledgment.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Create a new room and become its first member
    CreateRoom,
    /// Join an existing room by code (case-insensitive)
    JoinRoom { room_code: String },
    /// Send a chat message to the current room
    Message { text: String },
    /// Leave the current room
    LeaveRoom,
}

/// A chat message as delivered to room members
///
/// Ephemeral: constructed once per send, broadcast to the other
/// members, and echoed back to the sender inside the acknowledgment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Sender's connection identifier
    pub from: String,
    /// Message text, already truncated to the configured maximum
    pub text: String,
    /// Send time, Unix epoch milliseconds
    pub ts: u64,
    /// Sender's display color
    pub avatar_color: String,
}

impl ChatMessage {
    /// Build a message stamped with the current time
    pub fn new(from: String, text: String, avatar_color: String) -> Self {
        Self {
            from,
            text,
            ts: epoch_ms(),
            avatar_color,
        }
    }
}

/// Current time as Unix epoch milliseconds
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Server → Client message
///
/// Acknowledgments (`RoomCreated`, `RoomJoined`, `MessageAck`,
/// `RoomLeft`, `Error`) answer exactly one inbound event; the rest are
/// room events fanned out to members.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Connection established, identifier issued
    Connected { client_id: String },
    /// Room created; creator is the sole member
    RoomCreated { room: String, count: usize },
    /// Room joined successfully
    RoomJoined { room: String, count: usize },
    /// Message accepted; `msg` is the payload the others received
    MessageAck { msg: ChatMessage },
    /// Left the current room
    RoomLeft,
    /// Current member count of the room
    RoomUsers { count: usize },
    /// System notice ("<id> joined", "<id> left", ...)
    SystemMessage { text: String },
    /// Chat message from another member
    Message(ChatMessage),
    /// An event failed
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerMessage::Error
///
/// One per recoverable failure of the event handlers, plus a generic
/// code for anything unexpected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// Join attempted without a room code
    MissingCode,
    /// Room already at capacity
    RoomFull,
    /// Message or leave attempted outside a room
    NotInRoom,
    /// Too many messages within the rate window
    RateLimited,
    /// Message text empty after truncation
    EmptyMessage,
    /// Unexpected internal failure
    InternalFault,
}

/// Convert AppError to the error acknowledgment
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::MissingCode => ErrorCode::MissingCode,
            AppError::RoomFull => ErrorCode::RoomFull,
            AppError::NotInRoom => ErrorCode::NotInRoom,
            AppError::RateLimited => ErrorCode::RateLimited,
            AppError::EmptyMessage => ErrorCode::EmptyMessage,
            // Transport-level failures never leak details to the client
            AppError::WebSocket(_) | AppError::Json(_) | AppError::Io(_) | AppError::ChannelSend => {
                return ServerMessage::Error {
                    code: ErrorCode::InternalFault,
                    message: "Server error".to_string(),
                };
            }
        };
        let message = err.to_string();
        ServerMessage::Error { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize() {
        let json = r#"{"type": "joinRoom", "roomCode": "abc123"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::JoinRoom { room_code } => assert_eq!(room_code, "abc123"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_client_message_unit_variant() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "createRoom"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::CreateRoom));
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::RoomUsers { count: 3 };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"roomUsers\""));
        assert!(json.contains("\"count\":3"));
    }

    #[test]
    fn test_chat_message_serializes_flat() {
        let msg = ServerMessage::Message(ChatMessage::new(
            "sender".to_string(),
            "hi".to_string(),
            "#f44336".to_string(),
        ));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"message\""));
        assert!(json.contains("\"from\":\"sender\""));
        assert!(json.contains("\"avatarColor\":\"#f44336\""));
    }

    #[test]
    fn test_error_code_serialize() {
        let msg = ServerMessage::Error {
            code: ErrorCode::RateLimited,
            message: "Test".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"code\":\"rateLimited\""));
    }

    #[test]
    fn test_error_ack_from_app_error() {
        let msg = ServerMessage::from(AppError::RoomFull);
        match msg {
            ServerMessage::Error { code, message } => {
                assert!(matches!(code, ErrorCode::RoomFull));
                assert_eq!(message, "Room full");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_internal_errors_stay_generic() {
        let msg = ServerMessage::from(AppError::ChannelSend);
        match msg {
            ServerMessage::Error { code, message } => {
                assert!(matches!(code, ErrorCode::InternalFault));
                assert_eq!(message, "Server error");
            }
            _ => panic!("Wrong variant"),
        }
    }
}

//! Error types for the chat relay
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and recoverable
/// protocol errors that are answered with an error acknowledgment and
/// leave the connection usable.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Join attempted without a room code
    #[error("Missing code")]
    MissingCode,

    /// Join attempted on a room at capacity
    #[error("Room full")]
    RoomFull,

    /// Message or leave attempted while not joined to any room
    #[error("Not in room")]
    NotInRoom,

    /// Message attempted exceeding the burst budget within the window
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Message text empty after truncation
    #[error("Empty message")]
    EmptyMessage,
}

/// Message send errors
///
/// Occurs when offering a message to a client's outbound queue.
/// Delivery is best-effort: both cases are logged and skipped rather
/// than propagated.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The client's outbound queue is full
    #[error("Outbound queue full")]
    QueueFull,
}

//! Client struct definition
//!
//! Per-connection state: identifier, outbound message queue, display
//! color, and current room membership.

use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::{ClientId, RoomCode};

/// Display color palette
///
/// One color is drawn per connection and stays fixed for its lifetime.
pub const AVATAR_COLORS: [&str; 10] = [
    "#f44336", "#e91e63", "#9c27b0", "#673ab7", "#3f51b5",
    "#2196f3", "#009688", "#4caf50", "#ff9800", "#795548",
];

/// Connected client information
///
/// Created at connect time and destroyed at disconnect. `room` is the
/// session state: `None` means unjoined, `Some(code)` means currently
/// a member of that room.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Server → Client message queue
    pub sender: mpsc::Sender<ServerMessage>,
    /// Display color, immutable for the connection's life
    pub avatar_color: &'static str,
    /// Code of the room this client is currently in, if any
    pub room: Option<RoomCode>,
}

impl Client {
    /// Create a new client with a randomly assigned display color
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        let avatar_color = AVATAR_COLORS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(AVATAR_COLORS[0]);
        Self {
            id,
            sender,
            avatar_color,
            room: None,
        }
    }

    /// Offer a message to this client's outbound queue
    ///
    /// Non-blocking: a full queue or a disconnected client yields an
    /// error immediately instead of stalling the caller.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => SendError::QueueFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}

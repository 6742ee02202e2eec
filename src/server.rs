//! ChatServer Actor implementation
//!
//! The central actor that owns all shared state: connected clients,
//! the room registry, and the rate limiter. Uses the Actor pattern
//! with mpsc channels for message passing; because every command is
//! processed on this one task, registry mutations from different
//! connections are serialized and membership races cannot happen.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::client::Client;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::message::{ChatMessage, ServerMessage};
use crate::rate_limit::RateLimiter;
use crate::registry::RoomRegistry;
use crate::types::{ClientId, RoomCode};

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect {
        client_id: ClientId,
    },
    /// Create a new room
    CreateRoom {
        client_id: ClientId,
    },
    /// Join an existing room by code
    JoinRoom {
        client_id: ClientId,
        room_code: String,
    },
    /// Send a chat message to the current room
    Message {
        client_id: ClientId,
        text: String,
    },
    /// Leave the current room
    LeaveRoom {
        client_id: ClientId,
    },
}

/// The main ChatServer actor
///
/// Manages all state and processes commands from connection handlers.
pub struct ChatServer {
    /// All connected clients: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    /// Room code -> member set mapping
    registry: RoomRegistry,
    /// Per-connection message rate limiting
    rate_limiter: RateLimiter,
    /// Relay limits
    config: ServerConfig,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the default limits
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_config(receiver, ServerConfig::default())
    }

    /// Create a new ChatServer with explicit limits
    pub fn with_config(receiver: mpsc::Receiver<ServerCommand>, config: ServerConfig) -> Self {
        Self {
            clients: HashMap::new(),
            registry: RoomRegistry::new(config.room_capacity),
            rate_limiter: RateLimiter::new(config.rate_limit_burst, config.rate_limit_window),
            config,
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    ///
    /// The match arms are the acknowledgment boundary: every fallible
    /// event is answered exactly once, with the handler's success ack
    /// or with the error ack built here from its `Err`.
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::CreateRoom { client_id } => {
                if let Err(err) = self.handle_create_room(client_id) {
                    self.send_error(client_id, err);
                }
            }
            ServerCommand::JoinRoom { client_id, room_code } => {
                if let Err(err) = self.handle_join_room(client_id, &room_code) {
                    self.send_error(client_id, err);
                }
            }
            ServerCommand::Message { client_id, text } => {
                if let Err(err) = self.handle_message(client_id, text) {
                    self.send_error(client_id, err);
                }
            }
            ServerCommand::LeaveRoom { client_id } => {
                if let Err(err) = self.handle_leave_room(client_id) {
                    self.send_error(client_id, err);
                }
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        info!("Client {} connected", client_id);
        self.clients.insert(client_id, Client::new(client_id, sender));
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.registry.room_count()
        );
    }

    /// Handle client disconnection
    ///
    /// Runs unconditionally when a connection drops: leaves the current
    /// room (a no-op if unjoined), releases the rate window, removes
    /// the client record. No acknowledgment — the connection is gone.
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        self.leave_current_room(client_id, "disconnected");
        self.rate_limiter.release(client_id);
        self.clients.remove(&client_id);

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.registry.room_count()
        );
    }

    /// Handle room creation
    fn handle_create_room(&mut self, client_id: ClientId) -> Result<(), AppError> {
        if !self.clients.contains_key(&client_id) {
            return Ok(());
        }

        // At most one membership per connection: creating while in a
        // room leaves the old one first.
        self.leave_current_room(client_id, "left");

        let code = self.registry.create_room();
        let count = self.registry.join(&code, client_id)?;
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.room = Some(code.clone());
        }

        info!("Client {} created room {}", client_id, code);

        self.send_to(
            client_id,
            ServerMessage::RoomCreated {
                room: code.to_string(),
                count,
            },
        );
        self.broadcast_all(&code, ServerMessage::RoomUsers { count });
        Ok(())
    }

    /// Handle room joining
    fn handle_join_room(&mut self, client_id: ClientId, room_code: &str) -> Result<(), AppError> {
        if !self.clients.contains_key(&client_id) {
            return Ok(());
        }

        let trimmed = room_code.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingCode);
        }
        let code = RoomCode::from_string(trimmed);

        // Capacity pre-check before any state change, so a failed join
        // mutates no membership anywhere.
        if !self.registry.has_capacity(&code) {
            return Err(AppError::RoomFull);
        }

        self.leave_current_room(client_id, "left");

        self.registry.ensure_room(&code);
        let count = self.registry.join(&code, client_id)?;
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.room = Some(code.clone());
        }

        info!("Client {} joined room {}", client_id, code);

        self.send_to(
            client_id,
            ServerMessage::RoomJoined {
                room: code.to_string(),
                count,
            },
        );
        self.broadcast_all(&code, ServerMessage::RoomUsers { count });
        self.broadcast_all(
            &code,
            ServerMessage::SystemMessage {
                text: format!("{} joined", client_id),
            },
        );
        Ok(())
    }

    /// Handle a chat message
    ///
    /// Check order matters: membership, then rate limit, then text
    /// validation — a rate-limit slot is consumed even when the text
    /// turns out to be empty.
    fn handle_message(&mut self, client_id: ClientId, text: String) -> Result<(), AppError> {
        let Some(client) = self.clients.get(&client_id) else {
            return Ok(());
        };
        let room = client.room.clone().ok_or(AppError::NotInRoom)?;
        let avatar_color = client.avatar_color;

        if !self.rate_limiter.try_admit(client_id) {
            return Err(AppError::RateLimited);
        }

        let text = truncate_chars(text, self.config.max_message_len);
        if text.trim().is_empty() {
            return Err(AppError::EmptyMessage);
        }

        let msg = ChatMessage::new(client_id.to_string(), text, avatar_color.to_string());

        // The sender gets the payload via the ack only, never via the
        // broadcast channel.
        self.broadcast_except(&room, ServerMessage::Message(msg.clone()), client_id);
        self.send_to(client_id, ServerMessage::MessageAck { msg });
        Ok(())
    }

    /// Handle voluntary room leaving
    fn handle_leave_room(&mut self, client_id: ClientId) -> Result<(), AppError> {
        if !self.clients.contains_key(&client_id) {
            return Ok(());
        }

        let Some(room) = self.clients.get(&client_id).and_then(|c| c.room.clone()) else {
            return Err(AppError::NotInRoom);
        };

        self.leave_current_room(client_id, "left");
        info!("Client {} left room {}", client_id, room);

        self.send_to(client_id, ServerMessage::RoomLeft);
        Ok(())
    }

    /// Helper: remove a client from its current room and notify the
    /// remaining members with the new count and a system notice.
    ///
    /// Returns the remaining count, or None if the client was unjoined.
    fn leave_current_room(&mut self, client_id: ClientId, notice: &str) -> Option<usize> {
        let room = self.clients.get_mut(&client_id)?.room.take()?;
        let count = self.registry.leave(&room, client_id);

        self.broadcast_all(&room, ServerMessage::RoomUsers { count });
        self.broadcast_all(
            &room,
            ServerMessage::SystemMessage {
                text: format!("{} {}", client_id, notice),
            },
        );
        Some(count)
    }

    /// Deliver a message to every current member of a room
    fn broadcast_all(&self, code: &RoomCode, msg: ServerMessage) {
        self.broadcast(code, msg, None);
    }

    /// Deliver a message to every current member except the sender
    fn broadcast_except(&self, code: &RoomCode, msg: ServerMessage, sender: ClientId) {
        self.broadcast(code, msg, Some(sender));
    }

    /// Best-effort fan-out over the room's member snapshot
    ///
    /// A full or closed recipient queue is skipped; one slow member
    /// never blocks delivery to the rest.
    fn broadcast(&self, code: &RoomCode, msg: ServerMessage, skip: Option<ClientId>) {
        for member_id in self.registry.members(code) {
            if Some(member_id) == skip {
                continue;
            }
            let Some(member) = self.clients.get(&member_id) else {
                continue;
            };
            if let Err(e) = member.send(msg.clone()) {
                debug!("Dropping broadcast for {}: {}", member_id, e);
            }
        }
    }

    /// Send a message to a single client, best-effort
    fn send_to(&self, client_id: ClientId, msg: ServerMessage) {
        if let Some(client) = self.clients.get(&client_id) {
            if let Err(e) = client.send(msg) {
                debug!("Dropping message for {}: {}", client_id, e);
            }
        }
    }

    /// Boundary adapter for handler errors: one error ack to the caller
    fn send_error(&self, client_id: ClientId, err: AppError) {
        debug!("Client {} request failed: {}", client_id, err);
        self.send_to(client_id, ServerMessage::from(err));
    }
}

/// Truncate to at most `max` characters, preserving char boundaries
fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

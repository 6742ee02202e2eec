//! Ephemeral Room-Based WebSocket Chat Relay
//!
//! Clients create or join short-lived rooms identified by a random
//! 6-character code and exchange text messages broadcast to the other
//! room members. Nothing is persisted: rooms, memberships, and rate
//! windows live in process memory for the lifetime of each connection.
//!
//! # Features
//! - Room creation with 6-character codes, case-insensitive join
//! - Capacity-bounded rooms, garbage-collected when they empty
//! - Message fan-out to all other members, ack echo to the sender
//! - Per-connection sliding-window rate limiting
//! - Per-connection display colors
//! - Disconnection cleanup
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning all shared state
//!   (clients, room registry, rate limiter)
//! - Each connection has a `handler` task communicating with the actor
//! - No locks needed - all state access goes through message passing,
//!   which also serializes room mutations from concurrent connections
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use room_relay::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod rate_limit;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use config::ServerConfig;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::{ChatMessage, ClientMessage, ErrorCode, ServerMessage};
pub use rate_limit::RateLimiter;
pub use registry::RoomRegistry;
pub use room::Room;
pub use server::{ChatServer, ServerCommand};
pub use types::{ClientId, RoomCode};

//! Server configuration
//!
//! The tunable limits of the relay, injectable so tests can run small
//! rooms and tight rate limits without touching the defaults.

use std::time::Duration;

/// Relay limits
///
/// Passed to `ChatServer` at construction; `Default` carries the
/// production values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum members per room
    pub room_capacity: usize,
    /// Maximum message length in characters (longer text is truncated)
    pub max_message_len: usize,
    /// Messages admitted per connection within one rate window
    pub rate_limit_burst: usize,
    /// Trailing window for the rate limit
    pub rate_limit_window: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            room_capacity: 100,
            max_message_len: 2000,
            rate_limit_burst: 5,
            rate_limit_window: Duration::from_millis(10_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = ServerConfig::default();
        assert_eq!(config.room_capacity, 100);
        assert_eq!(config.max_message_len, 2000);
        assert_eq!(config.rate_limit_burst, 5);
        assert_eq!(config.rate_limit_window, Duration::from_secs(10));
    }
}

//! Per-connection message rate limiting
//!
//! Sliding-window counter: each connection gets a vector of recent
//! send timestamps, pruned lazily on every attempt. Memory stays
//! bounded at one timestamp per admitted message within the window,
//! and the whole window is discarded on disconnect.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::ClientId;

/// Sliding-window rate limiter keyed by connection
#[derive(Debug)]
pub struct RateLimiter {
    /// Recent send timestamps per connection
    windows: HashMap<ClientId, Vec<Instant>>,
    /// Admitted messages per window
    burst: usize,
    /// Trailing window length
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter admitting `burst` messages per `window`
    pub fn new(burst: usize, window: Duration) -> Self {
        Self {
            windows: HashMap::new(),
            burst,
            window,
        }
    }

    /// Decide whether a send is admitted right now
    ///
    /// Admission records the attempt; rejection leaves the window
    /// untouched, so a client spamming into the limit does not extend
    /// its own penalty.
    pub fn try_admit(&mut self, client_id: ClientId) -> bool {
        self.admit_at(client_id, Instant::now())
    }

    /// Clock-injected admission check, shared with tests
    fn admit_at(&mut self, client_id: ClientId, now: Instant) -> bool {
        let window = self.window;
        let stamps = self.windows.entry(client_id).or_default();
        stamps.retain(|t| now.duration_since(*t) < window);
        if stamps.len() >= self.burst {
            return false;
        }
        stamps.push(now);
        true
    }

    /// Drop a connection's window entirely (disconnect cleanup)
    pub fn release(&mut self, client_id: ClientId) {
        self.windows.remove(&client_id);
    }

    /// Number of connections currently tracked
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

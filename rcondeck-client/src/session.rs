//! Session state
//!
//! The single mutable model of the dashboard. Only the dispatcher writes to
//! it; rendering reads it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of lines kept in the log
pub const LOG_CAPACITY: usize = 500;

/// Rolling log with FIFO eviction
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
        }
    }

    /// Append a line, dropping the oldest when full
    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The most recent `count` lines, oldest first
    pub fn tail(&self, count: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Transient status line text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub set_at: Instant,
    /// Held until replaced; a request is still in flight
    pub in_progress: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Name of the server commands go to
    pub active_server: Option<String>,
    pub log: LogBuffer,
    pub status: Option<StatusMessage>,
    /// Registry index of the active server
    pub selection_index: usize,
    pub viewport: Viewport,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: now,
            in_progress: false,
        });
    }

    /// Status for a launched request; never expires, the result replaces it
    pub fn set_progress_status(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: now,
            in_progress: true,
        });
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    /// Clear a finished status once it is older than `ttl`; returns true if cleared
    pub fn expire_status(&mut self, now: Instant, ttl: Duration) -> bool {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|s| !s.in_progress && now.saturating_duration_since(s.set_at) >= ttl);
        if expired {
            self.status = None;
        }
        expired
    }
}

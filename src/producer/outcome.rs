//! Result of a publish call

use crate::broker::error::ResolveError;
use crate::producer::error::TransportError;
use std::fmt;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// How a publish call ended
///
/// Only `Status(200)` means the broker accepted the message.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The broker answered with this HTTP status
    Status(u16),
    /// No HTTP response could be obtained from the cached broker
    Transport(TransportError),
    /// Re-resolution after a transport failure found no master
    Resolution(ResolveError),
    /// The queue name was refused before any I/O
    InvalidQueue(String),
    /// `publish` was called on a producer that never initialized
    NotInitialized,
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Status(STATUS_OK))
    }

    /// Collapse to a single status code for callers that only understand HTTP codes
    pub fn legacy_status(&self) -> u16 {
        match self {
            PublishOutcome::Status(code) => *code,
            PublishOutcome::InvalidQueue(_) => STATUS_BAD_REQUEST,
            PublishOutcome::Transport(_)
            | PublishOutcome::Resolution(_)
            | PublishOutcome::NotInitialized => STATUS_INTERNAL_ERROR,
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Status(code) => write!(f, "broker answered HTTP {}", code),
            PublishOutcome::Transport(e) => write!(f, "transport error: {}", e),
            PublishOutcome::Resolution(e) => write!(f, "resolution error: {}", e),
            PublishOutcome::InvalidQueue(reason) => write!(f, "invalid queue: {}", reason),
            PublishOutcome::NotInitialized => write!(f, "producer is not initialized"),
        }
    }
}

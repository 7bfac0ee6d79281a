//! Producer Error Types

use crate::broker::error::ResolveError;

/// Failure to complete an HTTP exchange with the broker
///
/// Covers connection refused, timeouts and I/O errors. An HTTP response
/// with a non-200 status is not a transport error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {cause}")]
    Request { url: String, cause: String },

    #[error("HTTP client could not be created: {cause}")]
    Client { cause: String },
}

/// Errors from producer construction and initialization
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProducerError {
    /// No active broker could be found at startup; the producer is unusable
    #[error("Failed to locate an active broker: {0}")]
    Initialization(#[source] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Resolver(#[from] ResolveError),
}

impl crate::core::error_handling::ContextualError for ProducerError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type ProducerResult<T> = Result<T, ProducerError>;

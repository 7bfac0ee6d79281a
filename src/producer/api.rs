//! Public API for the queue producer
//!
//! External modules should import from here rather than from the
//! individual submodules.

pub use crate::producer::active_url::{ActiveSnapshot, ActiveUrlCell};
pub use crate::producer::config::{ProducerConfig, PublishPolicy, DEFAULT_MAX_ATTEMPTS};
pub use crate::producer::error::{ProducerError, ProducerResult, TransportError};
pub use crate::producer::outcome::{
    PublishOutcome, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_OK,
};
pub use crate::producer::producer::{QueueProducer, MESSAGE_CONTENT_TYPE};
pub use crate::producer::transport::{BrokerTransport, HttpTransport, DEFAULT_REQUEST_TIMEOUT_SECS};

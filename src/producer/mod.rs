//! Queue producer with active-broker failover
//!
//! The producer caches the URL of the broker currently believed to be
//! master and posts each message there. When the broker cannot be reached
//! and more than one candidate is configured, the active master is resolved
//! again and, budget permitting, the message is retried against it.
//!
//! ```rust,no_run
//! use mqproducer::broker::api::{parse_endpoint_list, Credentials};
//! use mqproducer::producer::api::{ProducerConfig, QueueProducer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoints = parse_endpoint_list(&["broker1:8161,broker2:8161"])?;
//! let config = ProducerConfig::new(Credentials::new("admin", "admin"), endpoints);
//!
//! let producer = QueueProducer::with_http(config)?;
//! producer.initialize().await?; // fatal when no master is found
//!
//! let outcome = producer.publish(br#"{"x":1}"#, "test").await;
//! println!("{} ({})", outcome.legacy_status(), outcome);
//! # Ok(())
//! # }
//! ```

pub mod active_url;
pub mod api;
pub mod config;
pub mod error;
pub mod outcome;
#[allow(clippy::module_inception)]
pub mod producer;
pub mod transport;

#[cfg(test)]
mod tests;

//! Broker cluster description and active-master resolution
//!
//! A cluster is a fixed, ordered list of `host:port` candidates plus one set
//! of credentials. Exactly one candidate is master at any time; the
//! [`resolver`] module finds it and renders the publish URL for it from a
//! [`template::BrokerUrlTemplate`].
//!
//! ```rust,no_run
//! use mqproducer::broker::api::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoints = parse_endpoint_list(&["broker1:8161, broker2:8161"])?;
//! let credentials = Credentials::new("admin", "admin");
//! let resolver = JolokiaResolver::new(DEFAULT_PROBE_PATH, Duration::from_secs(5))?;
//! let active = resolver
//!     .resolve_active_broker(&BrokerUrlTemplate::default(), &credentials, &endpoints)
//!     .await?;
//! println!("publishing via {}", active);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod resolver;
pub mod template;

#[cfg(test)]
mod tests;

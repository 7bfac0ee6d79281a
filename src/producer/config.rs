//! Producer configuration and publish policy

use crate::broker::api::{
    BrokerEndpoint, BrokerUrlTemplate, Credentials, DEFAULT_PROBE_PATH, DEFAULT_PROBE_TIMEOUT_SECS,
};
use crate::producer::transport::DEFAULT_REQUEST_TIMEOUT_SECS;
use std::time::Duration;

/// Attempts per publish call when nothing is configured
///
/// Two attempts let a publish that hit a dead master go through on the
/// freshly resolved one. [`PublishPolicy::single_attempt`] gives the
/// one-shot behaviour where the refreshed URL is only used by later calls.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Bound on delivery attempts for one publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishPolicy {
    max_attempts: usize,
}

impl PublishPolicy {
    /// Values below 1 are raised to 1
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn single_attempt() -> Self {
        Self::new(1)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for PublishPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Everything a producer needs, fixed for its lifetime
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub template: BrokerUrlTemplate,
    pub credentials: Credentials,
    pub endpoints: Vec<BrokerEndpoint>,
    pub policy: PublishPolicy,
    pub request_timeout: Duration,
    pub probe_path: String,
    pub probe_timeout: Duration,
}

impl ProducerConfig {
    /// Config with default template, policy and timeouts
    pub fn new(credentials: Credentials, endpoints: Vec<BrokerEndpoint>) -> Self {
        Self {
            template: BrokerUrlTemplate::default(),
            credentials,
            endpoints,
            policy: PublishPolicy::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }

    pub fn with_template(mut self, template: BrokerUrlTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_policy(mut self, policy: PublishPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Failover only makes sense with more than one candidate
    pub fn has_failover(&self) -> bool {
        self.endpoints.len() > 1
    }
}

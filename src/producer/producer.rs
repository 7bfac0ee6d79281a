//! Queue producer with broker failover
//!
//! Each `publish` call runs a small state machine:
//!
//! ```text
//! ATTEMPTING --200----------------------------> SUCCESS
//! ATTEMPTING --other status, budget left------> ATTEMPTING
//! ATTEMPTING --transport error, >1 endpoint---> RESOLVING
//! RESOLVING  --master found-------------------> ATTEMPTING (if budget left)
//! RESOLVING  --no master----------------------> FAILED
//! ATTEMPTING --budget spent-------------------> FAILED (last outcome)
//! ```

use crate::broker::api::{ActiveBrokerUrl, BrokerResolver, JolokiaResolver, ResolveError};
use crate::core::validation::validate_queue_name;
use crate::producer::active_url::{ActiveSnapshot, ActiveUrlCell};
use crate::producer::config::ProducerConfig;
use crate::producer::error::{ProducerError, ProducerResult};
use crate::producer::outcome::{PublishOutcome, STATUS_OK};
use crate::producer::transport::{BrokerTransport, HttpTransport};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Content type sent with every message, regardless of payload
pub const MESSAGE_CONTENT_TYPE: &str = "application/json";

/// Publishes messages to named queues on whichever broker is master
///
/// Safe to share between tasks (`Arc<QueueProducer>`). The active broker
/// URL is the only mutable state and lives in an [`ActiveUrlCell`].
pub struct QueueProducer {
    config: ProducerConfig,
    resolver: Arc<dyn BrokerResolver>,
    transport: Arc<dyn BrokerTransport>,
    active: ActiveUrlCell,
    resolve_lock: Mutex<()>,
}

impl QueueProducer {
    /// Build an uninitialized producer; no I/O happens here
    pub fn new(
        config: ProducerConfig,
        resolver: Arc<dyn BrokerResolver>,
        transport: Arc<dyn BrokerTransport>,
    ) -> Self {
        Self {
            config,
            resolver,
            transport,
            active: ActiveUrlCell::new(),
            resolve_lock: Mutex::new(()),
        }
    }

    /// Uninitialized producer using the Jolokia resolver and reqwest transport
    pub fn with_http(config: ProducerConfig) -> ProducerResult<Self> {
        let resolver = JolokiaResolver::new(&config.probe_path, config.probe_timeout)?;
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::new(config, Arc::new(resolver), Arc::new(transport)))
    }

    /// Construct and initialize in one step
    pub async fn connect(
        config: ProducerConfig,
        resolver: Arc<dyn BrokerResolver>,
        transport: Arc<dyn BrokerTransport>,
    ) -> ProducerResult<Self> {
        let producer = Self::new(config, resolver, transport);
        producer.initialize().await?;
        Ok(producer)
    }

    /// Resolve the active broker and cache its URL
    ///
    /// Failure here is fatal for the producer: it stays unusable and every
    /// later `publish` returns [`PublishOutcome::NotInitialized`].
    pub async fn initialize(&self) -> ProducerResult<()> {
        let _guard = self.resolve_lock.lock().await;
        log::debug!(
            "Resolving active broker among {} candidate(s)",
            self.config.endpoints.len()
        );
        let url = self
            .resolve()
            .await
            .map_err(ProducerError::Initialization)?;
        log::info!("Publishing via {}", url);
        self.active.install(url);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.active.load().is_some()
    }

    /// The URL currently cached, if initialized
    pub fn active_url(&self) -> Option<ActiveBrokerUrl> {
        self.active.load().map(|snapshot| snapshot.url.clone())
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Publish one message to `queue`
    ///
    /// The body is sent verbatim (an empty body is allowed) with content
    /// type `application/json`. Attempts stop at the first HTTP 200 or when
    /// the policy's attempt budget is spent.
    pub async fn publish(&self, message: &[u8], queue: &str) -> PublishOutcome {
        if let Err(reason) = validate_queue_name(queue) {
            log::warn!("Refusing to publish: {}", reason);
            return PublishOutcome::InvalidQueue(reason);
        }

        let max_attempts = self.config.policy.max_attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let Some(snapshot) = self.active.load() else {
                log::error!("Publish to queue '{}' before the producer was initialized", queue);
                return PublishOutcome::NotInitialized;
            };

            let outcome = self.attempt(&snapshot, message, queue).await;
            match outcome {
                PublishOutcome::Status(STATUS_OK) => return outcome,
                PublishOutcome::Status(code) => {
                    log::warn!(
                        "Broker {} answered HTTP {} for queue '{}' (attempt {}/{})",
                        snapshot.url.endpoint(),
                        code,
                        queue,
                        attempt,
                        max_attempts
                    );
                }
                PublishOutcome::Transport(ref e) => {
                    log::error!(
                        "Failed to send message to queue '{}' (attempt {}/{}): {}",
                        queue,
                        attempt,
                        max_attempts,
                        e
                    );
                    if self.config.has_failover() {
                        if let Err(resolve_err) = self.refresh(snapshot.generation).await {
                            log::error!("Failed to find an active broker: {}", resolve_err);
                            return PublishOutcome::Resolution(resolve_err);
                        }
                    }
                }
                _ => return outcome,
            }

            if attempt >= max_attempts {
                return outcome;
            }
        }
    }

    /// [`publish`](Self::publish) projected to a bare status code
    pub async fn publish_status(&self, message: &[u8], queue: &str) -> u16 {
        self.publish(message, queue).await.legacy_status()
    }

    async fn attempt(&self, snapshot: &ActiveSnapshot, message: &[u8], queue: &str) -> PublishOutcome {
        let url = snapshot.url.for_queue(queue);
        log::debug!(
            "POST {} ({} bytes)",
            snapshot.url.redacted_for_queue(queue),
            message.len()
        );
        match self
            .transport
            .post(&url, MESSAGE_CONTENT_TYPE, message.to_vec())
            .await
        {
            Ok(status) => PublishOutcome::Status(status),
            Err(e) => PublishOutcome::Transport(e),
        }
    }

    /// Re-resolve unless someone already replaced `stale_generation`
    async fn refresh(&self, stale_generation: u64) -> Result<(), ResolveError> {
        let _guard = self.resolve_lock.lock().await;
        if !self.active.is_current(stale_generation) {
            log::debug!("Active broker already refreshed by another publisher");
            return Ok(());
        }

        log::info!("Looking for a new active broker after transport failure");
        let url = self.resolve().await?;
        let snapshot = self.active.install(url);
        log::info!("Publishing via {} (generation {})", snapshot.url, snapshot.generation);
        Ok(())
    }

    async fn resolve(&self) -> Result<ActiveBrokerUrl, ResolveError> {
        self.resolver
            .resolve_active_broker(
                &self.config.template,
                &self.config.credentials,
                &self.config.endpoints,
            )
            .await
    }
}

impl std::fmt::Debug for QueueProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueProducer")
            .field("endpoints", &self.config.endpoints)
            .field("policy", &self.config.policy)
            .field("active", &self.active.load())
            .finish()
    }
}

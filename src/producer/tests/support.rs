//! Scripted resolver and transport for producer unit tests

use crate::broker::api::{
    ActiveBrokerUrl, BrokerEndpoint, BrokerResolver, BrokerUrlTemplate, Credentials, ResolveError,
    ResolveResult,
};
use crate::producer::api::{
    BrokerTransport, ProducerConfig, PublishPolicy, QueueProducer, TransportError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Resolver answering with the endpoint currently marked as master
#[derive(Default)]
pub struct ScriptedResolver {
    master: Mutex<Option<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedResolver {
    pub fn with_master(master: &str) -> Arc<Self> {
        Arc::new(Self {
            master: Mutex::new(Some(master.to_string())),
            ..Default::default()
        })
    }

    pub fn without_master() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow_with_master(master: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            master: Mutex::new(Some(master.to_string())),
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn set_master(&self, master: Option<&str>) {
        *self.master.lock().unwrap() = master.map(str::to_string);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerResolver for ScriptedResolver {
    async fn resolve_active_broker(
        &self,
        template: &BrokerUrlTemplate,
        credentials: &Credentials,
        endpoints: &[BrokerEndpoint],
    ) -> ResolveResult<ActiveBrokerUrl> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let master = self.master.lock().unwrap().clone();
        endpoints
            .iter()
            .find(|e| Some(e.to_string()) == master)
            .map(|e| template.render(credentials, e))
            .ok_or_else(|| ResolveError::NoActiveBroker {
                candidates: endpoints.len(),
                details: "scripted: no master".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerBehaviour {
    Answer(u16),
    Refuse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub url: String,
    pub host: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Transport that answers per `host:port`; unknown hosts refuse
#[derive(Default)]
pub struct ScriptedTransport {
    behaviours: Mutex<HashMap<String, BrokerBehaviour>>,
    posts: Mutex<Vec<RecordedPost>>,
}

impl ScriptedTransport {
    pub fn new(behaviours: &[(&str, BrokerBehaviour)]) -> Arc<Self> {
        let transport = Self::default();
        for (host, behaviour) in behaviours {
            transport.set(host, *behaviour);
        }
        Arc::new(transport)
    }

    pub fn set(&self, host: &str, behaviour: BrokerBehaviour) {
        self.behaviours
            .lock()
            .unwrap()
            .insert(host.to_string(), behaviour);
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.posts().into_iter().map(|p| p.host).collect()
    }
}

fn authority_host(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .to_string()
}

#[async_trait]
impl BrokerTransport for ScriptedTransport {
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<u16, TransportError> {
        let host = authority_host(url);
        self.posts.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            host: host.clone(),
            content_type: content_type.to_string(),
            body,
        });
        // Let other tasks interleave between send and answer
        tokio::task::yield_now().await;

        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(&host)
            .copied()
            .unwrap_or(BrokerBehaviour::Refuse);
        match behaviour {
            BrokerBehaviour::Answer(status) => Ok(status),
            BrokerBehaviour::Refuse => Err(TransportError::Request {
                url: format!("http://***@{}/api/message", host),
                cause: "connection refused".to_string(),
            }),
        }
    }
}

pub fn config(endpoints: &[&str], policy: PublishPolicy) -> ProducerConfig {
    let endpoints = endpoints.iter().map(|e| e.parse().unwrap()).collect();
    ProducerConfig::new(Credentials::new("admin", "admin"), endpoints).with_policy(policy)
}

pub fn producer(
    endpoints: &[&str],
    policy: PublishPolicy,
    resolver: &Arc<ScriptedResolver>,
    transport: &Arc<ScriptedTransport>,
) -> QueueProducer {
    QueueProducer::new(
        config(endpoints, policy),
        Arc::clone(resolver) as Arc<dyn BrokerResolver>,
        Arc::clone(transport) as Arc<dyn BrokerTransport>,
    )
}

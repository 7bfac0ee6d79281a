//! Active broker resolution
//!
//! ActiveMQ master/slave clusters have exactly one master at a time. The
//! [`JolokiaResolver`] asks each candidate, in configured order, whether it
//! is a slave via the Jolokia JMX bridge that ships with the web console,
//! and returns the URL of the first candidate that answers "not a slave".

use crate::broker::credentials::Credentials;
use crate::broker::endpoint::BrokerEndpoint;
use crate::broker::error::{ResolveError, ResolveResult};
use crate::broker::template::{ActiveBrokerUrl, BrokerUrlTemplate};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Jolokia read of the `Slave` attribute on every broker MBean
pub const DEFAULT_PROBE_PATH: &str =
    "/api/jolokia/read/org.apache.activemq:type=Broker,brokerName=*/Slave";

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Determines which candidate endpoint is the active master
#[async_trait]
pub trait BrokerResolver: Send + Sync {
    /// Return the publish URL of the active master, or fail when no candidate is master
    async fn resolve_active_broker(
        &self,
        template: &BrokerUrlTemplate,
        credentials: &Credentials,
        endpoints: &[BrokerEndpoint],
    ) -> ResolveResult<ActiveBrokerUrl>;
}

/// What a single candidate said about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Master,
    Slave,
    Unavailable(String),
}

#[derive(Debug, Deserialize)]
struct JolokiaReply {
    status: u16,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret a Jolokia reply body for the `Slave` attribute
///
/// Accepts both the single-MBean form (`"value": false`) and the wildcard
/// form (`"value": {"<mbean>": {"Slave": false}}`). Any broker MBean
/// reporting `Slave == false` makes the endpoint a master.
pub fn classify_probe_body(body: &str) -> ProbeVerdict {
    let reply = match serde_json::from_str::<JolokiaReply>(body) {
        Ok(reply) => reply,
        Err(e) => return ProbeVerdict::Unavailable(format!("unparseable probe reply: {}", e)),
    };

    if reply.status != 200 {
        return ProbeVerdict::Unavailable(format!(
            "probe status {}: {}",
            reply.status,
            reply.error.unwrap_or_else(|| "no error message".to_string())
        ));
    }

    match reply.value {
        Some(serde_json::Value::Bool(true)) => ProbeVerdict::Slave,
        Some(serde_json::Value::Bool(false)) => ProbeVerdict::Master,
        Some(serde_json::Value::Object(beans)) => {
            let flags: Vec<bool> = beans
                .values()
                .filter_map(|attributes| attributes.get("Slave").and_then(|v| v.as_bool()))
                .collect();
            if flags.iter().any(|slave| !slave) {
                ProbeVerdict::Master
            } else if flags.is_empty() {
                ProbeVerdict::Unavailable("no Slave attribute in probe reply".to_string())
            } else {
                ProbeVerdict::Slave
            }
        }
        _ => ProbeVerdict::Unavailable("no Slave attribute in probe reply".to_string()),
    }
}

/// Resolver that probes candidates over HTTP through Jolokia
#[derive(Debug, Clone)]
pub struct JolokiaResolver {
    client: reqwest::Client,
    probe_path: String,
}

impl JolokiaResolver {
    pub fn new(probe_path: &str, timeout: Duration) -> ResolveResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ResolveError::Client {
                cause: e.to_string(),
            })?;

        let probe_path = if probe_path.starts_with('/') {
            probe_path.to_string()
        } else {
            format!("/{}", probe_path)
        };

        Ok(Self { client, probe_path })
    }

    pub fn probe_path(&self) -> &str {
        &self.probe_path
    }

    /// Probe URL for an endpoint, using the scheme of the publish template
    pub fn probe_url(&self, template: &BrokerUrlTemplate, endpoint: &BrokerEndpoint) -> String {
        let scheme = if template.as_str().starts_with("https://") {
            "https"
        } else {
            "http"
        };
        format!("{}://{}{}", scheme, endpoint, self.probe_path)
    }

    /// Ask one candidate whether it is the master
    pub async fn probe(
        &self,
        template: &BrokerUrlTemplate,
        credentials: &Credentials,
        endpoint: &BrokerEndpoint,
    ) -> ProbeVerdict {
        let url = self.probe_url(template, endpoint);
        log::trace!("Probing broker {} at {}", endpoint, url);

        let response = match self
            .client
            .get(&url)
            .basic_auth(credentials.username(), Some(credentials.password()))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ProbeVerdict::Unavailable(format!("request failed: {}", e))
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return ProbeVerdict::Unavailable(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            ));
        }

        match response.text().await {
            Ok(body) => classify_probe_body(&body),
            Err(e) => {
                ProbeVerdict::Unavailable(format!("failed to read probe reply: {}", e))
            }
        }
    }
}

#[async_trait]
impl BrokerResolver for JolokiaResolver {
    async fn resolve_active_broker(
        &self,
        template: &BrokerUrlTemplate,
        credentials: &Credentials,
        endpoints: &[BrokerEndpoint],
    ) -> ResolveResult<ActiveBrokerUrl> {
        if endpoints.is_empty() {
            return Err(ResolveError::NoEndpoints);
        }

        let mut failures = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            match self.probe(template, credentials, endpoint).await {
                ProbeVerdict::Master => {
                    log::info!("Broker {} is the active master", endpoint);
                    return Ok(template.render(credentials, endpoint));
                }
                ProbeVerdict::Slave => {
                    log::debug!("Broker {} reports itself as slave", endpoint);
                    failures.push(format!("{}: slave", endpoint));
                }
                ProbeVerdict::Unavailable(reason) => {
                    log::warn!("Broker {} could not be probed: {}", endpoint, reason);
                    failures.push(format!("{}: {}", endpoint, reason));
                }
            }
        }

        Err(ResolveError::NoActiveBroker {
            candidates: endpoints.len(),
            details: failures.join("; "),
        })
    }
}

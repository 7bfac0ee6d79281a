//! HTTP transport used to post messages to the broker

use crate::producer::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sends one POST and reports the HTTP status, or a transport error
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// `url` may carry credentials in its user-info part; implementations
    /// must not echo it back in errors.
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<u16, TransportError>;
}

/// reqwest-backed transport
///
/// reqwest moves user-info from the URL into a basic `Authorization`
/// header. Idle connections are not kept, so every publish opens a fresh
/// connection to whichever broker is current.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::Client {
                cause: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BrokerTransport for HttpTransport {
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<u16, TransportError> {
        let target = redact_userinfo(url);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: target.clone(),
                cause: e.without_url().to_string(),
            })?;

        let status = response.status().as_u16();
        log::trace!("POST {} answered {}", target, status);
        Ok(status)
    }
}

/// Mask the password in the URL's user-info
pub(crate) fn redact_userinfo(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}

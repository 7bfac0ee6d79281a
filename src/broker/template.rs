//! Broker URL templates and the resolved active-broker URL
//!
//! A template carries named placeholders. `{user}`, `{password}` and
//! `{host}` are filled in when the active broker is resolved; `{queue}` is
//! left in place and filled per publish call.

use crate::broker::credentials::Credentials;
use crate::broker::endpoint::BrokerEndpoint;
use crate::broker::error::{BrokerError, BrokerResult};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::fmt;

/// ActiveMQ REST endpoint for posting a message to a queue
pub const DEFAULT_URL_TEMPLATE: &str =
    "http://{user}:{password}@{host}/api/message?destination=queue://{queue}&jms.closeTimeout=5000";

const QUEUE_SLOT: &str = "{queue}";
const REDACTED: &str = "***";

// RFC 3986 unreserved characters pass through; everything else is escaped
const COMPONENT_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT_ENCODE_SET).to_string()
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_]*)\}").expect("placeholder pattern is valid"));

/// Validated URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerUrlTemplate {
    template: String,
    has_credentials: bool,
}

impl BrokerUrlTemplate {
    /// Parse and validate a template
    ///
    /// `{host}` and `{queue}` must appear exactly once. `{user}` and
    /// `{password}` are optional but must appear together, at most once each.
    pub fn parse(template: &str) -> BrokerResult<Self> {
        let template = template.trim();
        if !(template.starts_with("http://") || template.starts_with("https://")) {
            return Err(BrokerError::template(
                "only http:// and https:// URLs are supported",
            ));
        }

        let (mut user, mut password, mut host, mut queue) = (0, 0, 0, 0);
        for capture in PLACEHOLDER.captures_iter(template) {
            match &capture[1] {
                "user" => user += 1,
                "password" => password += 1,
                "host" => host += 1,
                "queue" => queue += 1,
                other => {
                    return Err(BrokerError::template(format!(
                        "unknown placeholder '{{{}}}'",
                        other
                    )))
                }
            }
        }
        if host != 1 {
            return Err(BrokerError::template(format!(
                "'{{host}}' must appear exactly once (found {})",
                host
            )));
        }
        if queue != 1 {
            return Err(BrokerError::template(format!(
                "'{{queue}}' must appear exactly once (found {})",
                queue
            )));
        }
        if user > 1 || password > 1 || user != password {
            return Err(BrokerError::template(
                "'{user}' and '{password}' must either both appear once or both be absent",
            ));
        }

        let parsed = Self {
            template: template.to_string(),
            has_credentials: user == 1,
        };

        let sample = parsed.render(
            &Credentials::new("user", "password"),
            &BrokerEndpoint::new("localhost", 8161)?,
        );
        reqwest::Url::parse(&sample.for_queue("sample"))
            .map_err(|e| BrokerError::template(format!("not a valid URL: {}", e)))?;

        Ok(parsed)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    /// Fill credentials and host, keeping the queue slot
    pub fn render(&self, credentials: &Credentials, endpoint: &BrokerEndpoint) -> ActiveBrokerUrl {
        let host = endpoint.to_string();
        let url = self
            .template
            .replace("{user}", &encode_component(credentials.username()))
            .replace("{password}", &encode_component(credentials.password()))
            .replace("{host}", &host);
        let redacted = self
            .template
            .replace("{user}", &encode_component(credentials.username()))
            .replace("{password}", REDACTED)
            .replace("{host}", &host);
        ActiveBrokerUrl {
            url,
            redacted,
            endpoint: endpoint.clone(),
        }
    }
}

impl Default for BrokerUrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
            has_credentials: true,
        }
    }
}

/// Base URL of the broker currently believed to be master
///
/// Holds exactly one `{queue}` slot. `Display` and `Debug` never show the
/// password.
#[derive(Clone, PartialEq, Eq)]
pub struct ActiveBrokerUrl {
    url: String,
    redacted: String,
    endpoint: BrokerEndpoint,
}

impl ActiveBrokerUrl {
    /// Full request URL for a queue, credentials included
    ///
    /// The queue name is percent-encoded and reaches the broker verbatim.
    pub fn for_queue(&self, queue: &str) -> String {
        self.url.replacen(QUEUE_SLOT, &encode_component(queue), 1)
    }

    /// Request URL for a queue with the password masked, for logs
    pub fn redacted_for_queue(&self, queue: &str) -> String {
        self.redacted.replacen(QUEUE_SLOT, &encode_component(queue), 1)
    }

    pub fn endpoint(&self) -> &BrokerEndpoint {
        &self.endpoint
    }

    /// The cached form with its `{queue}` slot still open
    pub fn template_form(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ActiveBrokerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for ActiveBrokerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveBrokerUrl")
            .field("url", &self.redacted)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

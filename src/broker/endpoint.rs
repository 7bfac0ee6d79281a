//! Broker endpoints (`host:port`) as configured for the cluster

use crate::broker::error::{BrokerError, BrokerResult};
use std::fmt;
use std::str::FromStr;

/// One member of the broker cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrokerEndpoint {
    host: String,
    port: u16,
}

impl BrokerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> BrokerResult<Self> {
        let host = host.into();
        let display = format!("{}:{}", host, port);
        if host.is_empty() {
            return Err(BrokerError::endpoint(&display, "host is empty"));
        }
        if host.contains(|c: char| c.is_whitespace() || matches!(c, '/' | '@' | '?' | '#' | '{' | '}')) {
            return Err(BrokerError::endpoint(
                &display,
                "host contains characters not allowed in a URL authority",
            ));
        }
        if port == 0 {
            return Err(BrokerError::endpoint(&display, "port must be greater than 0"));
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for BrokerEndpoint {
    type Err = BrokerError;

    /// Parse `host:port`; IPv6 hosts must be bracketed (`[::1]:8161`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let (host, port) = value
            .rsplit_once(':')
            .ok_or_else(|| BrokerError::endpoint(value, "expected host:port"))?;
        if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
            return Err(BrokerError::endpoint(
                value,
                "IPv6 addresses must be enclosed in brackets",
            ));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| BrokerError::endpoint(value, "port is not a number between 1 and 65535"))?;
        Self::new(host, port)
    }
}

/// Parse endpoints given as list entries and/or comma-separated values
///
/// Duplicates are dropped; first occurrence keeps its position.
pub fn parse_endpoint_list<S: AsRef<str>>(values: &[S]) -> BrokerResult<Vec<BrokerEndpoint>> {
    let mut endpoints: Vec<BrokerEndpoint> = Vec::new();
    for value in values {
        for part in value.as_ref().split(',') {
            if part.trim().is_empty() {
                continue;
            }
            let endpoint: BrokerEndpoint = part.parse()?;
            if !endpoints.contains(&endpoint) {
                endpoints.push(endpoint);
            }
        }
    }
    Ok(endpoints)
}

//! Public API for broker description and resolution
//!
//! External modules should import from here rather than from the
//! individual submodules.

pub use crate::broker::credentials::Credentials;
pub use crate::broker::endpoint::{parse_endpoint_list, BrokerEndpoint};
pub use crate::broker::error::{BrokerError, BrokerResult, ResolveError, ResolveResult};
pub use crate::broker::resolver::{
    classify_probe_body, BrokerResolver, JolokiaResolver, ProbeVerdict, DEFAULT_PROBE_PATH,
    DEFAULT_PROBE_TIMEOUT_SECS,
};
pub use crate::broker::template::{ActiveBrokerUrl, BrokerUrlTemplate, DEFAULT_URL_TEMPLATE};

//! Broker Error Types

/// Problems with the static broker description (hosts, template)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BrokerError {
    #[error("{message}")]
    InvalidEndpoint { message: String },

    #[error("{message}")]
    InvalidTemplate { message: String },
}

impl BrokerError {
    pub(crate) fn endpoint(value: &str, reason: &str) -> Self {
        BrokerError::InvalidEndpoint {
            message: format!("Invalid broker endpoint '{}': {}", value, reason),
        }
    }

    pub(crate) fn template(reason: impl Into<String>) -> Self {
        BrokerError::InvalidTemplate {
            message: format!("Invalid broker URL template: {}", reason.into()),
        }
    }
}

impl crate::core::error_handling::ContextualError for BrokerError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            BrokerError::InvalidEndpoint { message } | BrokerError::InvalidTemplate { message } => {
                Some(message)
            }
        }
    }
}

/// Failure to determine which broker is currently the active master
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("No broker endpoints configured")]
    NoEndpoints,

    #[error("None of {candidates} broker(s) identified itself as master ({details})")]
    NoActiveBroker { candidates: usize, details: String },

    #[error("Broker probe client could not be created: {cause}")]
    Client { cause: String },
}

impl crate::core::error_handling::ContextualError for ResolveError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type BrokerResult<T> = Result<T, BrokerError>;
pub type ResolveResult<T> = Result<T, ResolveError>;

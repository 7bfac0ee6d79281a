//! TOML configuration file loading
//!
//! Settings are merged in this order, first one wins: command line,
//! environment (`MQPRODUCER_BROKER_PASSWORD` only), configuration file,
//! built-in defaults.

use crate::broker::api::{parse_endpoint_list, BrokerError, BrokerUrlTemplate, Credentials};
use crate::core::error_handling::ContextualError;
use crate::producer::api::{ProducerConfig, PublishPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::args::Args;

/// Environment variable consulted for the broker password
pub const PASSWORD_ENV: &str = "MQPRODUCER_BROKER_PASSWORD";

/// Configuration problems; all of them are fixable by the operator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{message}")]
    Missing { message: String },

    #[error("{message}")]
    Invalid { message: String },

    #[error("{message}")]
    File { message: String },

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl ConfigError {
    pub fn missing(field: &str) -> Self {
        ConfigError::Missing {
            message: format!("missing required setting '{}'", field),
        }
    }

    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        ConfigError::Invalid {
            message: format!("invalid value for '{}': {}", field, reason),
        }
    }

    fn file(path: &Path, reason: impl std::fmt::Display) -> Self {
        ConfigError::File {
            message: format!("configuration file {}: {}", path.display(), reason),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { message }
            | ConfigError::Invalid { message }
            | ConfigError::File { message } => Some(message),
            ConfigError::Broker(e) => e.user_message(),
        }
    }
}

impl Args {
    /// `<config_dir>/Mqproducer/mqproducer.toml`, when a config dir exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Mqproducer").join("mqproducer.toml"))
    }

    /// Load the configuration file into `args`
    ///
    /// An explicitly named file must exist; the default location is only
    /// read when present. Returns the path that was applied, if any.
    pub async fn load_config_file(args: &mut Self) -> Result<Option<PathBuf>, ConfigError> {
        let path = match args.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::file(&path, "does not exist"));
                }
                path
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::file(&path, e))?;
        let table = toml::from_str::<toml::Table>(&contents)
            .map_err(|e| ConfigError::file(&path, e))?;
        Self::apply_toml_values(args, &table)?;
        Ok(Some(path))
    }

    /// Fill settings not already given on the command line from a TOML table
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ConfigError> {
        if args.broker_hosts.is_empty() {
            if let Some(value) = config.get("broker-hosts") {
                args.broker_hosts = Self::string_list(value, "broker-hosts")?;
            }
        }

        Self::apply_string(config, "broker-user", &mut args.broker_user)?;
        Self::apply_string(config, "broker-password", &mut args.broker_password)?;
        Self::apply_string(config, "url-template", &mut args.url_template)?;
        Self::apply_string(config, "probe-path", &mut args.probe_path)?;
        Self::apply_string(config, "log-level", &mut args.log_level)?;
        Self::apply_string(config, "log-format", &mut args.log_format)?;

        Self::apply_positive(config, "max-attempts", &mut args.max_attempts)?;
        Self::apply_positive(config, "request-timeout-secs", &mut args.request_timeout_secs)?;
        Self::apply_positive(config, "probe-timeout-secs", &mut args.probe_timeout_secs)?;

        if args.log_file.is_none() {
            let mut log_file = None;
            Self::apply_string(config, "log-file", &mut log_file)?;
            args.log_file = log_file.map(PathBuf::from);
        }

        Ok(())
    }

    /// Take the broker password from the environment unless given on the command line
    pub fn apply_environment(args: &mut Self) {
        if args.broker_password.is_none() {
            if let Ok(password) = std::env::var(PASSWORD_ENV) {
                args.broker_password = Some(password);
            }
        }
    }

    /// Build the producer configuration from the merged settings
    pub fn producer_config(&self) -> Result<ProducerConfig, ConfigError> {
        let endpoints = parse_endpoint_list(&self.broker_hosts)?;
        if endpoints.is_empty() {
            return Err(ConfigError::missing("broker-hosts"));
        }
        let user = self
            .broker_user
            .as_deref()
            .ok_or_else(|| ConfigError::missing("broker-user"))?;
        let password = self
            .broker_password
            .as_deref()
            .ok_or_else(|| ConfigError::missing("broker-password"))?;

        let template = match &self.url_template {
            Some(template) => BrokerUrlTemplate::parse(template)?,
            None => BrokerUrlTemplate::default(),
        };

        let mut config = ProducerConfig::new(Credentials::new(user, password), endpoints)
            .with_template(template);
        if let Some(max_attempts) = self.max_attempts {
            config = config.with_policy(PublishPolicy::new(max_attempts));
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(secs) = self.probe_timeout_secs {
            config.probe_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(path) = &self.probe_path {
            config.probe_path = path.clone();
        }
        Ok(config)
    }

    fn apply_string(
        config: &toml::Table,
        key: &str,
        target: &mut Option<String>,
    ) -> Result<(), ConfigError> {
        if target.is_some() {
            return Ok(());
        }
        match config.get(key) {
            None => Ok(()),
            Some(toml::Value::String(s)) => {
                *target = Some(s.clone());
                Ok(())
            }
            Some(other) => Err(ConfigError::invalid(
                key,
                format!("expected a string, found {}", other.type_str()),
            )),
        }
    }

    fn apply_positive(
        config: &toml::Table,
        key: &str,
        target: &mut Option<usize>,
    ) -> Result<(), ConfigError> {
        if target.is_some() {
            return Ok(());
        }
        match config.get(key) {
            None => Ok(()),
            Some(toml::Value::Integer(n)) if *n > 0 => {
                *target = Some(*n as usize);
                Ok(())
            }
            Some(_) => Err(ConfigError::invalid(key, "must be a positive integer")),
        }
    }

    /// A single string (possibly comma-separated) or an array of strings
    fn string_list(value: &toml::Value, key: &str) -> Result<Vec<String>, ConfigError> {
        match value {
            toml::Value::String(s) => Ok(vec![s.clone()]),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ConfigError::invalid(key, "array entries must be strings"))
                })
                .collect(),
            other => Err(ConfigError::invalid(
                key,
                format!("expected a string or array, found {}", other.type_str()),
            )),
        }
    }
}

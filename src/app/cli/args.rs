//! Command-line arguments
//!
//! Every setting can also come from the TOML configuration file; values
//! given on the command line win.

use crate::core::validation::validate_positive_int;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mqproducer")]
#[command(about = "Publish a message to an ActiveMQ queue through the active master broker")]
#[command(version, long_version = crate::core::version::LONG_VERSION)]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Broker endpoints*
    #[arg(short = 'b', long = "broker-host", value_name = "HOST:PORT", action = ArgAction::Append)]
    pub broker_hosts: Vec<String>,

    /// Broker user name
    #[arg(short = 'u', long = "broker-user", value_name = "USER")]
    pub broker_user: Option<String>,

    /// Broker password (prefer MQPRODUCER_BROKER_PASSWORD or the config file)
    #[arg(long = "broker-password", value_name = "PASSWORD")]
    pub broker_password: Option<String>,

    /// Publish URL template with {user}, {password}, {host} and {queue} placeholders
    #[arg(long = "url-template", value_name = "TEMPLATE")]
    pub url_template: Option<String>,

    /// Delivery attempts per message
    #[arg(short = 'n', long = "max-attempts", value_name = "N", value_parser = validate_positive_int)]
    pub max_attempts: Option<usize>,

    /// HTTP timeout for publishing, in seconds
    #[arg(long = "request-timeout", value_name = "SECS", value_parser = validate_positive_int)]
    pub request_timeout_secs: Option<usize>,

    /// Path probed on each broker to find the master
    #[arg(long = "probe-path", value_name = "PATH")]
    pub probe_path: Option<String>,

    /// HTTP timeout for master probes, in seconds
    #[arg(long = "probe-timeout", value_name = "SECS", value_parser = validate_positive_int)]
    pub probe_timeout_secs: Option<usize>,

    /// Destination queue
    #[arg(short = 'Q', long = "queue", value_name = "NAME")]
    pub queue: Option<String>,

    /// Message body (read from stdin when neither --message nor --message-file is given)
    #[arg(short = 'm', long = "message", value_name = "TEXT", conflicts_with = "message_file")]
    pub message: Option<String>,

    /// Read the message body from a file
    #[arg(short = 'M', long = "message-file", value_name = "FILE")]
    pub message_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log file to write to; `none` and `-` disable file logging
    pub fn log_file_path(&self) -> Option<String> {
        self.log_file
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !(p.eq_ignore_ascii_case("none") || p == "-"))
    }

    /// Colour decision: explicit flags first, then TTY detection
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        if self.no_color {
            false
        } else {
            self.color || std::io::stderr().is_terminal()
        }
    }
}

//! Validation helpers for command-line and configuration values

use once_cell::sync::Lazy;
use regex::Regex;

// Whitespace, control characters and URL delimiters are refused outright;
// anything else is percent-encoded when the publish URL is built.
static QUEUE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s&#?\p{Cc}]+$").expect("queue name pattern is valid"));

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a destination queue name before it is placed in a broker URL
pub fn validate_queue_name(name: &str) -> Result<&str, String> {
    if name.is_empty() {
        return Err("Queue name cannot be empty".to_string());
    }
    if !QUEUE_NAME.is_match(name) {
        return Err(format!(
            "Queue name '{}' contains whitespace, control characters or one of '&', '#', '?'",
            name.escape_debug()
        ));
    }
    Ok(name)
}

//! Fatal error reporting shared by startup paths
//!
//! Errors that the operator can fix (bad configuration, missing broker
//! hosts) are reported verbatim. System errors (no active broker, HTTP
//! client failures) get the operation context on the primary line and the
//! full error at debug level.

/// Errors that know whether their message is directly actionable by the user
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the message tells the user exactly what to fix
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<&str>;
}

/// Primary line for a fatal error, without the `FATAL:` prefix
pub fn fatal_message<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match (error.is_user_actionable(), error.user_message()) {
        (true, Some(user_msg)) => user_msg.to_string(),
        _ => format!("{}: {}", operation_context, error),
    }
}

/// Log a fatal error with a detail level that matches its kind
///
/// ```rust,no_run
/// # use mqproducer::core::error_handling::log_error_with_context;
/// # use mqproducer::app::cli::config::ConfigError;
/// let err = ConfigError::missing("broker-hosts");
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: missing required setting 'broker-hosts'"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

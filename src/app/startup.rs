//! Application startup
//!
//! Parses arguments, merges configuration, starts logging, then connects
//! the producer and publishes a single message.

use crate::app::cli::args::Args;
use crate::app::cli::config::ConfigError;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{effective_level, init_logging};
use crate::producer::api::QueueProducer;
use clap::Parser;
use tokio::io::AsyncReadExt;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_NOT_DELIVERED: i32 = 2;

/// Run the command line tool and return the process exit code
pub async fn startup() -> i32 {
    let mut args = Args::parse();

    Args::apply_environment(&mut args);
    let config_path = match Args::load_config_file(&mut args).await {
        Ok(path) => path,
        Err(e) => {
            // Logging is not up yet
            eprintln!("Error: {}", e);
            return EXIT_FATAL;
        }
    };

    let level = effective_level(args.log_level.as_deref(), args.verbose, args.quiet);
    let log_file = args.log_file_path();
    if let Err(e) = init_logging(
        Some(level),
        args.log_format.as_deref(),
        log_file.as_deref(),
        args.use_color(),
    ) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return EXIT_FATAL;
    }

    log::debug!("mqproducer {}", crate::core::version::long_version());
    if let Some(path) = config_path {
        log::debug!("Loaded configuration from {}", path.display());
    }

    run(&args).await
}

async fn run(args: &Args) -> i32 {
    let Some(queue) = args.queue.as_deref() else {
        log_error_with_context(&ConfigError::missing("queue"), "Reading arguments");
        return EXIT_FATAL;
    };

    let message = match read_message(args).await {
        Ok(message) => message,
        Err(e) => {
            log_error_with_context(&e, "Reading message");
            return EXIT_FATAL;
        }
    };

    let config = match args.producer_config() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return EXIT_FATAL;
        }
    };

    let producer = match QueueProducer::with_http(config) {
        Ok(producer) => producer,
        Err(e) => {
            log_error_with_context(&e, "Creating HTTP clients");
            return EXIT_FATAL;
        }
    };
    if let Err(e) = producer.initialize().await {
        log_error_with_context(&e, "Locating active broker");
        return EXIT_FATAL;
    }

    let outcome = producer.publish(&message, queue).await;
    println!("{}", outcome.legacy_status());
    if outcome.is_success() {
        log::info!("Message delivered to queue '{}'", queue);
        EXIT_OK
    } else {
        log::error!("Message not delivered to queue '{}': {}", queue, outcome);
        EXIT_NOT_DELIVERED
    }
}

/// Message body from `--message`, `--message-file` or stdin, in that order
async fn read_message(args: &Args) -> Result<Vec<u8>, ConfigError> {
    if let Some(text) = &args.message {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(path) = &args.message_file {
        return tokio::fs::read(path)
            .await
            .map_err(|e| ConfigError::invalid("message-file", format!("{}: {}", path.display(), e)));
    }

    let mut body = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut body)
        .await
        .map_err(|e| ConfigError::invalid("message", format!("cannot read stdin: {}", e)))?;
    Ok(body)
}

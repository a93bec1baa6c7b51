//! # Structured Logging Module
//!
//! Environment-aware structured logging that outputs to the console and,
//! when `OUTBOX_LOG_DIR` is set, to a JSON log file for debugging
//! concurrent flush cycles across process instances.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once; only the first call has any effect. If a
/// global subscriber is already installed (e.g. by a test harness), the
/// existing subscriber is kept.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let log_level = default_log_level(&environment);

        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(EnvFilter::new(log_level.clone()));

        let file_layer = std::env::var("OUTBOX_LOG_DIR").ok().map(|dir| {
            let log_dir = PathBuf::from(dir);
            if !log_dir.exists() {
                let _ = fs::create_dir_all(&log_dir);
            }

            let pid = process::id();
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
            let log_filename = format!("{environment}.{pid}.{timestamp}.log");

            let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            // The guard must outlive the subscriber or buffered lines are lost.
            std::mem::forget(guard);

            fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new(log_level.clone()))
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    std::env::var("OUTBOX_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn default_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

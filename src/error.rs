//! # Structured Error Handling
//!
//! Crate-wide error types using thiserror for structured errors instead of
//! `Box<dyn Error>` patterns. Store-level failures carry the flush phase they
//! occurred in so callers can distinguish a failed cycle from isolated
//! per-event dispatch failures (which are never surfaced as errors).

use crate::orchestration::flush::FlushPhase;
use thiserror::Error;

/// Top-level error type for outbox operations
#[derive(Error, Debug)]
pub enum OutboxError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Flush cycle failed during {phase}: {source}")]
    Store {
        phase: FlushPhase,
        #[source]
        source: sqlx::Error,
    },

    #[error("Lock row missing for lock name: {lock_name}")]
    LockRowMissing { lock_name: String },

    #[error("Producer error: {message}")]
    Producer { message: String },

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl OutboxError {
    /// Create a database error for a named operation
    pub fn database(operation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    /// Create a store-fatal error tagged with the flush phase it aborted
    pub fn store(phase: FlushPhase, source: sqlx::Error) -> Self {
        Self::Store { phase, source }
    }

    /// Create a producer error
    pub fn producer(message: impl Into<String>) -> Self {
        Self::Producer {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error aborted a flush transaction (nothing was pruned)
    pub fn is_store_fatal(&self) -> bool {
        matches!(
            self,
            Self::Store { .. } | Self::LockRowMissing { .. } | Self::Database { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OutboxError>;

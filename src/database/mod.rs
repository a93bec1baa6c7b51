//! # Database Operations
//!
//! Connection management for the outbox store.
//!
//! ## Key Components
//!
//! - [`registry`] - Process-wide tenant-keyed pool registry with explicit
//!   lifecycle (lazy creation, shutdown hook)

pub mod registry;

pub use registry::TenantPoolRegistry;

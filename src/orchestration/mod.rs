//! # Flush Orchestration
//!
//! Composes lock acquisition, batch fetch, concurrent dispatch, and prune
//! into one atomic flush cycle.
//!
//! - [`dispatcher`] - per-event decode and publish with concurrent fan-out
//! - [`flush`] - the lock → fetch → dispatch → prune state machine

pub mod dispatcher;
pub mod flush;

pub use dispatcher::{DispatchOutcome, DispatchStatus, EventDispatcher, TopicContext};
pub use flush::{FlushConfig, FlushOrchestrator, FlushOutcome, FlushPhase};

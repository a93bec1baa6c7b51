//! HTTP handlers for the trigger surface.

pub mod flush;
pub mod health;

//! # Middleware
//!
//! Tower layers applied to the contract router.

pub mod tracing_layer;

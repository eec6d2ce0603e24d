//! HTTP middleware for request processing.
//!
//! Provides observability middleware: request tracing and response timing.

pub mod timing;
pub mod tracing;

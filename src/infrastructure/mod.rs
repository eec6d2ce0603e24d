//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain and application layers.
//!
//! - [`cache`] - Cache backends (Redis, in-process, no-op)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;

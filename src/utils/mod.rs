//! Helpers shared across layers.
//!
//! - [`base62`] - Short code encoding derived from record ids
//! - [`url_validator`] - URL sanitization and short code validation

pub mod base62;
pub mod url_validator;

//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall`
//! for unit tests.
//!
//! See integration tests in `tests/repository_url.rs` for usage examples.

pub mod url_repository;

pub use url_repository::{ListQuery, OrderField, SortDirection, UrlFilter, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;

//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters.
//!
//! - [`PgUrlRepository`] - Short URL storage, lookup, listing and cleanup

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;

//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short code to URL mapping
//! - [`NewUrlRecord`] - Insert payload for a mapping

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};

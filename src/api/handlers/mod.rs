//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod maintenance;
pub mod redirect;
pub mod shorten;
pub mod stats;
pub mod urls;

pub use health::health_handler;
pub use maintenance::cleanup_handler;
pub use redirect::redirect_handler;
pub use shorten::{bulk_shorten_handler, shorten_handler};
pub use stats::stats_handler;
pub use urls::{delete_url_handler, list_urls_handler, top_urls_handler};

//! Response timing header.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

pub const X_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

/// Adds `X-Response-Time: <ms>ms` to every response.
///
/// The value is wall time spent in the inner stack, with two decimals,
/// e.g. `X-Response-Time: 1.37ms`.
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/health", get(health_handler))
///     .layer(middleware::from_fn(timing::layer));
/// ```
pub async fn layer(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(req).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{:.2}ms", elapsed_ms)) {
        response.headers_mut().insert(X_RESPONSE_TIME, value);
    }

    response
}

//! Input validation for destination URLs and custom short codes.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]{1,10}$").expect("short code regex is valid"));

/// Codes that would shadow a fixed route and therefore cannot be claimed.
pub const RESERVED_CODES: &[&str] = &["api", "health", "shorten", "stats"];

/// Trims leading and trailing whitespace.
pub fn sanitize(url: &str) -> &str {
    url.trim()
}

/// Returns true if `url` is an absolute `http`/`https` URL with a host.
///
/// Other schemes (`javascript:`, `data:`, `file:`, ...) are rejected because
/// the service answers lookups with a redirect to the stored value. So are
/// control characters: `Url::parse` silently drops embedded tabs and line
/// breaks, but the raw value could never be sent back as a `Location` header.
pub fn is_valid_url(url: &str) -> bool {
    if url.chars().any(char::is_control) {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

/// Returns true if `code` is 1-10 base-62 characters.
pub fn is_valid_short_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}

/// Returns true if `code` collides with a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

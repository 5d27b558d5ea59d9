//! Long URL validation for shorten requests.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Accepts only absolute `http`/`https` URLs with a host.
///
/// The URL is not normalized: deduplication works on the exact string the
/// client sent.
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing why the URL was rejected.
pub fn ensure_web_url(input: &str) -> Result<(), AppError> {
    let url = Url::parse(input).map_err(|e| {
        AppError::bad_request("Invalid or missing longUrl", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Invalid or missing longUrl",
            json!({ "reason": "Only http/https URLs are allowed" }),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::bad_request(
            "Invalid or missing longUrl",
            json!({ "reason": "URL must have a host" }),
        ));
    }

    Ok(())
}

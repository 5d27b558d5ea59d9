//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
///
/// A missing `longUrl` deserializes to an empty string so it is reported as
/// a validation error rather than a JSON rejection. Scheme and host checks
/// are done by [`crate::utils::url_validation::ensure_web_url`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "longUrl is required"))]
    pub long_url: String,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub clicks: i64,
}

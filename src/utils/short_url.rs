//! Public short URL construction.

/// Builds the public short URL for `code`.
///
/// Computed on demand rather than stored, so changing `BASE_URL` re-targets
/// every existing link.
pub fn build_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

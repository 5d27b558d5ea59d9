//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Current state of a short link.
///
/// `clicks` is the freshest known count: the cached counter when it is ahead
/// of the durable one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

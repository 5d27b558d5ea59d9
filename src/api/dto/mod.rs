//! Data Transfer Objects for API requests and responses.
//!
//! JSON field names are camelCase on the wire.

pub mod health;
pub mod shorten;
pub mod stats;

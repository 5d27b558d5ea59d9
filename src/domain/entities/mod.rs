//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short code mapping with its click counter
//! - [`NewUrlRecord`] - Input for creating a record

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};

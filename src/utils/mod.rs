//! Utility functions used across the application:
//!
//! - [`code_generator`] - Short code generation
//! - [`db_error`] - `sqlx` error classification
//! - [`short_url`] - Public short URL construction
//! - [`url_validation`] - Long URL validation

pub mod code_generator;
pub mod db_error;
pub mod short_url;
pub mod url_validation;

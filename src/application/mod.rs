//! Application layer services implementing the dual-store logic.
//!
//! Services consume the durable store, the click cache and the code generator
//! through traits injected at construction, and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Deduplicating link creation
//! - [`services::redirect_service::RedirectService`] - Cache-aside lookup and write-back click counting
//! - [`services::stats_service::StatsService`] - Record state with the cached counter overlaid

pub mod services;

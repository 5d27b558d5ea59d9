//! Business logic services for the application layer.

pub mod redirect_service;
pub mod shorten_service;
pub mod stats_service;

pub use redirect_service::{RedirectService, Resolved};
pub use shorten_service::{ShortenService, Shortened};
pub use stats_service::StatsService;

//! Domain layer: the URL record, the durable store contract and the
//! write-back rules for the click counter.
//!
//! # Architecture
//!
//! - [`entities`] - [`entities::UrlRecord`] and its creation input
//! - [`repositories`] - [`repositories::UrlRepository`], the durable store contract
//! - [`error`] - Store-level failures ([`error::StoreError`])
//! - [`write_back`] - When cached click counts are flushed to the durable store
//!
//! # Click Counting Flow
//!
//! 1. A redirect increments `clicks:<code>` in the cache (atomic, no lost updates)
//! 2. [`write_back::WriteBackPolicy`] decides whether the new count is flushed
//! 3. Flushed counts land in the durable store via [`repositories::UrlRepository::set_clicks`]
//!
//! The durable counter therefore lags the cached one by less than one flush
//! interval per code.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod write_back;

//! Write-back rules for the cached click counter.

/// Default number of redirects between two durable flushes of a counter.
pub const DEFAULT_FLUSH_EVERY: i64 = 10;

/// Decides when a cached click count is persisted and how a cold counter is
/// rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteBackPolicy {
    flush_every: i64,
    seed_from_store: bool,
}

impl WriteBackPolicy {
    /// Creates a policy flushing every `flush_every` clicks.
    ///
    /// A zero or negative interval is clamped to 1 (flush on every click).
    pub fn new(flush_every: i64, seed_from_store: bool) -> Self {
        Self {
            flush_every: flush_every.max(1),
            seed_from_store,
        }
    }

    pub fn flush_every(&self) -> i64 {
        self.flush_every
    }

    /// Returns true when `count` must be written to the durable store.
    ///
    /// With the default interval this bounds the durable counter's lag to at
    /// most 9 clicks per code.
    pub fn should_flush(&self, count: i64) -> bool {
        count > 0 && count % self.flush_every == 0
    }

    /// Returns true when a counter that has just been (re)created in the cache
    /// must be seeded from the durable value.
    ///
    /// A post-increment value of 1 means the key was absent (evicted, never
    /// filled, or reset by a cache restart).
    pub fn should_seed(&self, count: i64) -> bool {
        self.seed_from_store && count == 1
    }
}

impl Default for WriteBackPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_EVERY, true)
    }
}

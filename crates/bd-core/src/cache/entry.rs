use serde::{Deserialize, Serialize};

use super::key::CacheKey;

/// Freshness of a cache entry.
///
/// 缓存条目的新鲜度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheState {
    /// Younger than the stale time
    Fresh,
    /// Older than the stale time; still served
    Stale,
    /// A refresh is in flight; the previous data stays visible
    Fetching,
}

/// One cached value.
///
/// Replaced wholesale on every refresh or `set_data`; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub key: CacheKey,
    pub data: T,
    /// Unix milliseconds at which `data` was stored
    pub fetched_at_ms: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(key: CacheKey, data: T, fetched_at_ms: i64) -> Self {
        Self {
            key,
            data,
            fetched_at_ms,
        }
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.fetched_at_ms).max(0)
    }

    pub fn is_stale(&self, now_ms: i64, stale_time_ms: u64) -> bool {
        let stale_time = i64::try_from(stale_time_ms).unwrap_or(i64::MAX);
        self.age_ms(now_ms) >= stale_time
    }

    /// Freshness at `now_ms`, given whether a fetch for this key is running.
    pub fn state(&self, now_ms: i64, stale_time_ms: u64, fetching: bool) -> CacheState {
        if fetching {
            CacheState::Fetching
        } else if self.is_stale(now_ms, stale_time_ms) {
            CacheState::Stale
        } else {
            CacheState::Fresh
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheEntry<U> {
        CacheEntry {
            key: self.key,
            data: f(self.data),
            fetched_at_ms: self.fetched_at_ms,
        }
    }
}

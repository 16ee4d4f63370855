use std::time::Duration;

use super::key::CacheKey;
use crate::config::CacheConfig;

/// Per-query cache behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Entries younger than this are served without a fetch
    pub stale_time: Duration,
    /// On a miss, serve `previous_key`'s data as a placeholder
    pub keep_previous_data: bool,
    /// Key the caller was showing before this query
    pub previous_key: Option<CacheKey>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl QueryOptions {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            stale_time: Duration::from_millis(config.stale_time_ms),
            keep_previous_data: config.keep_previous_data,
            previous_key: None,
        }
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_previous_key(mut self, previous_key: Option<CacheKey>) -> Self {
        self.previous_key = previous_key;
        self
    }

    pub fn stale_time_ms(&self) -> u64 {
        u64::try_from(self.stale_time.as_millis()).unwrap_or(u64::MAX)
    }

    /// Placeholder key to consult on a miss, if any.
    pub fn placeholder_key(&self) -> Option<&CacheKey> {
        self.previous_key
            .as_ref()
            .filter(|_| self.keep_previous_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_cache_config() {
        let options = QueryOptions::default();
        assert_eq!(options.stale_time_ms(), 30_000);
        assert!(options.keep_previous_data);
        assert!(options.previous_key.is_none());
    }

    #[test]
    fn placeholder_requires_keep_previous_data() {
        let key = CacheKey::new("announcements:{}");
        let mut options = QueryOptions::default().with_previous_key(Some(key.clone()));
        assert_eq!(options.placeholder_key(), Some(&key));

        options.keep_previous_data = false;
        assert_eq!(options.placeholder_key(), None);
    }
}

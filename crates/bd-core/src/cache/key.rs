use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::SanitizedParams;

const SEPARATOR: char = ':';
const RECORD_SEPARATOR: char = '/';

fn is_boundary(c: char) -> bool {
    c == SEPARATOR || c == RECORD_SEPARATOR
}

/// Cache key: entity namespace followed by the sanitized parameters.
///
/// Keys are plain strings so invalidation can work on prefixes: the key for
/// `account-groups` page 2 starts with `account-groups:`, and invalidating
/// `account-groups` drops every page and filter combination at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for a list query: `namespace:{"page":"2",...}`.
    pub fn for_list(namespace: &str, params: &SanitizedParams) -> Self {
        Self(format!("{namespace}{SEPARATOR}{}", params.cache_fragment()))
    }

    /// Key for a single record: `namespace/id`.
    pub fn for_record(namespace: &str, id: &str) -> Self {
        Self(format!("{namespace}{RECORD_SEPARATOR}{id}"))
    }

    /// Namespace prefix covering every list and record key of an entity.
    pub fn namespace(namespace: &str) -> Self {
        Self(namespace.to_string())
    }

    /// Prefix match on segment boundaries: `voucher` covers `voucher:{..}`
    /// and `voucher/7` but not `voucher-types:{..}`.
    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        let Some(rest) = self.0.strip_prefix(prefix.as_str()) else {
            return false;
        };
        rest.is_empty()
            || prefix.0.ends_with(is_boundary)
            || rest.starts_with(is_boundary)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CacheKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

//! Query cache models
//! 查询缓存模型
//!
//! Pure data shared by the cache implementation in `bd-app`: keys, entries
//! and per-query options. No synchronization lives here.

mod entry;
mod key;
mod options;

pub use entry::{CacheEntry, CacheState};
pub use key::CacheKey;
pub use options::QueryOptions;

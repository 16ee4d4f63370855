//! Process-wide keyed query cache
//! 进程级的键控查询缓存

mod cache;
mod pending;

pub use cache::{QueryCache, QueryResult, QuerySnapshot};
pub use pending::PendingFetch;

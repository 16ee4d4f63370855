use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bd_core::{CacheKey, ListQueryError};
use futures::future::{BoxFuture, Shared};

pub(crate) type AnyData = Arc<dyn Any + Send + Sync>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, Result<AnyData, ListQueryError>>>;

/// Handle on an in-flight fetch.
///
/// Every caller that joins the same fetch gets its own handle. The fetch runs
/// on a spawned task, so dropping a handle never cancels it.
/// 丢弃句柄不会取消后台请求。
pub struct PendingFetch<T> {
    key: CacheKey,
    generation: u64,
    fetch: SharedFetch,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PendingFetch<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(key: CacheKey, generation: u64, fetch: SharedFetch) -> Self {
        Self {
            key,
            generation,
            fetch,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Generation of the fetch; a later fetch for the same key has a larger one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for this fetch to finish.
    ///
    /// Resolves with this fetch's own result even when a newer fetch for the
    /// key superseded it; read the cache afterwards for the value that won.
    pub async fn wait(self) -> Result<Arc<T>, ListQueryError> {
        let data = self.fetch.await?;
        data.downcast::<T>().map_err(|_| ListQueryError::Decode {
            what: format!("cached value for '{}'", self.key),
            reason: "type mismatch".to_string(),
        })
    }
}

impl<T> fmt::Debug for PendingFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

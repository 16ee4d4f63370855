//! Keyed cache with request de-duplication and stale-while-revalidate.
//!
//! Values are stored type-erased so one cache serves every entity; `get::<T>`
//! downcasts on the way out and treats a type mismatch as a miss.
//!
//! State lives behind a synchronous mutex that is never held across an
//! `.await`. Fetches run on spawned tasks; each one carries a generation and
//! only the most recently started fetch for a key may write its result.
//! 同一键上只有最后发起的请求可以写入结果。

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bd_core::ports::ClockPort;
use bd_core::{CacheEntry, CacheKey, CacheState, ListQueryError, QueryOptions};
use futures::FutureExt;
use tracing::{debug, warn};

use super::pending::{AnyData, PendingFetch, SharedFetch};

/// What a caller can render right now.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    /// Cached data, or the previous key's data when `is_placeholder` is set
    pub data: Option<Arc<T>>,
    /// State of this key's own entry; `None` on a miss
    pub state: Option<CacheState>,
    /// Nothing to show yet
    pub is_loading: bool,
    /// A fetch for this key is running
    pub is_fetching: bool,
    pub is_placeholder: bool,
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            state: self.state,
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            is_placeholder: self.is_placeholder,
        }
    }
}

/// Result of [`QueryCache::get`]: the snapshot plus a handle on the fetch it
/// triggered or joined, if any.
#[derive(Debug)]
pub struct QueryResult<T> {
    pub snapshot: QuerySnapshot<T>,
    pub pending: Option<PendingFetch<T>>,
}

struct InFlight {
    generation: u64,
    fetch: SharedFetch,
}

struct Inner {
    entries: HashMap<CacheKey, CacheEntry<AnyData>>,
    in_flight: HashMap<CacheKey, InFlight>,
    /// Generation of the most recently started fetch (or `set_data`) per key
    latest: HashMap<CacheKey, u64>,
    generation_counter: u64,
    max_entries: usize,
}

/// Process-wide query cache.
///
/// Owned explicitly and shared as `Arc<QueryCache>`; build a fresh one per
/// test. Methods that start fetches must be called inside a tokio runtime.
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    clock: Arc<dyn ClockPort>,
}

impl QueryCache {
    /// Create a cache holding at most `max_entries` keys (`0` disables the bound).
    /// 创建最多保存 `max_entries` 个键的缓存（`0` 表示不限）。
    pub fn new(clock: Arc<dyn ClockPort>, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                latest: HashMap::new(),
                generation_counter: 0,
                max_entries,
            })),
            clock,
        }
    }

    /// Serve `key`, fetching with `fetcher` when the entry is missing or stale.
    ///
    /// - fresh entry: returned as is, `fetcher` is not called
    /// - stale entry: returned immediately, a background refresh is started
    /// - miss: `data` is `None` (or the placeholder), a fetch is started
    ///
    /// A fetch already running for `key` is joined instead of starting another.
    /// `fetcher` is invoked under the cache lock and must only build its
    /// future, not call back into the cache.
    pub fn get<T, F, Fut>(&self, key: &CacheKey, fetcher: F, options: &QueryOptions) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ListQueryError>> + Send + 'static,
    {
        let now = self.clock.now_ms();
        let stale_time_ms = options.stale_time_ms();
        let mut inner = lock(&self.inner);

        match inner.lookup::<T>(key) {
            Some(entry) if !entry.is_stale(now, stale_time_ms) => {
                let pending = inner.join::<T>(key);
                debug!(%key, age_ms = entry.age_ms(now), "Query cache hit");
                QueryResult {
                    snapshot: QuerySnapshot {
                        state: Some(entry.state(now, stale_time_ms, pending.is_some())),
                        data: Some(entry.data),
                        is_loading: false,
                        is_fetching: pending.is_some(),
                        is_placeholder: false,
                    },
                    pending,
                }
            }
            Some(entry) => {
                debug!(%key, age_ms = entry.age_ms(now), "Serving stale entry while revalidating");
                let pending = match inner.join::<T>(key) {
                    Some(pending) => pending,
                    None => self.spawn_fetch(&mut inner, key, fetcher()),
                };
                QueryResult {
                    snapshot: QuerySnapshot {
                        data: Some(entry.data),
                        state: Some(CacheState::Fetching),
                        is_loading: false,
                        is_fetching: true,
                        is_placeholder: false,
                    },
                    pending: Some(pending),
                }
            }
            None => {
                let pending = match inner.join::<T>(key) {
                    Some(pending) => pending,
                    None => self.spawn_fetch(&mut inner, key, fetcher()),
                };
                let placeholder = options
                    .placeholder_key()
                    .filter(|previous| *previous != key)
                    .and_then(|previous| inner.lookup::<T>(previous))
                    .map(|entry| entry.data);
                debug!(%key, placeholder = placeholder.is_some(), "Query cache miss");
                QueryResult {
                    snapshot: QuerySnapshot {
                        is_loading: placeholder.is_none(),
                        is_fetching: true,
                        is_placeholder: placeholder.is_some(),
                        data: placeholder,
                        state: None,
                    },
                    pending: Some(pending),
                }
            }
        }
    }

    /// Start a new fetch for `key` even when one is already running.
    ///
    /// The new fetch supersedes any older one: whichever finishes last, only
    /// this one's result is stored.
    pub fn refetch<T, F, Fut>(&self, key: &CacheKey, fetcher: F) -> PendingFetch<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ListQueryError>> + Send + 'static,
    {
        let mut inner = lock(&self.inner);
        debug!(%key, "Forced refetch");
        self.spawn_fetch(&mut inner, key, fetcher())
    }

    /// Replace the entry for `key` wholesale with `data`, marked fresh.
    ///
    /// Any fetch still running for `key` is superseded and its result dropped.
    pub fn set_data<T>(&self, key: &CacheKey, data: T) -> Arc<T>
    where
        T: Send + Sync + 'static,
    {
        let data = Arc::new(data);
        let now = self.clock.now_ms();
        let mut inner = lock(&self.inner);
        inner.next_generation(key);
        inner.in_flight.remove(key);
        let stored: AnyData = data.clone();
        inner
            .entries
            .insert(key.clone(), CacheEntry::new(key.clone(), stored, now));
        inner.evict_if_needed();
        debug!(%key, "Cache entry replaced");
        data
    }

    /// Drop every key starting with `prefix` and detach its in-flight fetches.
    ///
    /// Detached fetches still run to completion but their results are
    /// discarded. Returns the number of entries removed.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let mut inner = lock(&self.inner);
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        inner.in_flight.retain(|key, _| !key.starts_with(prefix));
        inner.latest.retain(|key, _| !key.starts_with(prefix));
        let removed = before - inner.entries.len();
        debug!(%prefix, removed, "Cache invalidated");
        removed
    }

    /// Cached data for `key` without triggering a fetch.
    pub fn peek<T>(&self, key: &CacheKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        lock(&self.inner).lookup::<T>(key).map(|entry| entry.data)
    }

    pub fn state_of(&self, key: &CacheKey, stale_time: Duration) -> Option<CacheState> {
        let now = self.clock.now_ms();
        let stale_time_ms = u64::try_from(stale_time.as_millis()).unwrap_or(u64::MAX);
        let inner = lock(&self.inner);
        let fetching = inner.in_flight.contains_key(key);
        inner
            .entries
            .get(key)
            .map(|entry| entry.state(now, stale_time_ms, fetching))
    }

    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        lock(&self.inner).in_flight.contains_key(key)
    }

    /// Remove a single key. Returns whether an entry existed.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut inner = lock(&self.inner);
        inner.in_flight.remove(key);
        inner.latest.remove(key);
        inner.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        inner.entries.clear();
        inner.in_flight.clear();
        inner.latest.clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn `fut` as the newest fetch for `key`.
    ///
    /// Called with the lock held, so the task cannot record its result before
    /// the in-flight slot is registered.
    fn spawn_fetch<T, Fut>(&self, inner: &mut Inner, key: &CacheKey, fut: Fut) -> PendingFetch<T>
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, ListQueryError>> + Send + 'static,
    {
        let generation = inner.next_generation(key);
        let state = Arc::clone(&self.inner);
        let clock = Arc::clone(&self.clock);
        let task_key = key.clone();

        let task = tokio::spawn(async move {
            let result = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(data)) => Ok(Arc::new(data) as AnyData),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(ListQueryError::FetchAborted("fetcher panicked".to_string())),
            };
            lock(&state).complete(&task_key, generation, &result, clock.now_ms());
            result
        });

        let fetch: SharedFetch = async move {
            task.await
                .unwrap_or_else(|err| Err(ListQueryError::FetchAborted(err.to_string())))
        }
        .boxed()
        .shared();

        inner.in_flight.insert(
            key.clone(),
            InFlight {
                generation,
                fetch: fetch.clone(),
            },
        );
        debug!(%key, generation, "Fetch started");
        PendingFetch::new(key.clone(), generation, fetch)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn next_generation(&mut self, key: &CacheKey) -> u64 {
        self.generation_counter += 1;
        self.latest.insert(key.clone(), self.generation_counter);
        self.generation_counter
    }

    fn lookup<T>(&self, key: &CacheKey) -> Option<CacheEntry<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        let entry = self.entries.get(key)?;
        match Arc::clone(&entry.data).downcast::<T>() {
            Ok(data) => Some(CacheEntry::new(entry.key.clone(), data, entry.fetched_at_ms)),
            Err(_) => {
                warn!(%key, "Cached value has a different type; treating as a miss");
                None
            }
        }
    }

    fn join<T>(&self, key: &CacheKey) -> Option<PendingFetch<T>>
    where
        T: Send + Sync + 'static,
    {
        self.in_flight
            .get(key)
            .map(|flight| PendingFetch::new(key.clone(), flight.generation, flight.fetch.clone()))
    }

    fn complete(
        &mut self,
        key: &CacheKey,
        generation: u64,
        result: &Result<AnyData, ListQueryError>,
        now_ms: i64,
    ) {
        let is_latest = self.latest.get(key) == Some(&generation);
        if self
            .in_flight
            .get(key)
            .is_some_and(|flight| flight.generation == generation)
        {
            self.in_flight.remove(key);
        }

        match result {
            Ok(data) if is_latest => {
                self.entries.insert(
                    key.clone(),
                    CacheEntry::new(key.clone(), Arc::clone(data), now_ms),
                );
                self.evict_if_needed();
                debug!(%key, generation, "Fetch stored");
            }
            Ok(_) => {
                debug!(%key, generation, "Discarding result of superseded fetch");
            }
            Err(err) if self.entries.contains_key(key) => {
                warn!(%key, generation, error = %err, "Background refresh failed; keeping cached data");
            }
            Err(err) => {
                warn!(%key, generation, error = %err, "Fetch failed");
            }
        }
    }

    fn evict_if_needed(&mut self) {
        if self.max_entries == 0 {
            return;
        }
        while self.entries.len() > self.max_entries {
            let victim = self.oldest_key(true).or_else(|| self.oldest_key(false));
            let Some(victim) = victim else { break };
            self.entries.remove(&victim);
            if !self.in_flight.contains_key(&victim) {
                self.latest.remove(&victim);
            }
            debug!(key = %victim, "Evicted cache entry");
        }
    }

    /// Oldest-fetched key, optionally skipping keys with a fetch in flight.
    fn oldest_key(&self, skip_in_flight: bool) -> Option<CacheKey> {
        self.entries
            .values()
            .filter(|entry| !skip_in_flight || !self.in_flight.contains_key(&entry.key))
            .min_by_key(|entry| entry.fetched_at_ms)
            .map(|entry| entry.key.clone())
    }
}

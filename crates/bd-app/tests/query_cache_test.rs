//! Query cache behaviour: freshness, de-duplication, last-fetch-wins and
//! stale-while-revalidate.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bd_app::QueryCache;
use bd_core::{CacheKey, CacheState, ListQueryError, QueryOptions, TransportError};
use common::FakeClock;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;

type Gate<T> = oneshot::Sender<Result<T, ListQueryError>>;

/// A fetch future that resolves when the test sends through the gate.
fn gated<T: Send + 'static>() -> (Gate<T>, BoxFuture<'static, Result<T, ListQueryError>>) {
    let (tx, rx) = oneshot::channel();
    let fut = async move {
        rx.await
            .unwrap_or_else(|e| Err(ListQueryError::FetchAborted(e.to_string())))
    }
    .boxed();
    (tx, fut)
}

fn options(stale_ms: u64) -> QueryOptions {
    QueryOptions::default().with_stale_time(Duration::from_millis(stale_ms))
}

fn setup() -> (Arc<QueryCache>, Arc<FakeClock>) {
    let clock = FakeClock::new(10_000);
    (Arc::new(QueryCache::new(clock.clone(), 0)), clock)
}

#[tokio::test]
async fn test_two_gets_within_stale_time_fetch_once() {
    let (cache, clock) = setup();
    let key = CacheKey::new("account-groups:{}");
    let calls = Arc::new(AtomicUsize::new(0));

    let counted = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ListQueryError>(vec![1u32, 2])
        }
    };

    let first = cache.get(&key, counted(calls.clone()), &options(30_000));
    assert!(first.snapshot.is_loading);
    first.pending.expect("miss starts a fetch").wait().await.unwrap();

    clock.advance_ms(5_000);
    let second = cache.get(&key, counted(calls.clone()), &options(30_000));

    assert!(second.pending.is_none());
    assert!(!second.snapshot.is_fetching);
    assert_eq!(second.snapshot.state, Some(CacheState::Fresh));
    assert_eq!(second.snapshot.data.as_deref(), Some(&vec![1, 2]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_gets_share_one_request() {
    let (cache, _clock) = setup();
    let key = CacheKey::new("voucher-types:{}");
    let calls = Arc::new(AtomicUsize::new(0));
    let (gate, fut) = gated::<&'static str>();

    let c = calls.clone();
    let a = cache.get(
        &key,
        move || {
            c.fetch_add(1, Ordering::SeqCst);
            fut
        },
        &options(30_000),
    );
    let c = calls.clone();
    let b = cache.get(
        &key,
        move || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ListQueryError>("never") }.boxed()
        },
        &options(30_000),
    );

    let a = a.pending.unwrap();
    let b = b.pending.unwrap();
    assert_eq!(a.generation(), b.generation());

    gate.send(Ok("shared")).unwrap();
    assert_eq!(*a.wait().await.unwrap(), "shared");
    assert_eq!(*b.wait().await.unwrap(), "shared");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_last_started_fetch_wins() {
    let (cache, _clock) = setup();
    let key = CacheKey::new("announcements:{\"page\":\"1\"}");

    let (gate_a, fut_a) = gated::<&'static str>();
    let (gate_b, fut_b) = gated::<&'static str>();

    let pending_a = cache.get(&key, move || fut_a, &options(30_000)).pending.unwrap();
    let pending_b = cache.refetch(&key, move || fut_b);
    assert!(pending_b.generation() > pending_a.generation());

    gate_b.send(Ok("B")).unwrap();
    assert_eq!(*pending_b.wait().await.unwrap(), "B");

    gate_a.send(Ok("A")).unwrap();
    assert_eq!(*pending_a.wait().await.unwrap(), "A");

    assert_eq!(cache.peek::<&'static str>(&key).as_deref(), Some(&"B"));
}

#[tokio::test]
async fn test_stale_entry_is_served_while_revalidating() {
    let (cache, clock) = setup();
    let key = CacheKey::new("salary-components:{}");

    cache.set_data(&key, "old");
    clock.advance_ms(200);

    let (gate, fut) = gated::<&'static str>();
    let result = cache.get(&key, move || fut, &options(100));

    assert_eq!(result.snapshot.data.as_deref(), Some(&"old"));
    assert!(!result.snapshot.is_loading);
    assert!(result.snapshot.is_fetching);
    assert_eq!(result.snapshot.state, Some(CacheState::Fetching));

    gate.send(Ok("new")).unwrap();
    result.pending.unwrap().wait().await.unwrap();

    assert_eq!(cache.peek::<&'static str>(&key).as_deref(), Some(&"new"));
    assert_eq!(cache.state_of(&key, Duration::from_millis(100)), Some(CacheState::Fresh));
}

#[tokio::test]
async fn test_failed_background_refresh_keeps_stale_data() {
    let (cache, clock) = setup();
    let key = CacheKey::new("salary-components:{}");

    cache.set_data(&key, 7u32);
    clock.advance_ms(1_000);

    let result = cache.get(
        &key,
        || async { Err::<u32, _>(ListQueryError::from(TransportError::Timeout)) },
        &options(100),
    );
    let err = result.pending.unwrap().wait().await.unwrap_err();

    assert_eq!(err, ListQueryError::Transport(TransportError::Timeout));
    assert_eq!(cache.peek::<u32>(&key).as_deref(), Some(&7));
    assert!(!cache.is_fetching(&key));
}

#[tokio::test]
async fn test_failed_first_fetch_stores_nothing() {
    let (cache, _clock) = setup();
    let key = CacheKey::new("announcements:{}");

    let result = cache.get(
        &key,
        || async { Err::<u32, _>(ListQueryError::from(TransportError::Network("down".into()))) },
        &options(100),
    );
    assert!(result.pending.unwrap().wait().await.is_err());
    assert!(cache.peek::<u32>(&key).is_none());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_previous_key_data_is_a_placeholder() {
    let (cache, _clock) = setup();
    let page_one = CacheKey::new("account-groups:{\"page\":\"1\"}");
    let page_two = CacheKey::new("account-groups:{\"page\":\"2\"}");
    cache.set_data(&page_one, "first page");

    let (gate, fut) = gated::<&'static str>();
    let opts = options(30_000).with_previous_key(Some(page_one.clone()));
    let result = cache.get(&page_two, move || fut, &opts);

    assert_eq!(result.snapshot.data.as_deref(), Some(&"first page"));
    assert!(result.snapshot.is_placeholder);
    assert!(!result.snapshot.is_loading);
    assert_eq!(result.snapshot.state, None);

    gate.send(Ok("second page")).unwrap();
    result.pending.unwrap().wait().await.unwrap();
    assert_eq!(cache.peek::<&'static str>(&page_two).as_deref(), Some(&"second page"));
}

#[tokio::test]
async fn test_invalidate_prefix_drops_pages_and_detaches_fetches() {
    let (cache, _clock) = setup();
    let one = CacheKey::new("voucher-types:{\"page\":\"1\"}");
    let two = CacheKey::new("voucher-types:{\"page\":\"2\"}");
    let three = CacheKey::new("voucher-types:{\"page\":\"3\"}");
    let other = CacheKey::new("announcements:{}");
    cache.set_data(&one, 1u32);
    cache.set_data(&two, 2u32);
    cache.set_data(&other, 9u32);

    let (gate, fut) = gated::<u32>();
    let pending = cache.get(&three, move || fut, &options(30_000)).pending.unwrap();

    let removed = cache.invalidate(&CacheKey::namespace("voucher-types"));
    assert_eq!(removed, 2);
    assert!(!cache.is_fetching(&three));

    gate.send(Ok(3)).unwrap();
    assert_eq!(*pending.wait().await.unwrap(), 3);

    assert!(cache.peek::<u32>(&three).is_none());
    assert_eq!(cache.peek::<u32>(&other).as_deref(), Some(&9));
}

#[tokio::test]
async fn test_set_data_supersedes_running_fetch() {
    let (cache, _clock) = setup();
    let key = CacheKey::new("account-groups:{}");

    let (gate, fut) = gated::<&'static str>();
    let pending = cache.get(&key, move || fut, &options(30_000)).pending.unwrap();

    cache.set_data(&key, "patched");
    gate.send(Ok("from server")).unwrap();
    pending.wait().await.unwrap();

    assert_eq!(cache.peek::<&'static str>(&key).as_deref(), Some(&"patched"));
}

#[tokio::test]
async fn test_dropping_the_handle_does_not_cancel_the_fetch() {
    let (cache, _clock) = setup();
    let key = CacheKey::new("announcements:{}");

    let (gate, fut) = gated::<u32>();
    drop(cache.get(&key, move || fut, &options(30_000)));

    let joined = cache
        .get(&key, || async { Ok(0u32) }, &options(30_000))
        .pending
        .expect("fetch still in flight");
    gate.send(Ok(5)).unwrap();

    assert_eq!(*joined.wait().await.unwrap(), 5);
    assert_eq!(cache.peek::<u32>(&key).as_deref(), Some(&5));
}

#[tokio::test]
async fn test_invalidate_namespace_spares_longer_sibling_names() {
    let (cache, _clock) = setup();
    let voucher = CacheKey::new("voucher:{}");
    let voucher_types = CacheKey::new("voucher-types:{}");
    cache.set_data(&voucher, 1u32);
    cache.set_data(&voucher_types, 2u32);

    assert_eq!(cache.invalidate(&CacheKey::namespace("voucher")), 1);

    assert!(cache.peek::<u32>(&voucher).is_none());
    assert_eq!(cache.peek::<u32>(&voucher_types).as_deref(), Some(&2));
}

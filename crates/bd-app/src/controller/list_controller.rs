use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bd_core::params::keys;
use bd_core::ports::ErrorReporterPort;
use bd_core::{
    CacheKey, ListEntity, ListEvent, ListParams, ListPhase, ListStateMachine, ParamValue,
    QueryOptions, RecordId,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::view::ListView;
use crate::query_cache::QueryCache;
use crate::resource::{ListPage, ListResource};

struct ControllerState<E: ListEntity> {
    filters: ListParams,
    key: CacheKey,
    phase: ListPhase,
    /// Last good page; kept across failures of the same key
    page: Option<Arc<ListPage<E>>>,
    /// Key `page` was fetched under. Differs from `key` while a placeholder
    /// is shown.
    page_key: Option<CacheKey>,
    is_placeholder: bool,
    last_error: Option<String>,
    /// Only the most recently issued request may update the screen
    request_seq: u64,
    detached: bool,
}

/// Orchestrates one mounted list screen.
/// 单个列表页面的编排器。
///
/// Views go out on a `watch` channel. Once every receiver is dropped, or
/// after [`detach`](Self::detach), nothing more is published and results of
/// requests still in flight are ignored; the requests themselves keep running
/// and still populate the cache.
pub struct ListController<E: ListEntity> {
    cache: Arc<QueryCache>,
    resource: Arc<ListResource<E>>,
    reporter: Arc<dyn ErrorReporterPort>,
    options: QueryOptions,
    state: Mutex<ControllerState<E>>,
    view_tx: watch::Sender<ListView<E>>,
}

impl<E: ListEntity> ListController<E> {
    pub fn new(
        cache: Arc<QueryCache>,
        resource: Arc<ListResource<E>>,
        reporter: Arc<dyn ErrorReporterPort>,
        options: QueryOptions,
        initial_filters: ListParams,
    ) -> (Self, watch::Receiver<ListView<E>>) {
        let key = resource.cache_key(&initial_filters);
        let (view_tx, view_rx) = watch::channel(ListView::initial(initial_filters.clone()));
        let controller = Self {
            cache,
            resource,
            reporter,
            options,
            state: Mutex::new(ControllerState {
                filters: initial_filters,
                key,
                phase: ListPhase::Idle,
                page: None,
                page_key: None,
                is_placeholder: false,
                last_error: None,
                request_seq: 0,
                detached: false,
            }),
            view_tx,
        };
        (controller, view_rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView<E>> {
        self.view_tx.subscribe()
    }

    /// Current view, also available after detaching.
    pub fn view(&self) -> ListView<E> {
        render(&self.lock())
    }

    pub fn filters(&self) -> ListParams {
        self.lock().filters.clone()
    }

    pub fn cache_key(&self) -> CacheKey {
        self.lock().key.clone()
    }

    /// Stop publishing (screen unmounted).
    pub fn detach(&self) {
        self.lock().detached = true;
        info!(resource = E::RESOURCE, "List controller detached");
    }

    pub fn is_detached(&self) -> bool {
        self.lock().detached || self.view_tx.is_closed()
    }

    /// First fetch under the initial filters.
    pub async fn load(&self) -> ListView<E> {
        info!(resource = E::RESOURCE, "Loading list");
        self.run_query(None).await
    }

    /// Merge `patch` into the filters and fetch the new key.
    ///
    /// A `None` value in the patch clears the key. The page goes back to 1
    /// unless the patch names `page`. While the new key loads, the previous
    /// filters' data stays visible when `keep_previous_data` is on.
    pub async fn set_filters(&self, patch: ListParams) -> ListView<E> {
        let previous_key = {
            let mut state = self.lock();
            let previous = state.key.clone();
            state.filters.merge(&patch);
            if !patch.contains_key(keys::PAGE) {
                state.filters.insert(keys::PAGE, Some(ParamValue::UInt(1)));
            }
            let key = self.resource.cache_key(&state.filters);
            state.key = key;
            previous
        };
        debug!(resource = E::RESOURCE, "Filters changed");
        self.run_query(Some(previous_key)).await
    }

    /// Switch to `page`; cached entries of other pages are left alone.
    pub async fn change_page(&self, page: u64) -> ListView<E> {
        let previous_key = {
            let mut state = self.lock();
            let previous = state.key.clone();
            state.filters.insert(keys::PAGE, Some(ParamValue::UInt(page)));
            let key = self.resource.cache_key(&state.filters);
            state.key = key;
            previous
        };
        self.run_query(Some(previous_key)).await
    }

    /// Drop the current key from the cache and fetch it again.
    pub async fn refresh(&self) -> ListView<E> {
        let key = self.cache_key();
        self.cache.invalidate(&key);
        self.run_query(None).await
    }

    /// Replace the item with `id` on the displayed page without a network call.
    ///
    /// When the item is not on the page, falls back to exactly one `refresh`.
    pub async fn patch_item(&self, id: &RecordId, item: E) -> ListView<E> {
        let patched = {
            let mut state = self.lock();
            let owned = !state.is_placeholder && state.page_key.as_ref() == Some(&state.key);
            let page = state.page.clone().filter(|_| owned);
            let position = page
                .as_ref()
                .and_then(|page| page.items.iter().position(|it| it.record_id() == *id));

            match (page, position) {
                (Some(page), Some(index)) => {
                    let mut next: ListPage<E> = (*page).clone();
                    next.items[index] = item;
                    let key = state.key.clone();
                    state.page = Some(self.cache.set_data(&key, next));
                    state.page_key = Some(key);
                    state.phase = ListStateMachine::transition(state.phase, ListEvent::ItemPatched);
                    Some(self.publish(&state))
                }
                _ => None,
            }
        };

        match patched {
            Some(view) => {
                debug!(resource = E::RESOURCE, %id, "Patched item in place");
                view
            }
            None => {
                debug!(resource = E::RESOURCE, %id, "Patched item not on the displayed page; refreshing");
                self.refresh().await
            }
        }
    }

    /// Delete `id` on the backend, then drop every cached page of this
    /// resource and refresh.
    pub async fn remove_item(&self, id: &RecordId) -> ListView<E> {
        match self.resource.delete(id).await {
            Ok(()) => {
                self.cache.invalidate(&self.resource.namespace_key());
                self.refresh().await
            }
            Err(err) => {
                warn!(resource = E::RESOURCE, %id, error = %err, "Delete failed");
                let message = err.user_message();
                self.report(&message);
                let mut state = self.lock();
                state.last_error = Some(message);
                self.publish(&state)
            }
        }
    }

    async fn run_query(&self, previous_key: Option<CacheKey>) -> ListView<E> {
        let (seq, key, params) = {
            let mut state = self.lock();
            state.request_seq += 1;
            (state.request_seq, state.key.clone(), state.filters.clone())
        };

        let options = self.options.clone().with_previous_key(previous_key.clone());
        let resource = Arc::clone(&self.resource);
        let result = self.cache.get::<ListPage<E>, _, _>(
            &key,
            move || async move { resource.list(&params).await },
            &options,
        );

        let view = {
            let mut state = self.lock();
            match result.snapshot.data.clone() {
                Some(data) => {
                    state.page = Some(data);
                    state.page_key = if result.snapshot.is_placeholder {
                        previous_key
                    } else {
                        Some(key.clone())
                    };
                }
                // Same key (refresh): keep showing what we have
                None if state.page_key.as_ref() == Some(&key) => {}
                None => {
                    state.page = None;
                    state.page_key = None;
                }
            }
            state.is_placeholder = result.snapshot.is_placeholder;
            let event = if result.pending.is_some() {
                ListEvent::FetchStarted {
                    has_data: state.page.is_some(),
                }
            } else {
                state.last_error = None;
                ListEvent::FetchSucceeded
            };
            state.phase = ListStateMachine::transition(state.phase, event);
            self.publish(&state)
        };

        let Some(pending) = result.pending else {
            return view;
        };
        let outcome = pending.wait().await;

        let failure = {
            let mut state = self.lock();
            if state.request_seq != seq || state.key != key || state.detached || self.view_tx.is_closed() {
                debug!(resource = E::RESOURCE, %key, "Ignoring result of a superseded or detached request");
                return render(&state);
            }

            match outcome {
                Ok(data) => {
                    // A newer write (patch, refetch) may have replaced what this fetch returned
                    let current = self.cache.peek::<ListPage<E>>(&key).unwrap_or(data);
                    state.page = Some(current);
                    state.page_key = Some(key.clone());
                    state.is_placeholder = false;
                    state.last_error = None;
                    state.phase = ListStateMachine::transition(state.phase, ListEvent::FetchSucceeded);
                    None
                }
                Err(err) => {
                    warn!(resource = E::RESOURCE, %key, error = %err, "List fetch failed");
                    let message = err.user_message();
                    let has_data = state.page.is_some();
                    state.phase = ListStateMachine::transition(state.phase, ListEvent::FetchFailed { has_data });
                    state.last_error = Some(message.clone());
                    Some(message)
                }
            }
        };

        if let Some(message) = failure {
            self.report(&message);
        }
        let state = self.lock();
        self.publish(&state)
    }

    fn report(&self, message: &str) {
        self.reporter.on_error(message);
    }

    fn publish(&self, state: &ControllerState<E>) -> ListView<E> {
        let view = render(state);
        if !state.detached && !self.view_tx.is_closed() {
            self.view_tx.send_replace(view.clone());
        }
        view
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn render<E: ListEntity>(state: &ControllerState<E>) -> ListView<E> {
    ListView::build(
        state.page.as_deref(),
        state.phase,
        state.is_placeholder,
        state.last_error.clone(),
        state.filters.clone(),
    )
}

//! Debounced search controller
//!
//! Sits on top of a keyword [`PageFetcher`] and adds the interactive-search
//! behaviour: rapid keystrokes are debounced so only the final query hits the
//! network, a blank query clears results without a request, and successfully
//! executed queries are recorded in a persisted recent-search history.
//!
//! A new keystroke or an explicit search invalidates any in-flight request:
//! the pending debounce timer is aborted and a generation counter makes sure
//! a stale response can never overwrite newer results.

use crate::error::Error;
use crate::paging::PageFetcher;
use log::warn;
use marlin_rust_core::KeyValueStorage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;

const RECENT_KEY: &str = "recent_searches";
const RECENT_SEPARATOR: char = '|';

/// Immutable snapshot of the search screen.
#[derive(Debug, Clone)]
pub struct SearchState<T: Clone> {
    /// Query the current results belong to (empty when cleared)
    pub query: String,
    pub results: Vec<T>,
    pub is_searching: bool,
    pub last_error: Option<String>,
    /// Most recent first, deduplicated, capped
    pub recent: Vec<String>,
}

impl<T: Clone> SearchState<T> {
    fn new(recent: Vec<String>) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            is_searching: false,
            last_error: None,
            recent,
        }
    }
}

struct SearchInner<F: PageFetcher<Filter = String>> {
    fetcher: F,
    storage: Arc<dyn KeyValueStorage>,
    page_size: u32,
    debounce: Duration,
    recent_limit: usize,
    /// Monotonic id of the newest initiated search; stale completions
    /// compare against it and discard themselves
    generation: AtomicU64,
    pending: StdMutex<Option<AbortHandle>>,
    state: RwLock<SearchState<F::Item>>,
    notify: watch::Sender<SearchState<F::Item>>,
}

/// Debounced keyword search over a paged endpoint.
///
/// Cheap to clone; clones share state.
pub struct SearchController<F: PageFetcher<Filter = String>> {
    inner: Arc<SearchInner<F>>,
}

impl<F: PageFetcher<Filter = String>> Clone for SearchController<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> SearchController<F>
where
    F: PageFetcher<Filter = String> + 'static,
{
    /// Create a controller, loading the persisted recent-search history.
    pub async fn new(
        fetcher: F,
        storage: Arc<dyn KeyValueStorage>,
        page_size: u32,
        debounce: Duration,
        recent_limit: usize,
    ) -> Self {
        let recent = load_recent(storage.as_ref()).await;
        let initial = SearchState::new(recent);
        let (notify, _) = watch::channel(initial.clone());
        Self {
            inner: Arc::new(SearchInner {
                fetcher,
                storage,
                page_size,
                debounce,
                recent_limit,
                generation: AtomicU64::new(0),
                pending: StdMutex::new(None),
                state: RwLock::new(initial),
                notify,
            }),
        }
    }

    /// Current state snapshot.
    pub async fn state(&self) -> SearchState<F::Item> {
        self.inner.state.read().await.clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState<F::Item>> {
        self.inner.notify.subscribe()
    }

    /// Recorded recent queries, most recent first.
    pub async fn recent_searches(&self) -> Vec<String> {
        self.inner.state.read().await.recent.clone()
    }

    /// Feed a keystroke. The search fires only after the debounce window
    /// passes with no further input; a blank query clears the results
    /// immediately without touching the network.
    pub async fn on_input(&self, query: &str) {
        self.cancel_pending();

        let query = query.trim().to_string();
        if query.is_empty() {
            self.clear().await;
            return;
        }

        let controller = self.clone();
        let debounce = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Err(err) = controller.search_now(&query).await {
                warn!("debounced search failed: {}", err);
            }
        });
        let mut pending = lock_pending(&self.inner.pending);
        *pending = Some(handle.abort_handle());
    }

    /// Run the search immediately, bypassing the debounce. Records the query
    /// in the recent-search history on success.
    pub async fn search_now(&self, query: &str) -> Result<(), Error> {
        self.cancel_pending();

        let query = query.trim().to_string();
        if query.is_empty() {
            self.clear().await;
            return Ok(());
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.inner.state.write().await;
            state.query = query.clone();
            state.is_searching = true;
            state.last_error = None;
            self.publish(&state);
        }

        let result = self
            .inner
            .fetcher
            .fetch_page(&query, 1, self.inner.page_size)
            .await;

        let mut state = self.inner.state.write().await;
        // Checked under the state lock: a newer search may have started
        // while this one was in flight, and its result must win
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            return Ok(());
        }
        state.is_searching = false;
        match result {
            Ok(page) => {
                state.results = page.items;
                self.record_recent(&mut state, &query).await;
                self.publish(&state);
                Ok(())
            }
            Err(err) => {
                warn!("search failed: {}", err);
                state.last_error = Some(err.to_string());
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Drop the current query and results, and cancel anything pending.
    /// The recent-search history is kept.
    pub async fn clear(&self) {
        self.cancel_pending();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.inner.state.write().await;
        state.query.clear();
        state.results.clear();
        state.is_searching = false;
        state.last_error = None;
        self.publish(&state);
    }

    /// Forget the persisted recent-search history.
    pub async fn clear_recent(&self) {
        let mut state = self.inner.state.write().await;
        state.recent.clear();
        if let Err(err) = self.inner.storage.remove(RECENT_KEY).await {
            warn!("failed to clear recent searches: {}", err);
        }
        self.publish(&state);
    }

    /// Move `query` to the front of the history, dedupe, cap and persist.
    async fn record_recent(&self, state: &mut SearchState<F::Item>, query: &str) {
        state.recent.retain(|q| q != query);
        state.recent.insert(0, query.to_string());
        state.recent.truncate(self.inner.recent_limit);

        let joined = state
            .recent
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(&RECENT_SEPARATOR.to_string());
        if let Err(err) = self.inner.storage.set(RECENT_KEY, &joined).await {
            warn!("failed to persist recent searches: {}", err);
        }
    }

    fn cancel_pending(&self) {
        let mut pending = lock_pending(&self.inner.pending);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    fn publish(&self, state: &SearchState<F::Item>) {
        self.inner.notify.send_replace(state.clone());
    }
}

fn lock_pending(
    pending: &StdMutex<Option<AbortHandle>>,
) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

async fn load_recent(storage: &dyn KeyValueStorage) -> Vec<String> {
    match storage.get(RECENT_KEY).await {
        Ok(Some(raw)) => raw
            .split(RECENT_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("failed to load recent searches: {}", err);
            Vec::new()
        }
    }
}

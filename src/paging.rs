//! Paged list controller
//!
//! Drives incremental fetch-and-append for list screens: it tracks the
//! current page, the "has more" flag and the loading/refreshing/loading-more
//! states, and guards against overlapping operations. The view layer observes
//! an immutable state snapshot through a watch channel and issues commands
//! back into the controller; it never mutates controller state directly.
//!
//! An operation requested while another one is in flight is silently dropped,
//! not queued. Combined with the debounce cancellation in
//! [`search`](crate::search), results are always applied in request order.

use crate::error::Error;
use async_trait::async_trait;
use log::warn;
use marlin_rust_core::PagedResult;
use tokio::sync::{watch, RwLock};

/// Fetches one page of results for a given filter.
///
/// The filter is an opaque discriminator chosen by the caller (by category,
/// by tag, by search keyword, ...); exactly one filter is active at a time.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Clone + Send + Sync + 'static;
    type Filter: Clone + Send + Sync + 'static;

    async fn fetch_page(
        &self,
        filter: &Self::Filter,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<Self::Item>, Error>;
}

/// Immutable snapshot of a paged list.
///
/// At most one of `is_loading` / `is_loading_more` / `is_refreshing` is true
/// at a time.
#[derive(Debug, Clone)]
pub struct ListState<T: Clone> {
    /// Accumulated items: append order for load-more, replaced wholesale on
    /// load and refresh
    pub items: Vec<T>,
    /// Last successfully requested page (0 before the first load)
    pub current_page: u32,
    /// Whether the server reported further pages
    pub has_more: bool,
    /// First load / reload in progress
    pub is_loading: bool,
    /// Append fetch in progress
    pub is_loading_more: bool,
    /// Pull-to-refresh in progress
    pub is_refreshing: bool,
    /// Displayable message of the last failed operation
    pub last_error: Option<String>,
}

impl<T: Clone> ListState<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            is_refreshing: false,
            last_error: None,
        }
    }

    /// True while any operation is in flight
    pub fn busy(&self) -> bool {
        self.is_loading || self.is_loading_more || self.is_refreshing
    }
}

struct Inner<F: PageFetcher> {
    state: ListState<F::Item>,
    filter: Option<F::Filter>,
}

/// Generic controller for incremental, paginated list screens.
pub struct PagedListController<F: PageFetcher> {
    fetcher: F,
    page_size: u32,
    inner: RwLock<Inner<F>>,
    notify: watch::Sender<ListState<F::Item>>,
}

impl<F: PageFetcher> PagedListController<F> {
    /// Create a controller fetching pages of `page_size` items.
    pub fn new(fetcher: F, page_size: u32) -> Self {
        let initial = ListState::new();
        let (notify, _) = watch::channel(initial.clone());
        Self {
            fetcher,
            page_size,
            inner: RwLock::new(Inner {
                state: initial,
                filter: None,
            }),
            notify,
        }
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Current state snapshot.
    pub async fn state(&self) -> ListState<F::Item> {
        self.inner.read().await.state.clone()
    }

    /// Subscribe to state changes. The receiver yields a fresh snapshot
    /// after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ListState<F::Item>> {
        self.notify.subscribe()
    }

    /// Load page 1 for a new filter, replacing the item list wholesale.
    ///
    /// Dropped silently when another operation is in flight.
    pub async fn load(&self, filter: F::Filter) -> Result<(), Error> {
        {
            let mut inner = self.inner.write().await;
            if inner.state.busy() {
                return Ok(());
            }
            inner.filter = Some(filter.clone());
            inner.state.is_loading = true;
            inner.state.last_error = None;
            self.publish(&inner.state);
        }

        let result = self.fetcher.fetch_page(&filter, 1, self.page_size).await;

        let mut inner = self.inner.write().await;
        inner.state.is_loading = false;
        match result {
            Ok(page) => {
                inner.state.items = page.items;
                inner.state.current_page = 1;
                inner.state.has_more = page.has_next;
                self.publish(&inner.state);
                Ok(())
            }
            Err(err) => {
                warn!("list load failed: {}", err);
                inner.state.last_error = Some(err.to_string());
                self.publish(&inner.state);
                Err(err)
            }
        }
    }

    /// Fetch the next page and append its items.
    ///
    /// Dropped silently when there is nothing more to load, no filter has
    /// been loaded yet, or another operation is in flight. On failure the
    /// page counter is rewound so the next attempt re-requests the same page,
    /// and the item list is left untouched.
    pub async fn load_more(&self) -> Result<(), Error> {
        let (filter, page) = {
            let mut inner = self.inner.write().await;
            if inner.state.busy() || !inner.state.has_more {
                return Ok(());
            }
            let Some(filter) = inner.filter.clone() else {
                return Ok(());
            };
            inner.state.is_loading_more = true;
            inner.state.last_error = None;
            inner.state.current_page += 1;
            let page = inner.state.current_page;
            self.publish(&inner.state);
            (filter, page)
        };

        let result = self.fetcher.fetch_page(&filter, page, self.page_size).await;

        let mut inner = self.inner.write().await;
        inner.state.is_loading_more = false;
        match result {
            Ok(mut page_result) => {
                inner.state.items.append(&mut page_result.items);
                inner.state.has_more = page_result.has_next;
                self.publish(&inner.state);
                Ok(())
            }
            Err(err) => {
                warn!("load more failed: {}", err);
                inner.state.current_page -= 1;
                inner.state.last_error = Some(err.to_string());
                self.publish(&inner.state);
                Err(err)
            }
        }
    }

    /// Re-fetch page 1 under the refreshing flag, so the view can show a
    /// pull-to-refresh spinner instead of the initial-load one.
    ///
    /// On success the item list is replaced wholesale, even when the new
    /// page 1 is shorter than what was displayed; on failure the existing
    /// items are preserved. Dropped silently when another operation is in
    /// flight or nothing has been loaded yet.
    pub async fn refresh(&self) -> Result<(), Error> {
        let filter = {
            let mut inner = self.inner.write().await;
            if inner.state.busy() {
                return Ok(());
            }
            let Some(filter) = inner.filter.clone() else {
                return Ok(());
            };
            inner.state.is_refreshing = true;
            inner.state.last_error = None;
            self.publish(&inner.state);
            filter
        };

        let result = self.fetcher.fetch_page(&filter, 1, self.page_size).await;

        let mut inner = self.inner.write().await;
        inner.state.is_refreshing = false;
        match result {
            Ok(page) => {
                inner.state.items = page.items;
                inner.state.current_page = 1;
                inner.state.has_more = page.has_next;
                self.publish(&inner.state);
                Ok(())
            }
            Err(err) => {
                warn!("refresh failed: {}", err);
                inner.state.last_error = Some(err.to_string());
                self.publish(&inner.state);
                Err(err)
            }
        }
    }

    fn publish(&self, state: &ListState<F::Item>) {
        self.notify.send_replace(state.clone());
    }
}

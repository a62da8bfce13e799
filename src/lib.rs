//! Rust client for the Marlin platform
//!
//! Marlin is split into three hosted services: authentication and user
//! management, news content, and social post scheduling. This crate wires
//! the per-service clients to a shared HTTP stack (fixed timeout, device
//! fingerprint and User-Agent headers) and a shared persisted session, and
//! adds the list controllers UI layers build on: incremental pagination and
//! debounced search with recent-query history.
//!
//! # Example
//!
//! ```no_run
//! use marlin_rust::{Marlin, MarlinConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), marlin_rust::Error> {
//!     let config = MarlinConfig::new(
//!         "https://auth.example.com",
//!         "https://news.example.com",
//!         "https://social.example.com",
//!     );
//!     let marlin = Marlin::new(config)?;
//!
//!     let user = marlin.auth().login("user@example.com", "password123").await?;
//!     println!("signed in as {}", user.name);
//!
//!     let lists = marlin.article_list();
//!     lists.load(marlin_rust::ArticleFilter::All).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod lists;
pub mod paging;
pub mod search;

pub use config::{ClientOptions, MarlinConfig};
pub use error::Error;
pub use lists::{ArticleFilter, ArticleListFetcher, ArticleSearchFetcher, ClientListFetcher, PostListFetcher};
pub use paging::{ListState, PageFetcher, PagedListController};
pub use search::{SearchController, SearchState};

pub use marlin_rust_auth::{AuthClient, AuthError, RegisterParams, ValidationError};
pub use marlin_rust_core::{
    ApiError, DeviceInfo, FileStorage, KeyValueStorage, MemoryStorage, PageRequest, PagedResult,
    Session, SessionStore, UserProfile,
};
pub use marlin_rust_news::{Article, Category, NewsClient, NewsError, Tag};
pub use marlin_rust_social::{ManagedClient, Post, PostStatus, SocialClient, SocialError};

use reqwest::Client;
use std::sync::Arc;

/// Page size for the standard list screens. Search uses
/// [`ClientOptions::search_page_size`] instead.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Entry point: owns the shared HTTP client, storage and session, and hands
/// out the per-service clients and list controllers.
#[derive(Clone)]
pub struct Marlin {
    config: MarlinConfig,
    http_client: Client,
    storage: Arc<dyn KeyValueStorage>,
    session: Arc<SessionStore>,
    auth: AuthClient,
    news: NewsClient,
    social: SocialClient,
}

impl Marlin {
    /// Build the client stack from a configuration.
    ///
    /// Storage is file-backed when [`ClientOptions::storage_path`] is set
    /// and in-memory otherwise; every service client shares the same
    /// session store on top of it.
    pub fn new(config: MarlinConfig) -> Result<Self, Error> {
        let http_client =
            marlin_rust_core::build_http_client(&config.options.device, config.options.request_timeout)
                .map_err(Error::Api)?;

        let storage: Arc<dyn KeyValueStorage> = match &config.options.storage_path {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        let session = Arc::new(SessionStore::new(Arc::clone(&storage)));

        let auth = AuthClient::new(&config.auth_url, http_client.clone(), Arc::clone(&session));
        let news = NewsClient::new(&config.news_url, http_client.clone(), Arc::clone(&session));
        let social = SocialClient::new(&config.social_url, http_client.clone(), Arc::clone(&session));

        Ok(Self {
            config,
            http_client,
            storage,
            session,
            auth,
            news,
            social,
        })
    }

    /// Auth service client
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// News service client
    pub fn news(&self) -> &NewsClient {
        &self.news
    }

    /// Social scheduling service client
    pub fn social(&self) -> &SocialClient {
        &self.social
    }

    /// Shared session store
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Shared key-value storage
    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        Arc::clone(&self.storage)
    }

    /// Shared HTTP client
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Controller for the article list screens (all / by category / by tag).
    pub fn article_list(&self) -> PagedListController<ArticleListFetcher> {
        PagedListController::new(ArticleListFetcher::new(self.news.clone()), DEFAULT_PAGE_SIZE)
    }

    /// Controller for the post list, optionally filtered by managed client.
    pub fn post_list(&self) -> PagedListController<PostListFetcher> {
        PagedListController::new(PostListFetcher::new(self.social.clone()), DEFAULT_PAGE_SIZE)
    }

    /// Controller for the managed-client list.
    pub fn client_list(&self) -> PagedListController<ClientListFetcher> {
        PagedListController::new(ClientListFetcher::new(self.social.clone()), DEFAULT_PAGE_SIZE)
    }

    /// Debounced article search with persisted recent queries.
    pub async fn article_search(&self) -> SearchController<ArticleSearchFetcher> {
        SearchController::new(
            ArticleSearchFetcher::new(self.news.clone()),
            Arc::clone(&self.storage),
            self.config.options.search_page_size,
            self.config.options.search_debounce,
            self.config.options.recent_search_limit,
        )
        .await
    }
}

pub mod prelude {
    //! Convenience re-exports for typical usage
    pub use crate::config::{ClientOptions, MarlinConfig};
    pub use crate::error::Error;
    pub use crate::lists::ArticleFilter;
    pub use crate::paging::{ListState, PageFetcher, PagedListController};
    pub use crate::search::SearchController;
    pub use crate::Marlin;
    pub use marlin_rust_core::{PageRequest, PagedResult, Session, UserProfile};
}

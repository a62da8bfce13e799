//! Adapters plugging the service clients into the list controllers
//!
//! Each fetcher wraps one paged endpoint so it can drive a
//! [`PagedListController`](crate::paging::PagedListController) or a
//! [`SearchController`](crate::search::SearchController).

use crate::error::Error;
use crate::paging::PageFetcher;
use async_trait::async_trait;
use marlin_rust_core::{PageRequest, PagedResult};
use marlin_rust_news::{Article, NewsClient};
use marlin_rust_social::{ManagedClient, Post, SocialClient};

/// Which article listing to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleFilter {
    /// Role-scoped default feed
    All,
    /// Articles in one category
    Category(i64),
    /// Articles carrying one tag
    Tag(String),
}

/// Paged article listings, switched by [`ArticleFilter`].
pub struct ArticleListFetcher {
    news: NewsClient,
}

impl ArticleListFetcher {
    pub fn new(news: NewsClient) -> Self {
        Self { news }
    }
}

#[async_trait]
impl PageFetcher for ArticleListFetcher {
    type Item = Article;
    type Filter = ArticleFilter;

    async fn fetch_page(
        &self,
        filter: &ArticleFilter,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<Article>, Error> {
        let request = PageRequest::new(page, page_size);
        let articles = self.news.articles();
        let result = match filter {
            ArticleFilter::All => articles.list(request).await?,
            ArticleFilter::Category(id) => articles.list_by_category(*id, request).await?,
            ArticleFilter::Tag(slug) => articles.list_by_tag(slug, request).await?,
        };
        Ok(result)
    }
}

/// Keyword search over articles, for the search controller.
pub struct ArticleSearchFetcher {
    news: NewsClient,
}

impl ArticleSearchFetcher {
    pub fn new(news: NewsClient) -> Self {
        Self { news }
    }
}

#[async_trait]
impl PageFetcher for ArticleSearchFetcher {
    type Item = Article;
    type Filter = String;

    async fn fetch_page(
        &self,
        keyword: &String,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<Article>, Error> {
        let result = self
            .news
            .articles()
            .search(keyword, PageRequest::new(page, page_size))
            .await?;
        Ok(result)
    }
}

/// Paged post listings, optionally narrowed to one managed client.
pub struct PostListFetcher {
    social: SocialClient,
}

impl PostListFetcher {
    pub fn new(social: SocialClient) -> Self {
        Self { social }
    }
}

#[async_trait]
impl PageFetcher for PostListFetcher {
    type Item = Post;
    type Filter = Option<i64>;

    async fn fetch_page(
        &self,
        client_id: &Option<i64>,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<Post>, Error> {
        let result = self
            .social
            .posts()
            .list(*client_id, PageRequest::new(page, page_size))
            .await?;
        Ok(result)
    }
}

/// Paged managed-client listings.
pub struct ClientListFetcher {
    social: SocialClient,
}

impl ClientListFetcher {
    pub fn new(social: SocialClient) -> Self {
        Self { social }
    }
}

#[async_trait]
impl PageFetcher for ClientListFetcher {
    type Item = ManagedClient;
    type Filter = ();

    async fn fetch_page(
        &self,
        _filter: &(),
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<ManagedClient>, Error> {
        let result = self
            .social
            .clients()
            .list(PageRequest::new(page, page_size))
            .await?;
        Ok(result)
    }
}

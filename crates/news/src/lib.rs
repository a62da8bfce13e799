//! Marlin news client for Rust
//!
//! Paginated article listings (by role, category, tag and keyword search)
//! plus category and tag administration, including the tag merge operation.

pub mod types;

pub use types::{Article, ArticleInput, Category, CategoryInput, Tag, TagInput};

use marlin_rust_core::{ApiError, Fetch, PageRequest, PagedResult, SessionStore};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

/// ニュースサービスのエラー型
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Cannot merge a tag into itself")]
    InvalidMerge,

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// ニュースサービスクライアント
#[derive(Clone)]
pub struct NewsClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl NewsClient {
    /// 新しい NewsClient を作成
    pub fn new(base_url: &str, http_client: Client, session: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
        }
    }

    /// セッションストアへの参照を取得
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// 記事 API を取得
    pub fn articles(&self) -> ArticlesApi<'_> {
        ArticlesApi { client: self }
    }

    /// カテゴリ API を取得
    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi { client: self }
    }

    /// タグ API を取得
    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi { client: self }
    }

    /// 記事画像の URL を解決
    ///
    /// 絶対 URL はそのまま、ファイル名は `{base}/images/{name}` に展開する。
    pub fn image_url(&self, image_name: Option<&str>) -> Option<String> {
        let name = image_name?.trim();
        if name.is_empty() {
            return None;
        }
        if name.starts_with("http://") || name.starts_with("https://") {
            return Some(name.to_string());
        }
        Some(format!("{}/images/{}", self.base_url, name))
    }
}

/// 記事 API
pub struct ArticlesApi<'a> {
    client: &'a NewsClient,
}

impl ArticlesApi<'_> {
    /// ロールに応じたデフォルトの記事一覧
    pub async fn list(&self, page: PageRequest) -> Result<PagedResult<Article>, NewsError> {
        let url = format!("{}/articles", self.client.base_url);
        self.paged(&url, page, &[]).await
    }

    /// カテゴリ別の記事一覧
    pub async fn list_by_category(
        &self,
        category_id: i64,
        page: PageRequest,
    ) -> Result<PagedResult<Article>, NewsError> {
        let url = format!("{}/articles/category/{}", self.client.base_url, category_id);
        self.paged(&url, page, &[]).await
    }

    /// タグ別の記事一覧
    pub async fn list_by_tag(
        &self,
        tag_slug: &str,
        page: PageRequest,
    ) -> Result<PagedResult<Article>, NewsError> {
        let url = format!("{}/articles/tag/{}", self.client.base_url, tag_slug);
        self.paged(&url, page, &[]).await
    }

    /// キーワード検索
    pub async fn search(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<PagedResult<Article>, NewsError> {
        let url = format!("{}/articles/search", self.client.base_url);
        self.paged(&url, page, &[("keyword", keyword)]).await
    }

    /// 記事を1件取得
    pub async fn get(&self, article_id: i64) -> Result<Article, NewsError> {
        let url = format!("{}/articles/{}", self.client.base_url, article_id);
        let article = Fetch::get(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(article)
    }

    /// 記事を作成
    pub async fn create(&self, input: &ArticleInput) -> Result<Article, NewsError> {
        let url = format!("{}/articles", self.client.base_url);
        let article = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(article)
    }

    /// 記事を更新
    pub async fn update(&self, article_id: i64, input: &ArticleInput) -> Result<Article, NewsError> {
        let url = format!("{}/articles/{}", self.client.base_url, article_id);
        let article = Fetch::put(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(article)
    }

    /// 記事を削除
    pub async fn delete(&self, article_id: i64) -> Result<(), NewsError> {
        let url = format!("{}/articles/{}", self.client.base_url, article_id);
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }

    async fn paged(
        &self,
        url: &str,
        page: PageRequest,
        extra: &[(&str, &str)],
    ) -> Result<PagedResult<Article>, NewsError> {
        let mut builder = Fetch::get(&self.client.http_client, url)
            .query("page", &page.page.to_string())
            .query("pageSize", &page.page_size.to_string())
            .session(&self.client.session);

        for (key, value) in extra {
            builder = builder.query(key, value);
        }

        let result = builder.execute().await?;
        Ok(result)
    }
}

/// カテゴリ API
pub struct CategoriesApi<'a> {
    client: &'a NewsClient,
}

impl CategoriesApi<'_> {
    /// カテゴリ一覧を取得
    pub async fn list(&self) -> Result<Vec<Category>, NewsError> {
        let url = format!("{}/categories", self.client.base_url);
        let categories = Fetch::get(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(categories)
    }

    /// カテゴリを作成
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, NewsError> {
        let url = format!("{}/categories", self.client.base_url);
        let category = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(category)
    }

    /// カテゴリを更新
    pub async fn update(
        &self,
        category_id: i64,
        input: &CategoryInput,
    ) -> Result<Category, NewsError> {
        let url = format!("{}/categories/{}", self.client.base_url, category_id);
        let category = Fetch::put(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(category)
    }

    /// カテゴリを削除
    pub async fn delete(&self, category_id: i64) -> Result<(), NewsError> {
        let url = format!("{}/categories/{}", self.client.base_url, category_id);
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }
}

/// タグ API
pub struct TagsApi<'a> {
    client: &'a NewsClient,
}

impl TagsApi<'_> {
    /// タグ一覧を取得
    pub async fn list(&self) -> Result<Vec<Tag>, NewsError> {
        let url = format!("{}/tags", self.client.base_url);
        let tags = Fetch::get(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(tags)
    }

    /// タグを作成
    pub async fn create(&self, input: &TagInput) -> Result<Tag, NewsError> {
        let url = format!("{}/tags", self.client.base_url);
        let tag = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(tag)
    }

    /// タグを更新
    pub async fn update(&self, tag_id: i64, input: &TagInput) -> Result<Tag, NewsError> {
        let url = format!("{}/tags/{}", self.client.base_url, tag_id);
        let tag = Fetch::put(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(tag)
    }

    /// タグを削除
    pub async fn delete(&self, tag_id: i64) -> Result<(), NewsError> {
        let url = format!("{}/tags/{}", self.client.base_url, tag_id);
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }

    /// タグをマージ
    ///
    /// source のコンテンツを target に付け替えた上で source を削除する。
    /// 同一タグへのマージはネットワークに出る前に拒否される。
    pub async fn merge(&self, source_id: i64, target_id: i64) -> Result<(), NewsError> {
        if source_id == target_id {
            return Err(NewsError::InvalidMerge);
        }

        let url = format!("{}/tags/merge", self.client.base_url);
        let payload = serde_json::json!({
            "sourceId": source_id,
            "targetId": target_id,
        });

        Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(&payload)?
            .execute_empty()
            .await?;
        Ok(())
    }
}

//! Marlin social scheduling client for Rust
//!
//! CRUD for managed clients and their connected networks, plus creation,
//! scheduling and publication of social-media posts, including the
//! date-range query backing the calendar view.

pub mod types;

pub use types::{ClientInput, ClientNetwork, ManagedClient, Post, PostInput, PostStatus};

use chrono::{DateTime, Utc};
use marlin_rust_core::{ApiError, Fetch, PageRequest, PagedResult, SessionStore};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

/// ソーシャルサービスのエラー型
#[derive(Error, Debug)]
pub enum SocialError {
    #[error("Scheduled posts require a scheduled time")]
    MissingSchedule,

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// ソーシャルサービスクライアント
#[derive(Clone)]
pub struct SocialClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl SocialClient {
    /// 新しい SocialClient を作成
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

    /// クライアント API を取得
    pub fn clients(&self) -> ClientsApi<'_> {
        ClientsApi { client: self }
    }

    /// 投稿 API を取得
    pub fn posts(&self) -> PostsApi<'_> {
        PostsApi { client: self }
    }
}

/// 管理対象クライアント API
pub struct ClientsApi<'a> {
    client: &'a SocialClient,
}

impl ClientsApi<'_> {
    /// クライアント一覧（ページング）
    pub async fn list(&self, page: PageRequest) -> Result<PagedResult<ManagedClient>, SocialError> {
        let url = format!("{}/clients", self.client.base_url);
        let result = Fetch::get(&self.client.http_client, &url)
            .query("page", &page.page.to_string())
            .query("pageSize", &page.page_size.to_string())
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(result)
    }

    /// クライアントを作成
    pub async fn create(&self, input: &ClientInput) -> Result<ManagedClient, SocialError> {
        let url = format!("{}/clients", self.client.base_url);
        let created = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(created)
    }

    /// クライアントを更新
    pub async fn update(&self, id: i64, input: &ClientInput) -> Result<ManagedClient, SocialError> {
        let url = format!("{}/clients/{}", self.client.base_url, id);
        let updated = Fetch::put(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(updated)
    }

    /// クライアントを削除
    pub async fn delete(&self, id: i64) -> Result<(), SocialError> {
        let url = format!("{}/clients/{}", self.client.base_url, id);
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }

    /// 接続済みネットワーク一覧
    pub async fn networks(&self, client_id: i64) -> Result<Vec<ClientNetwork>, SocialError> {
        let url = format!("{}/clients/{}/networks", self.client.base_url, client_id);
        let networks = Fetch::get(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(networks)
    }

    /// ネットワーク接続を解除
    pub async fn disconnect_network(
        &self,
        client_id: i64,
        network_id: i64,
    ) -> Result<(), SocialError> {
        let url = format!(
            "{}/clients/{}/networks/{}",
            self.client.base_url, client_id, network_id
        );
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }
}

/// 投稿 API
pub struct PostsApi<'a> {
    client: &'a SocialClient,
}

impl PostsApi<'_> {
    /// 投稿一覧（ページング・クライアントで絞り込み可）
    pub async fn list(
        &self,
        client_id: Option<i64>,
        page: PageRequest,
    ) -> Result<PagedResult<Post>, SocialError> {
        let url = format!("{}/posts", self.client.base_url);
        let mut builder = Fetch::get(&self.client.http_client, &url)
            .query("page", &page.page.to_string())
            .query("pageSize", &page.page_size.to_string())
            .session(&self.client.session);

        if let Some(client_id) = client_id {
            builder = builder.query("clientId", &client_id.to_string());
        }

        let result = builder.execute().await?;
        Ok(result)
    }

    /// 投稿を1件取得
    pub async fn get(&self, id: i64) -> Result<Post, SocialError> {
        let url = format!("{}/posts/{}", self.client.base_url, id);
        let post = Fetch::get(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(post)
    }

    /// 投稿を作成（下書きまたは予約投稿）
    pub async fn create(&self, input: &PostInput) -> Result<Post, SocialError> {
        Self::check_schedule(input)?;

        let url = format!("{}/posts", self.client.base_url);
        let created = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(created)
    }

    /// 投稿を更新
    pub async fn update(&self, id: i64, input: &PostInput) -> Result<Post, SocialError> {
        Self::check_schedule(input)?;

        let url = format!("{}/posts/{}", self.client.base_url, id);
        let updated = Fetch::put(&self.client.http_client, &url)
            .session(&self.client.session)
            .json(input)?
            .execute()
            .await?;
        Ok(updated)
    }

    /// 投稿を削除
    pub async fn delete(&self, id: i64) -> Result<(), SocialError> {
        let url = format!("{}/posts/{}", self.client.base_url, id);
        Fetch::delete(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute_empty()
            .await?;
        Ok(())
    }

    /// 投稿を即時発行
    pub async fn publish(&self, id: i64) -> Result<Post, SocialError> {
        let url = format!("{}/posts/{}/publish", self.client.base_url, id);
        let post = Fetch::post(&self.client.http_client, &url)
            .session(&self.client.session)
            .execute()
            .await?;
        Ok(post)
    }

    /// カレンダー表示用の期間指定クエリ
    pub async fn calendar(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        client_id: Option<i64>,
    ) -> Result<Vec<Post>, SocialError> {
        let url = format!("{}/posts/calendar", self.client.base_url);
        let mut builder = Fetch::get(&self.client.http_client, &url)
            .query("from", &from.to_rfc3339())
            .query("to", &to.to_rfc3339())
            .session(&self.client.session);

        if let Some(client_id) = client_id {
            builder = builder.query("clientId", &client_id.to_string());
        }

        let posts = builder.execute().await?;
        Ok(posts)
    }

    // 予約投稿には予約日時が必須
    fn check_schedule(input: &PostInput) -> Result<(), SocialError> {
        if input.status == PostStatus::Scheduled && input.scheduled_at.is_none() {
            return Err(SocialError::MissingSchedule);
        }
        Ok(())
    }
}

//! Marlin auth client for Rust
//!
//! This crate provides authentication functionality for the Marlin platform,
//! including login, registration, password recovery, and profile management.
//! Successful logins persist the session through the shared
//! [`SessionStore`](marlin_rust_core::SessionStore).

pub mod types;
pub mod validate;

pub use types::{
    ChangePasswordParams, ImageUploadResponse, RegisterParams, ResetPasswordParams, Role,
};
pub use validate::ValidationError;

use log::{debug, warn};
use marlin_rust_core::{ApiError, Fetch, PageRequest, PagedResult, Session, SessionStore, UserProfile};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

/// 認証エラー型
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing auth token")]
    MissingToken,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// 認証サービスクライアント
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl AuthClient {
    /// 新しい AuthClient を作成
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

    /// メール・パスワードでログイン
    ///
    /// 成功時のみトークンとプロフィールを永続化する。失敗時は何も
    /// 保存されない。
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        validate::email(email)?;
        validate::required("password", password)?;

        let url = format!("{}/login", self.base_url);
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let result = Fetch::post(&self.http_client, &url)
            .json(&payload)?
            .execute::<Session>()
            .await;

        let session = match result {
            Ok(session) => session,
            Err(ApiError::Unauthorized(_)) => return Err(AuthError::InvalidCredentials),
            Err(err) => return Err(AuthError::Api(err)),
        };

        // セッションを保存
        self.session.save_session(&session).await?;
        debug!("logged in as user {}", session.user.id);

        Ok(session.user)
    }

    /// サインアウト
    ///
    /// 永続化されたトークンとプロフィールを無条件に削除する。冪等。
    pub async fn logout(&self) {
        self.session.clear().await;
    }

    /// 空でないトークンが保存されていれば true
    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// キャッシュ済みプロフィールを取得
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.session.current_user().await
    }

    /// ユーザー登録
    ///
    /// 登録後のログインは別ステップ。ここでは何も永続化しない。
    pub async fn register(&self, params: &RegisterParams) -> Result<UserProfile, AuthError> {
        validate::name(&params.name)?;
        validate::email(&params.email)?;
        validate::password(&params.password)?;
        validate::passwords_match(&params.password, &params.confirm_password)?;

        let url = format!("{}/register", self.base_url);
        let user = Fetch::post(&self.http_client, &url)
            .json(params)?
            .execute::<UserProfile>()
            .await?;

        Ok(user)
    }

    /// パスワード再設定メールの送信
    pub async fn send_password_recovery(&self, email: &str) -> Result<bool, AuthError> {
        validate::email(email)?;

        let url = format!("{}/password-recovery", self.base_url);
        let payload = serde_json::json!({ "email": email });

        let success = Fetch::post(&self.http_client, &url)
            .json(&payload)?
            .execute::<bool>()
            .await?;

        Ok(success)
    }

    /// リカバリハッシュによるパスワード再設定
    ///
    /// 認証不要のフロー。同一アカウントの他のアクティブなセッションは
    /// サービス側で無効化されない（現行の挙動）。
    pub async fn reset_password_with_hash(
        &self,
        hash: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<bool, AuthError> {
        validate::required("recovery hash", hash)?;
        validate::password(new_password)?;
        validate::passwords_match(new_password, confirmation)?;

        let url = format!("{}/password-reset", self.base_url);
        let params = ResetPasswordParams {
            hash: hash.to_string(),
            new_password: new_password.to_string(),
        };

        let success = Fetch::post(&self.http_client, &url)
            .json(&params)?
            .execute::<bool>()
            .await?;

        Ok(success)
    }

    /// プロフィール更新
    ///
    /// 成功時は返されたプロフィールをストアに書き戻す。
    pub async fn update_profile(&self, user: &UserProfile) -> Result<UserProfile, AuthError> {
        self.require_token().await?;
        validate::name(&user.name)?;
        validate::email(&user.email)?;

        let url = format!("{}/user", self.base_url);
        let updated = Fetch::put(&self.http_client, &url)
            .session(&self.session)
            .json(user)?
            .execute::<UserProfile>()
            .await?;

        self.session.save_user(&updated).await?;
        Ok(updated)
    }

    /// パスワード変更（認証済みユーザー）
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<bool, AuthError> {
        self.require_token().await?;
        validate::required("current password", old_password)?;
        validate::password(new_password)?;
        validate::passwords_match(new_password, confirmation)?;

        let url = format!("{}/user/password", self.base_url);
        let params = ChangePasswordParams {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };

        let success = Fetch::post(&self.http_client, &url)
            .session(&self.session)
            .json(&params)?
            .execute::<bool>()
            .await?;

        Ok(success)
    }

    /// プロフィール画像のアップロード（マルチパート）
    ///
    /// 成功時はキャッシュ済みプロフィールの画像URLも更新する。
    pub async fn upload_profile_image(
        &self,
        data: Vec<u8>,
        file_name: &str,
    ) -> Result<String, AuthError> {
        self.require_token().await?;

        let part = Part::bytes(data).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let url = format!("{}/user/image", self.base_url);
        let response = Fetch::post(&self.http_client, &url)
            .session(&self.session)
            .multipart(form)
            .execute::<ImageUploadResponse>()
            .await?;

        if let Some(mut user) = self.session.current_user().await {
            user.image_url = Some(response.image_url.clone());
            if let Err(err) = self.session.save_user(&user).await {
                warn!("failed to update cached profile image: {}", err);
            }
        }

        Ok(response.image_url)
    }

    /// パスワードが設定済みかを確認
    pub async fn has_password(&self) -> Result<bool, AuthError> {
        self.require_token().await?;

        let url = format!("{}/user/has-password", self.base_url);
        let result = Fetch::get(&self.http_client, &url)
            .session(&self.session)
            .execute::<bool>()
            .await?;

        Ok(result)
    }

    /// ユーザー検索（管理画面のページングリスト）
    pub async fn search_users(
        &self,
        keyword: Option<&str>,
        page: PageRequest,
    ) -> Result<PagedResult<UserProfile>, AuthError> {
        self.require_token().await?;

        let url = format!("{}/users", self.base_url);
        let mut builder = Fetch::get(&self.http_client, &url)
            .query("page", &page.page.to_string())
            .query("pageSize", &page.page_size.to_string())
            .session(&self.session);

        if let Some(keyword) = keyword {
            builder = builder.query("keyword", keyword);
        }

        let result = builder.execute().await?;
        Ok(result)
    }

    /// ロール一覧を取得
    pub async fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        self.require_token().await?;

        let url = format!("{}/roles", self.base_url);
        let roles = Fetch::get(&self.http_client, &url)
            .session(&self.session)
            .execute()
            .await?;

        Ok(roles)
    }

    /// ユーザーのロールを設定
    pub async fn set_user_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<(), AuthError> {
        self.require_token().await?;

        let url = format!("{}/user/{}/roles", self.base_url, user_id);
        let payload = serde_json::json!({ "roleIds": role_ids });

        Fetch::put(&self.http_client, &url)
            .session(&self.session)
            .json(&payload)?
            .execute_empty()
            .await?;

        Ok(())
    }

    async fn require_token(&self) -> Result<(), AuthError> {
        if self.session.is_authenticated().await {
            Ok(())
        } else {
            Err(AuthError::MissingToken)
        }
    }
}

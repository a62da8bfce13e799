//! Session state and durable session persistence

use crate::error::ApiError;
use crate::storage::KeyValueStorage;
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TOKEN_KEY: &str = "auth_token";
const USER_KEY: &str = "current_user";

/// ユーザープロフィール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// ログイン結果のセッション情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// セッションストア
///
/// 現在のベアラートークンとキャッシュ済みプロフィールを所有し、
/// 永続ストレージに保存する。トークンが存在すること ⇔ 認証済み。
/// プロフィールは便宜的なキャッシュであり、存在しないこともある。
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// 新しい SessionStore を作成
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// ログイン成功時のセッションを保存
    ///
    /// トークンとプロフィールの両方を永続化してから復帰する。プロフィールを
    /// 先に書き、失敗した保存がトークンだけ残すことがないようにする。
    pub async fn save_session(&self, session: &Session) -> Result<(), ApiError> {
        self.save_user(&session.user).await?;
        self.save_token(&session.token).await?;
        Ok(())
    }

    /// トークンを保存
    pub async fn save_token(&self, token: &str) -> Result<(), ApiError> {
        self.storage.set(TOKEN_KEY, token).await
    }

    /// 現在のトークンを取得（読み取りエラーは未認証として扱う）
    pub async fn get_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(err) => {
                warn!("failed to read auth token: {}", err);
                None
            }
        }
    }

    /// 空でないトークンが保存されていれば true
    pub async fn is_authenticated(&self) -> bool {
        self.get_token().await.is_some_and(|token| !token.is_empty())
    }

    /// キャッシュ済みプロフィールを取得（ネットワーク再取得はしない）
    pub async fn current_user(&self) -> Option<UserProfile> {
        let json = match self.storage.get(USER_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                warn!("failed to read cached user: {}", err);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("cached user is not valid JSON: {}", err);
                None
            }
        }
    }

    /// プロフィールを保存（プロフィール更新フローの書き戻し）
    pub async fn save_user(&self, user: &UserProfile) -> Result<(), ApiError> {
        let json = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &json).await
    }

    /// トークンとプロフィールを無条件に削除
    ///
    /// 冪等であり、失敗しない。ストレージのエラーはログに残して握りつぶす。
    pub async fn clear(&self) {
        if let Err(err) = self.storage.remove(TOKEN_KEY).await {
            warn!("failed to remove auth token: {}", err);
        }
        if let Err(err) = self.storage.remove(USER_KEY).await {
            warn!("failed to remove cached user: {}", err);
        }
    }
}

//! Request and response types for the auth service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 新規登録パラメータ
///
/// `confirm_password` はクライアント側検証にのみ使われ、送信されない。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_document: Option<String>,
}

/// パスワード変更パラメータ
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordParams {
    pub old_password: String,
    pub new_password: String,
}

/// リカバリハッシュによるパスワード再設定パラメータ
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordParams {
    pub hash: String,
    pub new_password: String,
}

/// プロフィール画像アップロードのレスポンス
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

/// ロール情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
}

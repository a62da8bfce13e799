//! Error handling shared by the Marlin service clients

use thiserror::Error;

/// API エラー型
///
/// すべてのサービスクライアントが返す共通のエラー。リトライは行わず、
/// 失敗はその試行で終了する。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

//! Authenticated HTTP helper shared by the Marlin service clients

use crate::device::DeviceInfo;
use crate::error::ApiError;
use crate::session::SessionStore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// デフォルトのリクエストタイムアウト（30秒）
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 共有 HTTP クライアントを構築
///
/// Accept / User-Agent / X-Device-Fingerprint を全リクエストに付与し、
/// 固定タイムアウトを設定する。リトライやバックオフは持たない。
pub fn build_http_client(device: &DeviceInfo, timeout: Duration) -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&device.user_agent()) {
        headers.insert(USER_AGENT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&device.fingerprint()) {
        headers.insert("X-Device-Fingerprint", value);
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// リクエストを組み立てて実行するヘルパー
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    query: Vec<(String, String)>,
    json_body: Option<Vec<u8>>,
    form: Option<Form>,
    session: Option<&'a SessionStore>,
}

impl<'a> FetchBuilder<'a> {
    /// 新しい FetchBuilder を作成
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            query: Vec::new(),
            json_body: None,
            form: None,
            session: None,
        }
    }

    /// クエリパラメータを追加
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// JSON ボディを設定
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.json_body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// マルチパートフォームを設定
    pub fn multipart(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    /// セッションストアを関連付ける
    ///
    /// トークンは送信時点で読み直すため、ローテーション後の呼び出しには
    /// 新しいトークンが付く。トークンが無ければヘッダーは単に省略される。
    pub fn session(mut self, store: &'a SessionStore) -> Self {
        self.session = Some(store);
        self
    }

    /// リクエストを送信して生のレスポンスを返す
    pub async fn send(self) -> Result<reqwest::Response, ApiError> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method, url.as_str());

        if let Some(store) = self.session {
            if let Some(token) = store.get_token().await {
                if !token.is_empty() {
                    req = req.bearer_auth(token);
                }
            }
        }

        if let Some(body) = self.json_body {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        if let Some(form) = self.form {
            req = req.multipart(form);
        }

        let response = req.send().await?;
        Ok(response)
    }

    /// リクエストを実行し、レスポンスを JSON としてパース
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = check_status(self.send().await?).await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }

    /// レスポンスボディを無視して実行
    pub async fn execute_empty(self) -> Result<(), ApiError> {
        check_status(self.send().await?).await?;
        Ok(())
    }
}

/// ステータスコードをエラー分類に変換
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        code => ApiError::Status {
            status: code,
            message,
        },
    })
}

/// HTTP リクエスト作成のエントリポイント
pub struct Fetch;

impl Fetch {
    /// GET リクエストを作成
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// POST リクエストを作成
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// PUT リクエストを作成
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// DELETE リクエストを作成
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

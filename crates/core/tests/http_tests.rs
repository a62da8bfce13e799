use marlin_rust_core::{
    build_http_client, ApiError, DeviceInfo, Fetch, MemoryStorage, SessionStore, DEFAULT_TIMEOUT,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn device() -> DeviceInfo {
    DeviceInfo::detect("marlin", "1.0.0")
        .with_platform("android")
        .with_os_version("14")
        .with_manufacturer("samsung")
        .with_model("sm-s921b")
}

#[tokio::test]
async fn test_default_headers_on_every_request() {
    // モックサーバーの起動
    let mock_server = MockServer::start().await;

    let fingerprint = device().fingerprint();
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("Accept", "application/json"))
        .and(header("X-Device-Fingerprint", fingerprint.as_str()))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client(&device(), DEFAULT_TIMEOUT).unwrap();
    let url = format!("{}/ping", mock_server.uri());
    let body: serde_json::Value = Fetch::get(&client, &url).execute().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_bearer_token_attached_at_send_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer rotated-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = SessionStore::new(Arc::new(MemoryStorage::new()));
    // 構築後にトークンを回転させても、送信時点の値が付く
    store.save_token("stale-token").await.unwrap();
    store.save_token("rotated-token").await.unwrap();

    let client = build_http_client(&device(), DEFAULT_TIMEOUT).unwrap();
    let url = format!("{}/me", mock_server.uri());
    let _: serde_json::Value = Fetch::get(&client, &url)
        .session(&store)
        .execute()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_token_omits_authorization_header() {
    let mock_server = MockServer::start().await;

    // Authorization ヘッダーが付くとマッチしない
    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let store = SessionStore::new(Arc::new(MemoryStorage::new()));
    let client = build_http_client(&device(), DEFAULT_TIMEOUT).unwrap();
    let url = format!("{}/articles", mock_server.uri());
    let _: serde_json::Value = Fetch::get(&client, &url)
        .session(&store)
        .execute()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_status_codes_map_to_error_taxonomy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/unauthorized"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&device(), DEFAULT_TIMEOUT).unwrap();

    let url = format!("{}/unauthorized", mock_server.uri());
    let err = Fetch::get(&client, &url)
        .execute::<serde_json::Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let url = format!("{}/missing", mock_server.uri());
    let err = Fetch::get(&client, &url)
        .execute::<serde_json::Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let url = format!("{}/broken", mock_server.uri());
    let err = Fetch::get(&client, &url)
        .execute::<serde_json::Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_request_timeout_maps_to_timeout_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    // テスト用に短いタイムアウトを設定
    let client = build_http_client(&device(), std::time::Duration::from_millis(50)).unwrap();
    let url = format!("{}/slow", mock_server.uri());
    let err = Fetch::get(&client, &url)
        .execute::<serde_json::Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout));
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/search"))
        .and(query_param("keyword", "pesca artesanal"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client(&device(), DEFAULT_TIMEOUT).unwrap();
    let url = format!("{}/articles/search", mock_server.uri());
    let _: serde_json::Value = Fetch::get(&client, &url)
        .query("keyword", "pesca artesanal")
        .query("page", "1")
        .execute()
        .await
        .unwrap();
}

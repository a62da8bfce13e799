use marlin_rust_core::{ApiError, MemoryStorage, PageRequest, SessionStore};
use marlin_rust_news::{NewsClient, NewsError, TagInput};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(uri: &str) -> NewsClient {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    NewsClient::new(uri, reqwest::Client::new(), store)
}

fn article(id: i64, title: &str) -> serde_json::Value {
    json!({ "articleId": id, "title": title })
}

fn page_body(items: Vec<serde_json::Value>, current: u32, total_pages: u32) -> serde_json::Value {
    json!({
        "items": items,
        "totalCount": 25,
        "currentPage": current,
        "totalPages": total_pages,
        "hasNext": current < total_pages,
        "hasPrevious": current > 1
    })
}

#[tokio::test]
async fn test_list_sends_paging_params() {
    // モックサーバーの起動
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![article(1, "A"), article(2, "B"), article(3, "C")],
            1,
            3,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    let result = news.articles().list(PageRequest::first(10)).await.unwrap();

    assert_eq!(result.items.len(), 3);
    assert_eq!(result.items[0].title, "A");
    assert!(result.has_next);
    assert_eq!(result.total_count, 25);
}

#[tokio::test]
async fn test_list_by_category_and_tag_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/category/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![], 1, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles/tag/pesca"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![], 1, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    news.articles()
        .list_by_category(42, PageRequest::first(10))
        .await
        .unwrap();
    news.articles()
        .list_by_tag("pesca", PageRequest::first(10))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_sends_keyword() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/search"))
        .and(query_param("keyword", "barco"))
        .and(query_param("pageSize", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![article(9, "Barco novo")],
            1,
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    let result = news
        .articles()
        .search("barco", PageRequest::first(50))
        .await
        .unwrap();
    assert_eq!(result.items.len(), 1);
}

#[tokio::test]
async fn test_bearer_token_attached_when_authenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(header("Authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![], 1, 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    news.session().save_token("token-abc").await.unwrap();
    news.articles().list(PageRequest::first(10)).await.unwrap();
}

#[tokio::test]
async fn test_get_missing_article_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    let err = news.articles().get(999).await.unwrap_err();
    assert!(matches!(err, NewsError::Api(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_tag_merge_posts_source_and_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tags/merge"))
        .and(body_partial_json(json!({ "sourceId": 3, "targetId": 5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    news.tags().merge(3, 5).await.unwrap();
}

#[tokio::test]
async fn test_tag_merge_into_itself_is_rejected_client_side() {
    let mock_server = MockServer::start().await;

    // 同一タグへのマージはリクエストが飛ばない
    Mock::given(method("POST"))
        .and(path("/tags/merge"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    let err = news.tags().merge(3, 3).await.unwrap_err();
    assert!(matches!(err, NewsError::InvalidMerge));
}

#[tokio::test]
async fn test_tag_crud_roundtrip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tags"))
        .and(body_partial_json(json!({ "name": "Pesca", "slug": "pesca" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tagId": 3,
            "name": "Pesca",
            "slug": "pesca"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tags/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let news = client(&mock_server.uri());
    let tag = news
        .tags()
        .create(&TagInput {
            name: "Pesca".to_string(),
            slug: "pesca".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(tag.tag_id, 3);

    news.tags().delete(3).await.unwrap();
}

#[test]
fn test_image_url_resolution() {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    let news = NewsClient::new("https://news.example.com/", reqwest::Client::new(), store);

    // 絶対 URL はそのまま
    assert_eq!(
        news.image_url(Some("https://cdn.example.com/a.jpg")).as_deref(),
        Some("https://cdn.example.com/a.jpg")
    );
    // ファイル名はベース URL に展開される
    assert_eq!(
        news.image_url(Some("a.jpg")).as_deref(),
        Some("https://news.example.com/images/a.jpg")
    );
    // 空値は None
    assert_eq!(news.image_url(Some("  ")), None);
    assert_eq!(news.image_url(None), None);
}

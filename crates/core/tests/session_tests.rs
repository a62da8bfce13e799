use marlin_rust_core::{ApiError, KeyValueStorage, MemoryStorage, Session, SessionStore, UserProfile};
use std::sync::Arc;

fn profile() -> UserProfile {
    UserProfile {
        id: 7,
        name: "Maria Silva".to_string(),
        email: "maria@example.com".to_string(),
        birth_date: None,
        id_document: None,
        image_url: None,
    }
}

#[tokio::test]
async fn test_save_session_then_authenticated() {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));

    // 保存前は未認証
    assert!(!store.is_authenticated().await);
    assert!(store.current_user().await.is_none());

    let session = Session {
        token: "token-abc".to_string(),
        user: profile(),
    };
    store.save_session(&session).await.unwrap();

    // 保存後はトークンとプロフィールが読める
    assert!(store.is_authenticated().await);
    assert_eq!(store.get_token().await.as_deref(), Some("token-abc"));
    assert_eq!(store.current_user().await, Some(profile()));
}

#[tokio::test]
async fn test_empty_token_is_not_authenticated() {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));

    // 空文字列のトークンは未認証扱い
    store.save_token("").await.unwrap();
    assert!(!store.is_authenticated().await);
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));

    let session = Session {
        token: "token-abc".to_string(),
        user: profile(),
    };
    store.save_session(&session).await.unwrap();

    // 2回連続で clear しても 1回と同じ状態
    store.clear().await;
    store.clear().await;

    assert!(!store.is_authenticated().await);
    assert!(store.get_token().await.is_none());
    assert!(store.current_user().await.is_none());
}

#[tokio::test]
async fn test_save_user_overwrites_cached_profile() {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));

    let session = Session {
        token: "token-abc".to_string(),
        user: profile(),
    };
    store.save_session(&session).await.unwrap();

    // プロフィール更新フローの書き戻し
    let mut updated = profile();
    updated.name = "Maria S. Souza".to_string();
    updated.image_url = Some("https://cdn.example.com/u/7.jpg".to_string());
    store.save_user(&updated).await.unwrap();

    assert_eq!(store.current_user().await, Some(updated));
}

/// 指定キーへの書き込みだけ失敗するストレージ
struct RejectKeyStorage {
    inner: MemoryStorage,
    reject: &'static str,
}

#[async_trait::async_trait]
impl KeyValueStorage for RejectKeyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        if key == self.reject {
            return Err(ApiError::Storage(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn test_failed_save_session_leaves_no_token() {
    let store = SessionStore::new(Arc::new(RejectKeyStorage {
        inner: MemoryStorage::new(),
        reject: "auth_token",
    }));

    let session = Session {
        token: "token-abc".to_string(),
        user: profile(),
    };

    // トークンの書き込みが失敗したら保存全体が失敗し、未認証のまま
    assert!(store.save_session(&session).await.is_err());
    assert!(!store.is_authenticated().await);
    assert!(store.get_token().await.is_none());
}

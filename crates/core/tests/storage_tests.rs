use marlin_rust_core::{FileStorage, KeyValueStorage, MemoryStorage};

#[tokio::test]
async fn test_file_storage_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("marlin.json"));

    assert_eq!(storage.get("auth_token").await.unwrap(), None);

    storage.set("auth_token", "abc").await.unwrap();
    storage.set("recent_searches", "cat|dog").await.unwrap();

    assert_eq!(
        storage.get("auth_token").await.unwrap().as_deref(),
        Some("abc")
    );

    // 別のインスタンスでも同じファイルから読める
    let reopened = FileStorage::new(dir.path().join("marlin.json"));
    assert_eq!(
        reopened.get("recent_searches").await.unwrap().as_deref(),
        Some("cat|dog")
    );
}

#[tokio::test]
async fn test_file_storage_remove_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("marlin.json"));

    // 存在しないキーの削除は成功扱い
    storage.remove("auth_token").await.unwrap();

    storage.set("auth_token", "abc").await.unwrap();
    storage.remove("auth_token").await.unwrap();
    assert_eq!(storage.get("auth_token").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_storage_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested/dir/marlin.json"));

    storage.set("auth_token", "abc").await.unwrap();
    assert_eq!(
        storage.get("auth_token").await.unwrap().as_deref(),
        Some("abc")
    );
}

#[tokio::test]
async fn test_memory_storage_roundtrip() {
    let storage = MemoryStorage::new();

    storage.set("k", "v").await.unwrap();
    assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));

    storage.remove("k").await.unwrap();
    assert_eq!(storage.get("k").await.unwrap(), None);
}

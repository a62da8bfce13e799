//! Durable key-value persistence
//!
//! The auth token, the cached user profile and the recent-search list are
//! persisted through this interface. Mutating operations complete before
//! they return, so callers can rely on the new state immediately.

use crate::error::ApiError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// 永続化キーバリューストア
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// キーに対応する値を取得
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;

    /// キーに値を保存
    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;

    /// キーを削除（存在しない場合も成功扱い）
    async fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// JSON ファイルに保存するストレージ
pub struct FileStorage {
    path: PathBuf,
    // 書き込みをシリアライズするためのロック
    lock: Mutex<()>,
}

impl FileStorage {
    /// 新しい FileStorage を作成
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, ApiError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(ApiError::Storage(err)),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let _guard = self.lock.lock().await;
        let map = self.read_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

/// メモリ上のストレージ（テスト用・永続化なしの構成用）
#[derive(Default)]
pub struct MemoryStorage {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// 新しい MemoryStorage を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.map.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.map.write().await.remove(key);
        Ok(())
    }
}

//! Pagination types shared by the paged service endpoints

use serde::{Deserialize, Serialize};

/// ページ指定（1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// 新しいページ指定を作成
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// 先頭ページの指定を作成
    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }
}

/// ページングされた結果
///
/// `has_next` ⇔ `current_page < total_pages`。`items` の件数は
/// 要求したページサイズを超えない。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PagedResult<T> {
    /// 空の結果を作成
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            current_page: 1,
            total_pages: 0,
            has_next: false,
            has_previous: false,
        }
    }

    /// 結果が空なら true
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

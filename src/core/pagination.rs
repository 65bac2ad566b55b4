use crate::domain::model::{
    BucketWinesResponse, WineInBucket, WineSearchResult, WinesByCountryResponse,
};
use std::collections::HashSet;

/// 以游標分頁的結果中，每筆資料的唯一鍵
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for WineInBucket {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for WineSearchResult {
    fn key(&self) -> i64 {
        self.id
    }
}

/// 一次游標請求的結果；游標對用戶端而言是不透明字串
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_next: bool,
}

impl From<BucketWinesResponse> for CursorPage<WineInBucket> {
    fn from(response: BucketWinesResponse) -> Self {
        Self {
            items: response.wines,
            next_cursor: response.pagination.next_cursor,
            has_next: response.pagination.has_next,
        }
    }
}

impl From<WinesByCountryResponse> for CursorPage<WineSearchResult> {
    fn from(response: WinesByCountryResponse) -> Self {
        Self {
            items: response.wines,
            next_cursor: response.next_cursor,
            has_next: response.has_next,
        }
    }
}

/// 累積游標分頁結果：只會附加，不會遺漏也不會重複
#[derive(Debug, Clone)]
pub struct CursorFeed<T: Keyed> {
    items: Vec<T>,
    seen: HashSet<i64>,
    cursor: Option<String>,
    has_next: bool,
    pages_loaded: usize,
}

impl<T: Keyed> Default for CursorFeed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            has_next: false,
            pages_loaded: 0,
        }
    }
}

impl<T: Keyed> CursorFeed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 套用一頁結果，回傳實際新增的筆數
    pub fn apply(&mut self, page: CursorPage<T>) -> usize {
        let before = self.items.len();
        let mut duplicates = 0;

        for item in page.items {
            if self.seen.insert(item.key()) {
                self.items.push(item);
            } else {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            tracing::debug!("Skipped {} duplicate items from cursor page", duplicates);
        }

        self.cursor = page.next_cursor.filter(|c| !c.is_empty());
        self.has_next = page.has_next;
        if self.has_next && self.cursor.is_none() {
            tracing::warn!("Server reported more results without a cursor; treating feed as exhausted");
            self.has_next = false;
        }
        self.pages_loaded += 1;

        self.items.len() - before
    }

    /// 只有在還有下一頁且取得游標時才回傳 `Some`
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next {
            self.cursor.as_deref()
        } else {
            None
        }
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn exhausted(&self) -> bool {
        self.pages_loaded > 0 && !self.has_next
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wine(id: i64) -> WineInBucket {
        WineInBucket {
            id,
            name: format!("Wine {}", id),
            winery: "Test Winery".to_string(),
            price: 25.0,
            points: 88,
            country: None,
            variety: None,
        }
    }

    fn page(ids: &[i64], cursor: Option<&str>, has_next: bool) -> CursorPage<WineInBucket> {
        CursorPage {
            items: ids.iter().copied().map(wine).collect(),
            next_cursor: cursor.map(str::to_string),
            has_next,
        }
    }

    #[test]
    fn test_apply_appends_in_order() {
        let mut feed = CursorFeed::new();
        assert_eq!(feed.apply(page(&[1, 2, 3], Some("c1"), true)), 3);
        assert_eq!(feed.apply(page(&[4, 5], Some("c2"), true)), 2);

        let ids: Vec<i64> = feed.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(feed.next_cursor(), Some("c2"));
        assert_eq!(feed.pages_loaded(), 2);
        assert!(!feed.exhausted());
    }

    #[test]
    fn test_apply_never_duplicates() {
        let mut feed = CursorFeed::new();
        feed.apply(page(&[1, 2, 3], Some("c1"), true));
        let added = feed.apply(page(&[3, 4, 1], None, false));

        assert_eq!(added, 1);
        let ids: Vec<i64> = feed.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(feed.exhausted());
        assert_eq!(feed.next_cursor(), None);
    }

    #[test]
    fn test_has_next_without_cursor_is_exhausted() {
        let mut feed = CursorFeed::new();
        feed.apply(page(&[1], None, true));
        assert!(!feed.has_next());
        assert!(feed.exhausted());

        let mut feed = CursorFeed::new();
        feed.apply(page(&[1], Some(""), true));
        assert_eq!(feed.next_cursor(), None);
    }

    #[test]
    fn test_cursor_ignored_when_no_more_pages() {
        let mut feed = CursorFeed::new();
        feed.apply(page(&[1], Some("stale"), false));
        assert_eq!(feed.next_cursor(), None);
    }

    #[test]
    fn test_reset_clears_seen_keys() {
        let mut feed = CursorFeed::new();
        feed.apply(page(&[1, 2], Some("c1"), true));
        feed.reset();

        assert!(feed.is_empty());
        assert!(!feed.exhausted());
        assert_eq!(feed.apply(page(&[1, 2], None, false)), 2);
    }
}

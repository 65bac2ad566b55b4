use crate::core::WineApi;
use crate::domain::model::{WineFilters, WineSearchResponse};
use crate::utils::error::{Result, WineError};
use std::sync::Arc;

/// 上一頁/下一頁控制所需的分頁資訊
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current: u32,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// 只有一頁時不顯示分頁控制
    pub fn visible(&self) -> bool {
        self.total_pages > 1
    }
}

/// 關鍵字搜尋：以 page/size 做位移分頁
pub struct SearchSession<A: WineApi> {
    api: Arc<A>,
    page_size: u32,
    filters: WineFilters,
    result: Option<WineSearchResponse>,
}

impl<A: WineApi> SearchSession<A> {
    pub fn new(api: Arc<A>, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            filters: WineFilters::default(),
            result: None,
        }
    }

    /// 新的搜尋條件一律從指定頁（預設第 1 頁）開始
    pub async fn search(&mut self, filters: WineFilters) -> Result<&WineSearchResponse> {
        let filters = filters.normalized();
        let page = filters.page.unwrap_or(1).max(1);
        self.fetch(filters, page).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<&WineSearchResponse> {
        let Some(info) = self.page_info() else {
            return Err(WineError::validation("No search has been made yet"));
        };
        if page < 1 || page > info.total_pages.max(1) {
            return Err(WineError::validation(format!(
                "Page {} is out of range (1..={})",
                page, info.total_pages
            )));
        }
        let filters = self.filters.clone();
        self.fetch(filters, page).await
    }

    pub async fn next_page(&mut self) -> Result<&WineSearchResponse> {
        let current = self.page_info().map(|p| p.current).unwrap_or(0);
        self.go_to_page(current + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<&WineSearchResponse> {
        let current = self.page_info().map(|p| p.current).unwrap_or(1);
        self.go_to_page(current.saturating_sub(1)).await
    }

    async fn fetch(&mut self, filters: WineFilters, page: u32) -> Result<&WineSearchResponse> {
        let filters = filters.with_page(page);
        let request = filters.to_search_request(self.page_size);
        tracing::debug!("Searching wines: {:?}", request);

        let response = self.api.search_wines(&request).await?;
        tracing::debug!(
            "Search returned {} of {} wines (page {}/{})",
            response.items.len(),
            response.total,
            response.page,
            response.pages
        );

        self.filters = filters;
        Ok(&*self.result.insert(response))
    }

    pub fn searched(&self) -> bool {
        self.result.is_some()
    }

    pub fn filters(&self) -> &WineFilters {
        &self.filters
    }

    pub fn result(&self) -> Option<&WineSearchResponse> {
        self.result.as_ref()
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.result.as_ref().map(|r| PageInfo {
            current: r.page,
            total_pages: r.pages,
        })
    }
}

use crate::core::pagination::{CursorFeed, CursorPage};
use crate::core::WineApi;
use crate::domain::model::{BucketRange, BucketSize, PageSizes, WineInBucket, WineSearchResult};
use crate::utils::error::Result;
use std::sync::Arc;

/// 散佈圖點擊後的桶內酒款清單
pub struct BucketBrowser<A: WineApi> {
    api: Arc<A>,
    size: BucketSize,
    limit: usize,
    range: Option<BucketRange>,
    feed: CursorFeed<WineInBucket>,
}

impl<A: WineApi> BucketBrowser<A> {
    pub fn new(api: Arc<A>, size: BucketSize, limit: usize) -> Self {
        Self {
            api,
            size,
            limit: limit.max(1),
            range: None,
            feed: CursorFeed::new(),
        }
    }

    pub fn from_settings(api: Arc<A>, size: BucketSize, pages: &PageSizes) -> Self {
        Self::new(api, size, pages.bucket)
    }

    /// 選取 (價格, 評分) 所在的桶並載入第一頁
    pub async fn select(&mut self, price: f64, points: f64) -> Result<BucketRange> {
        let range = BucketRange::containing(price, points, self.size)?;
        self.select_range(range).await?;
        Ok(range)
    }

    pub async fn select_range(&mut self, range: BucketRange) -> Result<usize> {
        tracing::debug!("Selecting bucket {}", range.label());
        self.range = Some(range);
        self.feed.reset();

        let response = self.api.bucket_wines(&range, self.limit, None).await?;
        tracing::debug!("Bucket {} holds {} wines", range.label(), response.total);
        Ok(self.feed.apply(CursorPage::from(response)))
    }

    /// 以目前游標載入下一頁；尚未選取或已無資料時不發出請求
    pub async fn load_more(&mut self) -> Result<usize> {
        let Some(range) = self.range else {
            return Ok(0);
        };
        let Some(cursor) = self.feed.next_cursor().map(str::to_string) else {
            return Ok(0);
        };

        let response = self
            .api
            .bucket_wines(&range, self.limit, Some(&cursor))
            .await?;
        Ok(self.feed.apply(CursorPage::from(response)))
    }

    pub fn range(&self) -> Option<&BucketRange> {
        self.range.as_ref()
    }

    pub fn wines(&self) -> &[WineInBucket] {
        self.feed.items()
    }

    pub fn has_more(&self) -> bool {
        self.feed.has_next()
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.feed.reset();
    }
}

/// 世界地圖上選取國家後的酒款清單
pub struct CountryBrowser<A: WineApi> {
    api: Arc<A>,
    first_limit: usize,
    more_limit: usize,
    country: Option<String>,
    feed: CursorFeed<WineSearchResult>,
}

impl<A: WineApi> CountryBrowser<A> {
    pub fn new(api: Arc<A>, first_limit: usize, more_limit: usize) -> Self {
        Self {
            api,
            first_limit: first_limit.max(1),
            more_limit: more_limit.max(1),
            country: None,
            feed: CursorFeed::new(),
        }
    }

    pub fn from_settings(api: Arc<A>, pages: &PageSizes) -> Self {
        Self::new(api, pages.country_first, pages.country_more)
    }

    /// 切換國家並載入第一頁；失敗時保留選取的國家但清單為空
    pub async fn select(&mut self, country: &str) -> Result<usize> {
        self.country = Some(country.to_string());
        self.feed.reset();

        let response = self
            .api
            .wines_by_country(country, self.first_limit, None)
            .await?;
        Ok(self.feed.apply(CursorPage::from(response)))
    }

    pub async fn load_more(&mut self) -> Result<usize> {
        let Some(country) = self.country.clone() else {
            return Ok(0);
        };
        let Some(cursor) = self.feed.next_cursor().map(str::to_string) else {
            return Ok(0);
        };

        let response = self
            .api
            .wines_by_country(&country, self.more_limit, Some(&cursor))
            .await?;
        Ok(self.feed.apply(CursorPage::from(response)))
    }

    pub fn clear(&mut self) {
        self.country = None;
        self.feed.reset();
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn wines(&self) -> &[WineSearchResult] {
        self.feed.items()
    }

    pub fn has_more(&self) -> bool {
        self.feed.has_next()
    }
}

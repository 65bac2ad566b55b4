use crate::core::WineApi;
use crate::domain::model::{BucketRange, PriceRatingBucket};
use crate::utils::error::Result;
use std::sync::Arc;

/// 散佈圖的聚合桶，依頁碼逐頁載入，遇到空頁即停止
pub struct ScatterFeed<A: WineApi> {
    api: Arc<A>,
    page_size: u32,
    next_page: u32,
    buckets: Vec<PriceRatingBucket>,
    total_wines: u64,
    exhausted: bool,
}

impl<A: WineApi> ScatterFeed<A> {
    pub fn new(api: Arc<A>, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            next_page: 1,
            buckets: Vec::new(),
            total_wines: 0,
            exhausted: false,
        }
    }

    /// 載入下一頁，回傳新增的桶數；已結束時不發出請求
    pub async fn load_next(&mut self) -> Result<usize> {
        if self.exhausted {
            return Ok(0);
        }

        let response = self
            .api
            .price_rating_aggregated(self.next_page, self.page_size)
            .await?;

        if response.buckets.is_empty() {
            tracing::debug!("Scatter feed ended at page {}", self.next_page);
            self.exhausted = true;
            return Ok(0);
        }

        let added = response.buckets.len();
        self.total_wines = self.total_wines.max(response.total_wines);
        self.buckets.extend(response.buckets);
        self.next_page += 1;
        Ok(added)
    }

    /// 持續載入直到沒有資料或達到頁數上限
    pub async fn load_all(&mut self, max_pages: u32) -> Result<usize> {
        let mut added = 0;
        for _ in 0..max_pages {
            if self.exhausted {
                break;
            }
            added += self.load_next().await?;
        }
        tracing::info!(
            "📈 Loaded {} price/rating buckets ({} pages)",
            self.buckets.len(),
            self.pages_loaded()
        );
        Ok(added)
    }

    pub fn bucket_at(&self, price: f64, points: f64) -> Option<&PriceRatingBucket> {
        self.buckets
            .iter()
            .find(|b| BucketRange::from(*b).contains(price, points))
    }

    pub fn buckets(&self) -> &[PriceRatingBucket] {
        &self.buckets
    }

    pub fn total_wines(&self) -> u64 {
        self.total_wines
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn pages_loaded(&self) -> u32 {
        self.next_page - 1
    }
}

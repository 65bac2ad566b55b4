use crate::domain::model::{
    AggregatedPriceRatingResponse, BucketRange, BucketSize, BucketWinesResponse,
    CountryStatsResponse, FilterOptions, HeatmapData, HeatmapFilters, PageSizes,
    RagAnswerResponse, Wine, WineFilters, WineListResponse, WineSearchRequest,
    WineSearchResponse, WinesByCountryResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn bucket_size(&self) -> BucketSize;
    fn page_sizes(&self) -> PageSizes;
}

/// 後端酒款 API 的所有端點
#[async_trait]
pub trait WineApi: Send + Sync {
    async fn list_wines(&self, filters: &WineFilters) -> Result<WineListResponse>;
    async fn wine(&self, id: i64) -> Result<Wine>;
    async fn filter_options(&self) -> Result<FilterOptions>;
    async fn search_wines(&self, request: &WineSearchRequest) -> Result<WineSearchResponse>;
    async fn bucket_wines(
        &self,
        range: &BucketRange,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<BucketWinesResponse>;
    async fn wines_by_country(
        &self,
        country: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<WinesByCountryResponse>;
    async fn country_stats(&self, min_wines: u32) -> Result<CountryStatsResponse>;
    async fn country_list(&self) -> Result<Vec<String>>;
    async fn variety_list(&self) -> Result<Vec<String>>;
    async fn price_rating_aggregated(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<AggregatedPriceRatingResponse>;
    async fn price_rating_heatmap(&self, filters: &HeatmapFilters) -> Result<HeatmapData>;
    async fn rag_answer(&self, query: &str) -> Result<RagAnswerResponse>;
}

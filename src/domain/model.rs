use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單一酒款的完整資料 (`GET /api/wines/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wine {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points: u32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub region_1: Option<String>,
    #[serde(default)]
    pub region_2: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub taster_name: Option<String>,
    #[serde(default)]
    pub taster_twitter_handle: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default)]
    pub winery: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineListResponse {
    pub wines: Vec<Wine>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub grapes: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub price_range: Option<NumericRange>,
    #[serde(default)]
    pub abv_range: Option<NumericRange>,
    #[serde(default)]
    pub vintages: Vec<Option<i32>>,
}

/// `POST /api/wines/search` 的請求內容，未設定的欄位不送出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_points: Option<u32>,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineSearchResult {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default)]
    pub winery: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineSearchResponse {
    pub items: Vec<WineSearchResult>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineInBucket {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub winery: String,
    pub price: f64,
    pub points: u32,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketWinesPagination {
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketWinesResponse {
    pub wines: Vec<WineInBucket>,
    pub pagination: BucketWinesPagination,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinesByCountryResponse {
    pub country: String,
    pub wines: Vec<WineSearchResult>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarietyInfo {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub country: String,
    pub avg_points: f64,
    pub count: u64,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub top_varieties: Vec<VarietyInfo>,
    #[serde(default)]
    pub original_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryStatsResponse {
    pub items: Vec<CountryStats>,
    #[serde(default)]
    pub total_countries: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineExample {
    pub name: String,
    pub price: f64,
    pub points: u32,
    #[serde(default)]
    pub winery: String,
}

/// 散佈圖與熱圖共用的價格/評分聚合桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRatingBucket {
    pub price_min: f64,
    pub price_max: f64,
    pub points_min: f64,
    pub points_max: f64,
    pub count: u64,
    #[serde(default)]
    pub examples: Vec<WineExample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketDimensions {
    pub price: f64,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedPriceRatingResponse {
    pub buckets: Vec<PriceRatingBucket>,
    #[serde(default)]
    pub total_wines: u64,
    #[serde(default)]
    pub total_buckets: u64,
    #[serde(default)]
    pub bucket_size: Option<BucketDimensions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapData {
    /// `[x_index, y_index, count]`
    pub data: Vec<[f64; 3]>,
    pub x_categories: Vec<f64>,
    pub y_categories: Vec<f64>,
    #[serde(default)]
    pub bucket_map: HashMap<String, PriceRatingBucket>,
    pub max_count: u64,
    #[serde(default)]
    pub total_wines: u64,
    pub bucket_size: BucketDimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagSource {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&RagSource> for WineSearchResult {
    fn from(source: &RagSource) -> Self {
        WineSearchResult {
            id: source.id,
            title: source.title.clone(),
            price: None,
            points: 0,
            country: source.country.clone(),
            variety: source.variety.clone(),
            winery: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswerResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<RagSource>,
}

/// 清單與搜尋共用的篩選條件；可與 query string 互相轉換
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WineFilters {
    pub search: Option<String>,
    pub country: Option<String>,
    pub variety: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_points: Option<u32>,
    pub max_points: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFilters {
    pub country: Option<String>,
    pub variety: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_points: Option<u32>,
    pub max_points: Option<u32>,
    pub price_bucket_size: Option<f64>,
    pub points_bucket_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketSize {
    pub price: f64,
    pub points: f64,
}

impl Default for BucketSize {
    fn default() -> Self {
        Self {
            price: 10.0,
            points: 1.0,
        }
    }
}

/// 價格與評分兩軸皆為左閉右開區間 `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketRange {
    pub price_min: f64,
    pub price_max: f64,
    pub points_min: f64,
    pub points_max: f64,
}

/// 各畫面每次請求的筆數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizes {
    pub bucket: usize,
    pub country_first: usize,
    pub country_more: usize,
    pub search: u32,
    pub scatter: u32,
    pub min_wines: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            bucket: 10,
            country_first: 10,
            country_more: 20,
            search: 20,
            scatter: 300,
            min_wines: 50,
        }
    }
}

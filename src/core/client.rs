use crate::core::{ConfigProvider, WineApi};
use crate::domain::model::{
    AggregatedPriceRatingResponse, BucketRange, BucketWinesResponse, CountryStatsResponse,
    FilterOptions, HeatmapData, HeatmapFilters, RagAnswerResponse, Wine, WineFilters,
    WineListResponse, WineSearchRequest, WineSearchResponse, WinesByCountryResponse,
};
use crate::utils::error::{Result, WineError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8001/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

type QueryPairs = Vec<(&'static str, String)>;

/// 以 reqwest 實作的 [`WineApi`]
#[derive(Debug, Clone)]
pub struct HttpWineApi {
    base_url: Url,
    client: Client,
}

impl HttpWineApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &QueryPairs) -> Result<T> {
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        decode_response(response).await
    }
}

/// 確保基底網址以 `/` 結尾，否則 `Url::join` 會吃掉最後一段路徑
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(WineError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Unsupported URL scheme: {}", scheme),
        }),
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message_from_body(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    tracing::warn!("API returned {}: {}", status, message);

    Err(WineError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// 從錯誤回應中取出 `message`、`error` 或 `detail` 欄位
fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn push_opt<T: ToString>(pairs: &mut QueryPairs, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn heatmap_query(filters: &HeatmapFilters) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    push_opt(
        &mut pairs,
        "country",
        filters.country.as_deref().filter(|s| !s.is_empty()),
    );
    push_opt(
        &mut pairs,
        "variety",
        filters.variety.as_deref().filter(|s| !s.is_empty()),
    );
    // 0 視同未設定
    push_opt(&mut pairs, "min_price", filters.min_price.filter(|v| *v != 0.0));
    push_opt(&mut pairs, "max_price", filters.max_price.filter(|v| *v != 0.0));
    push_opt(&mut pairs, "min_points", filters.min_points.filter(|v| *v != 0));
    push_opt(&mut pairs, "max_points", filters.max_points.filter(|v| *v != 0));
    push_opt(
        &mut pairs,
        "price_bucket_size",
        filters.price_bucket_size.filter(|v| *v != 0.0),
    );
    push_opt(
        &mut pairs,
        "points_bucket_size",
        filters.points_bucket_size.filter(|v| *v != 0.0),
    );
    pairs
}

#[async_trait::async_trait]
impl WineApi for HttpWineApi {
    async fn list_wines(&self, filters: &WineFilters) -> Result<WineListResponse> {
        let url = self.endpoint("api/wines")?;
        self.get_json(url, &filters.query_pairs()).await
    }

    async fn wine(&self, id: i64) -> Result<Wine> {
        let url = self.endpoint(&format!("api/wines/{}", id))?;
        self.get_json(url, &QueryPairs::new()).await
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        let url = self.endpoint("api/wines/filters")?;
        self.get_json(url, &QueryPairs::new()).await
    }

    async fn search_wines(&self, request: &WineSearchRequest) -> Result<WineSearchResponse> {
        let url = self.endpoint("api/wines/search")?;
        self.post_json(url, request).await
    }

    async fn bucket_wines(
        &self,
        range: &BucketRange,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<BucketWinesResponse> {
        let url = self.endpoint("api/wines/bucket/")?;
        let mut query: QueryPairs = vec![
            ("price_min", range.price_min.to_string()),
            ("price_max", range.price_max.to_string()),
            ("points_min", range.points_min.to_string()),
            ("points_max", range.points_max.to_string()),
            ("limit", limit.to_string()),
        ];
        push_opt(&mut query, "cursor", cursor);
        self.get_json(url, &query).await
    }

    async fn wines_by_country(
        &self,
        country: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<WinesByCountryResponse> {
        let mut url = self.endpoint("api/wines/by-country")?;
        url.path_segments_mut()
            .map_err(|_| WineError::config("API base URL cannot carry path segments"))?
            .pop_if_empty()
            .push(country);

        let mut query: QueryPairs = vec![("limit", limit.to_string())];
        push_opt(&mut query, "cursor", cursor);
        self.get_json(url, &query).await
    }

    async fn country_stats(&self, min_wines: u32) -> Result<CountryStatsResponse> {
        let url = self.endpoint("api/stats/countries")?;
        self.get_json(url, &vec![("min_wines", min_wines.to_string())])
            .await
    }

    async fn country_list(&self) -> Result<Vec<String>> {
        let url = self.endpoint("api/stats/country-list")?;
        let list: Option<Vec<String>> = self.get_json(url, &QueryPairs::new()).await?;
        Ok(list.unwrap_or_default())
    }

    async fn variety_list(&self) -> Result<Vec<String>> {
        let url = self.endpoint("api/wines/variety-list")?;
        let list: Option<Vec<String>> = self.get_json(url, &QueryPairs::new()).await?;
        Ok(list.unwrap_or_default())
    }

    async fn price_rating_aggregated(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<AggregatedPriceRatingResponse> {
        let url = self.endpoint("api/stats/price-rating-aggregated")?;
        self.get_json(
            url,
            &vec![("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn price_rating_heatmap(&self, filters: &HeatmapFilters) -> Result<HeatmapData> {
        let url = self.endpoint("api/stats/price-rating-heatmap")?;
        self.get_json(url, &heatmap_query(filters)).await
    }

    async fn rag_answer(&self, query: &str) -> Result<RagAnswerResponse> {
        let url = self.endpoint("api/search/answer")?;
        self.post_json(url, &serde_json::json!({ "query": query }))
            .await
    }
}

//! 單元測試用的腳本化 API：依序回傳預先排好的回應，並記錄每次請求的參數

use crate::core::WineApi;
use crate::domain::model::{
    AggregatedPriceRatingResponse, BucketRange, BucketWinesResponse, CountryStatsResponse,
    FilterOptions, HeatmapData, HeatmapFilters, RagAnswerResponse, Wine, WineFilters,
    WineListResponse, WineSearchRequest, WineSearchResponse, WinesByCountryResponse,
};
use crate::utils::error::{Result, WineError};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bucket {
        range: BucketRange,
        limit: usize,
        cursor: Option<String>,
    },
    Country {
        country: String,
        limit: usize,
        cursor: Option<String>,
    },
    Search(WineSearchRequest),
    Scatter {
        page: u32,
        page_size: u32,
    },
    Rag(String),
    Wine(i64),
}

#[derive(Default)]
pub struct ScriptedApi {
    pub bucket_pages: Mutex<VecDeque<Result<BucketWinesResponse>>>,
    pub country_pages: Mutex<VecDeque<Result<WinesByCountryResponse>>>,
    pub search_pages: Mutex<VecDeque<Result<WineSearchResponse>>>,
    pub scatter_pages: Mutex<VecDeque<Result<AggregatedPriceRatingResponse>>>,
    pub rag_answers: Mutex<VecDeque<Result<RagAnswerResponse>>>,
    pub wines: Mutex<VecDeque<Result<Wine>>>,
    pub calls: Mutex<Vec<Call>>,
}

fn next<T>(queue: &Mutex<VecDeque<Result<T>>>, what: &str) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(WineError::validation(format!("no scripted {} response", what))))
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl WineApi for ScriptedApi {
    async fn list_wines(&self, _filters: &WineFilters) -> Result<WineListResponse> {
        Err(WineError::validation("list_wines is not scripted"))
    }

    async fn wine(&self, id: i64) -> Result<Wine> {
        self.record(Call::Wine(id));
        next(&self.wines, "wine")
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        Err(WineError::validation("filter_options is not scripted"))
    }

    async fn search_wines(&self, request: &WineSearchRequest) -> Result<WineSearchResponse> {
        self.record(Call::Search(request.clone()));
        next(&self.search_pages, "search")
    }

    async fn bucket_wines(
        &self,
        range: &BucketRange,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<BucketWinesResponse> {
        self.record(Call::Bucket {
            range: *range,
            limit,
            cursor: cursor.map(str::to_string),
        });
        next(&self.bucket_pages, "bucket")
    }

    async fn wines_by_country(
        &self,
        country: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<WinesByCountryResponse> {
        self.record(Call::Country {
            country: country.to_string(),
            limit,
            cursor: cursor.map(str::to_string),
        });
        next(&self.country_pages, "country")
    }

    async fn country_stats(&self, _min_wines: u32) -> Result<CountryStatsResponse> {
        Err(WineError::validation("country_stats is not scripted"))
    }

    async fn country_list(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn variety_list(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn price_rating_aggregated(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<AggregatedPriceRatingResponse> {
        self.record(Call::Scatter { page, page_size });
        next(&self.scatter_pages, "scatter")
    }

    async fn price_rating_heatmap(&self, _filters: &HeatmapFilters) -> Result<HeatmapData> {
        Err(WineError::validation("price_rating_heatmap is not scripted"))
    }

    async fn rag_answer(&self, query: &str) -> Result<RagAnswerResponse> {
        self.record(Call::Rag(query.to_string()));
        next(&self.rag_answers, "rag")
    }
}

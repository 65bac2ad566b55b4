use crate::app::views;
use crate::core::browse::{BucketBrowser, CountryBrowser};
use crate::core::heatmap::HeatmapGrid;
use crate::core::rag::RagSession;
use crate::core::scatter::ScatterFeed;
use crate::core::search::SearchSession;
use crate::core::world_map::WorldMapModel;
use crate::core::{ConfigProvider, PageSizes, WineApi};
use crate::domain::model::{HeatmapFilters, WineFilters, WineInBucket, WineSearchResult};
use crate::utils::error::{ErrorCategory, Result, WineError};
use std::sync::Arc;

/// 各面板；錯誤時顯示固定的訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    WorldMap,
    CountryWines,
    Scatter,
    BucketWines,
    Heatmap,
    Search,
    Answer,
    WineDetail,
    Filters,
    WineList,
    Export,
    Shell,
}

impl View {
    pub fn error_line(&self) -> &'static str {
        match self {
            View::WorldMap => "Failed to load country statistics",
            View::CountryWines => "Failed to load wines for this country",
            View::Scatter => "Failed to load wine scatter data",
            View::BucketWines => "Failed to load wines in this bucket",
            View::Heatmap => "Failed to load heatmap data",
            View::Search => "Failed to search wines",
            View::Answer => "Failed to get an answer",
            View::WineDetail => "Failed to load wine details",
            View::Filters => "Failed to load filter options",
            View::WineList => "Failed to load wines",
            View::Export => "Failed to export wines",
            View::Shell => "Interactive session stopped",
        }
    }
}

/// 記錄錯誤細節，回傳給使用者看的固定訊息
pub fn render_error(view: View, error: &WineError) -> String {
    if error.is_transport() {
        tracing::error!("❌ {:?} request could not reach the API: {}", view, error);
    } else {
        tracing::error!("❌ {:?} request failed: {}", view, error);
    }

    match (error, error.category()) {
        (WineError::ValidationError { message }, _) => message.clone(),
        (_, ErrorCategory::Network | ErrorCategory::Api) => view.error_line().to_string(),
        _ => format!("{}: {}", view.error_line(), error.user_friendly_message()),
    }
}

/// 最近一次展開的清單，`more` 依此決定要載入哪一個
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drilldown {
    Country,
    Bucket,
}

/// 組合所有面板的狀態
pub struct Dashboard<A: WineApi> {
    api: Arc<A>,
    pages: PageSizes,
    map: WorldMapModel,
    country: CountryBrowser<A>,
    scatter: ScatterFeed<A>,
    bucket: BucketBrowser<A>,
    search: SearchSession<A>,
    rag: RagSession<A>,
    drilldown: Option<Drilldown>,
}

impl<A: WineApi> Dashboard<A> {
    pub fn new<C: ConfigProvider>(api: A, config: &C) -> Self {
        let api = Arc::new(api);
        let pages = config.page_sizes();
        Self {
            map: WorldMapModel::default(),
            country: CountryBrowser::from_settings(api.clone(), &pages),
            scatter: ScatterFeed::new(api.clone(), pages.scatter),
            bucket: BucketBrowser::from_settings(api.clone(), config.bucket_size(), &pages),
            search: SearchSession::new(api.clone(), pages.search),
            rag: RagSession::new(api.clone()),
            drilldown: None,
            pages,
            api,
        }
    }

    pub async fn world_map(&mut self, min_wines: Option<u32>) -> Result<String> {
        let min_wines = min_wines.unwrap_or(self.pages.min_wines);
        let stats = self.api.country_stats(min_wines).await?;
        tracing::debug!("Loaded stats for {} countries", stats.items.len());
        self.map = WorldMapModel::from_stats(&stats);
        Ok(views::world_map(&self.map))
    }

    /// 依地圖上的名稱選取國家；地圖已載入時改用 API 原始國名查詢
    pub async fn select_country(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WineError::validation("Country name cannot be empty"));
        }

        let country = match self.map.select(name) {
            Some(original) => original.to_string(),
            None => name.to_string(),
        };
        self.drilldown = Some(Drilldown::Country);
        let loaded = self.country.select(&country).await?;
        tracing::info!("🍷 Loaded {} wines from {}", loaded, country);
        Ok(self.render_country())
    }

    pub async fn more_country(&mut self) -> Result<String> {
        if self.country.country().is_none() {
            return Err(WineError::validation("No country selected"));
        }
        let added = self.country.load_more().await?;
        tracing::debug!("Loaded {} more country wines", added);
        Ok(self.render_country())
    }

    fn render_country(&self) -> String {
        views::country_wines(
            self.country.country().unwrap_or_default(),
            self.country.wines(),
            self.country.has_more(),
        )
    }

    /// 再載入最多 `pages` 頁聚合桶；已載完時直接重繪
    pub async fn scatter(&mut self, pages: u32, max_price: f64) -> Result<String> {
        self.scatter.load_all(pages.max(1)).await?;
        Ok(views::scatter_plot(self.scatter.buckets(), max_price, 60, 21))
    }

    pub async fn select_bucket(&mut self, price: f64, points: f64) -> Result<String> {
        self.drilldown = Some(Drilldown::Bucket);
        let range = self.bucket.select(price, points).await?;
        tracing::info!("🍷 Loaded {} wines in {}", self.bucket.wines().len(), range.label());

        let mut out = self.render_bucket();
        if let Some(aggregated) = self.scatter.bucket_at(price, points) {
            out.push_str(&format!(
                "Scatter bucket holds {} wines\n",
                aggregated.count
            ));
        }
        Ok(out)
    }

    pub async fn more_bucket(&mut self) -> Result<String> {
        if self.bucket.range().is_none() {
            return Err(WineError::validation("No bucket selected"));
        }
        let added = self.bucket.load_more().await?;
        tracing::debug!("Loaded {} more bucket wines", added);
        Ok(self.render_bucket())
    }

    fn render_bucket(&self) -> String {
        match self.bucket.range() {
            Some(range) => views::bucket_wines(range, self.bucket.wines(), self.bucket.has_more()),
            None => String::new(),
        }
    }

    /// 對最近展開的清單載入下一頁
    pub async fn more(&mut self) -> Result<(View, String)> {
        match self.drilldown {
            Some(Drilldown::Country) => Ok((View::CountryWines, self.more_country().await?)),
            Some(Drilldown::Bucket) => Ok((View::BucketWines, self.more_bucket().await?)),
            None => Err(WineError::validation(
                "Nothing to load more of; select a country or bucket first",
            )),
        }
    }

    pub fn drilldown(&self) -> Option<Drilldown> {
        self.drilldown
    }

    pub async fn heatmap(&self, filters: &HeatmapFilters) -> Result<String> {
        let data = self.api.price_rating_heatmap(filters).await?;
        let grid = HeatmapGrid::new(data);
        Ok(views::heatmap(&grid))
    }

    pub async fn search(&mut self, filters: WineFilters) -> Result<String> {
        self.search.search(filters).await?;
        Ok(self.render_search())
    }

    pub async fn next_page(&mut self) -> Result<String> {
        self.search.next_page().await?;
        Ok(self.render_search())
    }

    pub async fn previous_page(&mut self) -> Result<String> {
        self.search.previous_page().await?;
        Ok(self.render_search())
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<String> {
        self.search.go_to_page(page).await?;
        Ok(self.render_search())
    }

    fn render_search(&self) -> String {
        match (self.search.result(), self.search.page_info()) {
            (Some(result), Some(page)) => views::search_results(result, self.search.filters(), page),
            _ => String::new(),
        }
    }

    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let outcome = self.rag.ask(question).await?;
        Ok(views::rag_answer(&outcome))
    }

    pub async fn wine(&self, id: i64) -> Result<String> {
        let wine = self.api.wine(id).await?;
        Ok(views::wine_detail(&wine))
    }

    /// 國家與品種清單同時請求
    pub async fn filter_lists(&self, with_options: bool) -> Result<String> {
        let (countries, varieties) =
            tokio::join!(self.api.country_list(), self.api.variety_list());
        let mut out = views::filter_lists(&countries?, &varieties?);

        if with_options {
            let options = self.api.filter_options().await?;
            out.push_str(&views::filter_options(&options));
        }
        Ok(out)
    }

    pub async fn list(&self, filters: &WineFilters) -> Result<String> {
        let response = self.api.list_wines(&filters.clone().normalized()).await?;
        Ok(views::wine_list(&response))
    }

    pub fn search_rows(&self) -> &[WineSearchResult] {
        self.search.result().map(|r| r.items.as_slice()).unwrap_or_default()
    }

    pub fn bucket_rows(&self) -> &[WineInBucket] {
        self.bucket.wines()
    }

    pub fn country_rows(&self) -> &[WineSearchResult] {
        self.country.wines()
    }

    pub fn bucket_has_more(&self) -> bool {
        self.bucket.has_more()
    }

    pub fn country_has_more(&self) -> bool {
        self.country.has_more()
    }
}

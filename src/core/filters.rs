use crate::domain::model::{WineFilters, WineSearchRequest};
use crate::utils::error::{Result, WineError};
use std::str::FromStr;
use url::form_urlencoded;

impl WineFilters {
    /// 依固定順序輸出非空欄位，供 `GET /api/wines` 與 query string 共用
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "search", &self.search);
        push_text(&mut pairs, "country", &self.country);
        push_text(&mut pairs, "variety", &self.variety);
        push_value(&mut pairs, "min_price", self.min_price.filter(|p| is_valid_price(*p)));
        push_value(&mut pairs, "max_price", self.max_price.filter(|p| is_valid_price(*p)));
        push_value(&mut pairs, "min_points", self.min_points);
        push_value(&mut pairs, "max_points", self.max_points);
        push_value(&mut pairs, "page", self.page);
        push_value(&mut pairs, "size", self.size);
        pairs
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// 解析 query string；未知的鍵忽略，空值視為未設定，數字格式錯誤則回傳驗證錯誤
    pub fn from_query_string(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filters = WineFilters::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "search" => filters.search = Some(value.to_string()),
                "country" => filters.country = Some(value.to_string()),
                "variety" => filters.variety = Some(value.to_string()),
                "min_price" => filters.min_price = Some(parse_price(&key, value)?),
                "max_price" => filters.max_price = Some(parse_price(&key, value)?),
                "min_points" => filters.min_points = Some(parse_number(&key, value)?),
                "max_points" => filters.max_points = Some(parse_number(&key, value)?),
                "page" => filters.page = Some(parse_number(&key, value)?),
                "size" => filters.size = Some(parse_number(&key, value)?),
                other => tracing::debug!("Ignoring unknown filter key: {}", other),
            }
        }

        Ok(filters)
    }

    /// 文字欄位去除前後空白，空字串收斂為 `None`；負數或非有限的價格視為未設定
    pub fn normalized(mut self) -> Self {
        for field in [&mut self.search, &mut self.country, &mut self.variety] {
            *field = field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
        }
        for price in [&mut self.min_price, &mut self.max_price] {
            if price.is_some_and(|p| !is_valid_price(p)) {
                tracing::warn!("Dropping invalid price filter: {:?}", price);
                *price = None;
            }
        }
        self
    }

    /// 檢查價格欄位，供 CLI 參數等外部輸入使用
    pub fn check_prices(&self) -> Result<()> {
        for (key, price) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(price) = price.filter(|p| !is_valid_price(*p)) {
                return Err(WineError::validation(format!(
                    "Invalid price for '{}': {}",
                    key, price
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn to_search_request(&self, default_size: u32) -> WineSearchRequest {
        let filters = self.clone().normalized();
        WineSearchRequest {
            search: filters.search,
            country: filters.country,
            variety: filters.variety,
            min_price: filters.min_price,
            max_price: filters.max_price,
            min_points: filters.min_points,
            page: filters.page.unwrap_or(1).max(1),
            size: filters.size.unwrap_or(default_size).max(1),
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(text) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        pairs.push((key, text.to_string()));
    }
}

fn push_value<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        WineError::validation(format!("Invalid number for '{}': {}", key, value))
    })
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn parse_price(key: &str, value: &str) -> Result<f64> {
    let price: f64 = parse_number(key, value)?;
    if !is_valid_price(price) {
        return Err(WineError::validation(format!(
            "Invalid price for '{}': {}",
            key, value
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_filters() -> WineFilters {
        WineFilters {
            search: Some("dark cherry & oak".to_string()),
            country: Some("Côte d'Ivoire".to_string()),
            variety: Some("Pinot Noir".to_string()),
            min_price: Some(12.5),
            max_price: Some(80.0),
            min_points: Some(88),
            max_points: Some(95),
            page: Some(3),
            size: Some(20),
        }
    }

    #[test]
    fn test_round_trip_preserves_filters() {
        let filters = full_filters();
        let query = filters.to_query_string();
        assert_eq!(WineFilters::from_query_string(&query).unwrap(), filters);

        let partial = WineFilters {
            country: Some("Italy".to_string()),
            min_points: Some(90),
            ..Default::default()
        };
        assert_eq!(
            WineFilters::from_query_string(&partial.to_query_string()).unwrap(),
            partial
        );
        assert_eq!(
            WineFilters::from_query_string(&WineFilters::default().to_query_string()).unwrap(),
            WineFilters::default()
        );
    }

    #[test]
    fn test_round_trip_after_normalizing() {
        let cases = [
            WineFilters {
                country: Some(" Italy".to_string()),
                variety: Some("Nebbiolo  ".to_string()),
                ..Default::default()
            },
            WineFilters {
                min_price: Some(-5.0),
                max_price: Some(f64::INFINITY),
                min_points: Some(85),
                ..Default::default()
            },
            WineFilters {
                search: Some("\tcrisp apple ".to_string()),
                min_price: Some(0.0),
                max_price: Some(f64::NAN),
                ..Default::default()
            },
        ];

        for filters in cases {
            let normalized = filters.normalized();
            let decoded = WineFilters::from_query_string(&normalized.to_query_string()).unwrap();
            assert_eq!(decoded, normalized);
        }
    }

    #[test]
    fn test_normalized_trims_and_drops_invalid_prices() {
        let filters = WineFilters {
            country: Some(" Italy".to_string()),
            min_price: Some(-5.0),
            max_price: Some(40.0),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filters.country.as_deref(), Some("Italy"));
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.max_price, Some(40.0));
    }

    #[test]
    fn test_encoder_skips_invalid_prices() {
        let filters = WineFilters {
            min_price: Some(-5.0),
            max_price: Some(25.0),
            ..Default::default()
        };
        assert_eq!(filters.to_query_string(), "max_price=25");
        assert!(filters.check_prices().is_err());
        assert!(WineFilters::default().check_prices().is_ok());
    }

    #[test]
    fn test_query_string_order_and_encoding() {
        let filters = WineFilters {
            search: Some("red & dry".to_string()),
            max_price: Some(30.0),
            page: Some(1),
            ..Default::default()
        };
        assert_eq!(filters.to_query_string(), "search=red+%26+dry&max_price=30&page=1");
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let filters = WineFilters {
            country: Some(String::new()),
            variety: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.to_query_string(), "");
        assert!(filters.is_empty());
        assert_eq!(filters.normalized(), WineFilters::default());
    }

    #[test]
    fn test_parse_ignores_unknown_and_leading_question_mark() {
        let filters =
            WineFilters::from_query_string("?country=France&sort=price&min_price=&page=2").unwrap();
        assert_eq!(filters.country.as_deref(), Some("France"));
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.page, Some(2));
    }

    #[test]
    fn test_parse_rejects_malformed_numbers() {
        assert!(WineFilters::from_query_string("min_points=high").is_err());
        assert!(WineFilters::from_query_string("min_price=-5").is_err());
        assert!(WineFilters::from_query_string("page=1.5").is_err());
    }

    #[test]
    fn test_to_search_request_defaults() {
        let filters = WineFilters {
            search: Some("citrus".to_string()),
            country: Some(String::new()),
            ..Default::default()
        };
        let request = filters.to_search_request(20);
        assert_eq!(request.search.as_deref(), Some("citrus"));
        assert_eq!(request.country, None);
        assert_eq!(request.page, 1);
        assert_eq!(request.size, 20);
    }
}

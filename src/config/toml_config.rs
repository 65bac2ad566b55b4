use crate::utils::error::{Result, WineError};
use crate::utils::validation::{validate_positive_number, validate_positive_width, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub buckets: BucketConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagingConfig {
    pub bucket_page_size: Option<usize>,
    pub country_first_page: Option<usize>,
    pub country_more_page: Option<usize>,
    pub search_page_size: Option<u32>,
    pub scatter_page_size: Option<u32>,
    pub min_wines: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketConfig {
    pub price: Option<f64>,
    pub points: Option<f64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            WineError::config(format!(
                "Cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WineError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WINE_API_URL})；未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| WineError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.base_url {
            validate_url("api.base_url", url)?;
        }
        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout as usize, 1)?;
        }

        let sizes = [
            ("paging.bucket_page_size", self.paging.bucket_page_size),
            ("paging.country_first_page", self.paging.country_first_page),
            ("paging.country_more_page", self.paging.country_more_page),
            ("paging.search_page_size", self.paging.search_page_size.map(|v| v as usize)),
            ("paging.scatter_page_size", self.paging.scatter_page_size.map(|v| v as usize)),
        ];
        for (field, value) in sizes {
            if let Some(value) = value {
                validate_positive_number(field, value, 1)?;
            }
        }

        if let Some(price) = self.buckets.price {
            validate_positive_width("buckets.price", price)?;
        }
        if let Some(points) = self.buckets.points {
            validate_positive_width("buckets.points", points)?;
        }

        Ok(())
    }
}

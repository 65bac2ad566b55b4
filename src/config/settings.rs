use crate::config::toml_config::TomlConfig;
use crate::core::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::domain::model::{BucketSize, PageSizes};
use crate::utils::error::{Result, WineError};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use std::path::Path;

/// 合併後的執行設定：命令列 > TOML 檔 > 預設值
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub bucket_size: BucketSize,
    pub pages: PageSizes,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            bucket_size: BucketSize::default(),
            pages: PageSizes::default(),
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<&Path>, api_url_override: Option<&str>) -> Result<Self> {
        let mut settings = match config_path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                if !path.exists() {
                    return Err(WineError::MissingConfigError {
                        field: format!("config file {}", path.display()),
                    });
                }
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Self::from_toml(&file)
            }
            None => Self::default(),
        };

        if let Some(url) = api_url_override.filter(|u| !u.trim().is_empty()) {
            settings.api_base_url = url.trim().to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(file: &TomlConfig) -> Self {
        let defaults = Self::default();
        let paging = &file.paging;
        Self {
            api_base_url: file.api.base_url.clone().unwrap_or(defaults.api_base_url),
            timeout_seconds: file.api.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            bucket_size: BucketSize {
                price: file.buckets.price.unwrap_or(defaults.bucket_size.price),
                points: file.buckets.points.unwrap_or(defaults.bucket_size.points),
            },
            pages: PageSizes {
                bucket: paging.bucket_page_size.unwrap_or(defaults.pages.bucket),
                country_first: paging.country_first_page.unwrap_or(defaults.pages.country_first),
                country_more: paging.country_more_page.unwrap_or(defaults.pages.country_more),
                search: paging.search_page_size.unwrap_or(defaults.pages.search),
                scatter: paging.scatter_page_size.unwrap_or(defaults.pages.scatter),
                min_wines: paging.min_wines.unwrap_or(defaults.pages.min_wines),
            },
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api_base_url)?;
        validate_positive_number("api.timeout_seconds", self.timeout_seconds as usize, 1)?;
        self.bucket_size.check()?;
        validate_positive_number("paging.bucket_page_size", self.pages.bucket, 1)?;
        validate_positive_number("paging.search_page_size", self.pages.search as usize, 1)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn bucket_size(&self) -> BucketSize {
        self.bucket_size
    }

    fn page_sizes(&self) -> PageSizes {
        self.pages
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WineError {
    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("API error: {message} ({status})")]
    ApiError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WineError {
    pub fn validation(message: impl Into<String>) -> Self {
        WineError::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        WineError::ConfigError {
            message: message.into(),
        }
    }

    /// 傳輸層錯誤（連線失敗、逾時）與非 2xx 回應在畫面上顯示相同訊息，只在日誌中區分
    pub fn is_transport(&self) -> bool {
        matches!(self, WineError::TransportError(e) if !e.is_decode() && e.status().is_none())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            WineError::TransportError(e) if e.is_decode() => ErrorCategory::Data,
            WineError::TransportError(_) => ErrorCategory::Network,
            WineError::ApiError { .. } => ErrorCategory::Api,
            WineError::CsvError(_)
            | WineError::SerializationError(_)
            | WineError::ValidationError { .. } => ErrorCategory::Data,
            WineError::ZipError(_) | WineError::IoError(_) => ErrorCategory::Io,
            WineError::UrlError(_)
            | WineError::ConfigError { .. }
            | WineError::InvalidConfigValueError { .. }
            | WineError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者的單一訊息；傳輸錯誤與 API 錯誤合併為同一句
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Api => {
                "Could not load data from the wine API".to_string()
            }
            ErrorCategory::Data => format!("Received data could not be processed: {}", self),
            ErrorCategory::Io => format!("Could not write output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the API server is running and --api-url is correct",
            ErrorCategory::Api => "The API rejected the request; check the filter values",
            ErrorCategory::Data => "Check the input values or run with --verbose for details",
            ErrorCategory::Io => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
        }
    }

    /// CLI 結束碼：設定錯誤為 2，其餘為 1
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status() {
        let err = WineError::ApiError {
            status: 404,
            message: "Wine not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: Wine not found (404)");
        assert_eq!(err.category(), ErrorCategory::Api);
        assert!(!err.is_transport());
    }

    #[test]
    fn test_api_and_network_share_user_message() {
        let api = WineError::ApiError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(
            api.user_friendly_message(),
            "Could not load data from the wine API"
        );
    }

    #[test]
    fn test_config_errors_exit_with_two() {
        let err = WineError::MissingConfigError {
            field: "api.base_url".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(WineError::validation("bad").exit_code(), 1);
    }
}

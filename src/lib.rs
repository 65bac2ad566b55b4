pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, Settings};

pub use app::{render_error, Dashboard, ExportFormat, Exporter, View};
pub use core::client::HttpWineApi;
pub use utils::error::{Result, WineError};

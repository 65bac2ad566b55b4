#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use settings::Settings;
pub use storage::LocalStorage;

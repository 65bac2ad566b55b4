pub mod dashboard;
pub mod export;
pub mod shell;
pub mod views;

pub use dashboard::{render_error, Dashboard, View};
pub use export::{ExportFormat, Exporter};

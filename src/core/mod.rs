pub mod browse;
pub mod bucket;
pub mod client;
pub mod filters;
pub mod heatmap;
pub mod pagination;
pub mod rag;
pub mod scatter;
pub mod search;
pub mod world_map;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BucketRange, BucketSize, PageSizes, WineFilters};
pub use crate::domain::ports::{ConfigProvider, Storage, WineApi};
pub use crate::utils::error::Result;

//! Services for index building, usage normalization and archive loading

pub mod cache;
pub mod data_loader;
pub mod format_tree;
pub mod normalizer;
pub mod usage_stats;

pub use cache::{DatasetKey, IndexCacheService, MemoryPayloadCache, PayloadCache};
pub use data_loader::{DataLoaderService, IndexLoadResult};
pub use format_tree::FormatTreeBuilder;
pub use normalizer::to_slug;
pub use usage_stats::UsageStatNormalizer;

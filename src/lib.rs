#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod config;
pub mod error;
pub mod metrics;

// Ядро выбора: версии -> фильтры -> диапазоны -> выборка -> локатор
pub mod version;  // src/version.rs
pub mod filter;   // src/filter.rs
pub mod matcher;  // src/matcher.rs
pub mod sampler;  // src/sampler.rs
pub mod locator;  // src/locator.rs

// Кеш метаданных (databases.json)
pub mod catalog;

// Удобные реэкспорты
pub use config::SnapConfig;
pub use error::{SelectError, SelectResult};
pub use filter::{parse_filter_expr, FilterRange};
pub use locator::SnapshotLocator;
pub use matcher::match_range;
pub use sampler::pick_subset;
pub use version::{compare_versions, parse_file_ver, sort_files_by_ver, VersionKey};

//! Lightweight global metrics for SnapPick.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - перечисление каталога снапшотов
//! - фильтры-диапазоны
//! - выборка подмножества (pick_subset)
//! - кеш метаданных (databases.json)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Enumeration -----
static FILES_ENUMERATED: AtomicU64 = AtomicU64::new(0);

// ----- Range filters -----
static RANGES_EVALUATED: AtomicU64 = AtomicU64::new(0);
static RANGE_FILES_MATCHED: AtomicU64 = AtomicU64::new(0);

// ----- Sampler -----
static SAMPLER_RUNS: AtomicU64 = AtomicU64::new(0);
static SAMPLER_DRAWS: AtomicU64 = AtomicU64::new(0);
static SAMPLER_COVERED_SKIPPED: AtomicU64 = AtomicU64::new(0);

// ----- Catalog -----
static CATALOG_INSPECTED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub files_enumerated: u64,

    pub ranges_evaluated: u64,
    pub range_files_matched: u64,

    pub sampler_runs: u64,
    pub sampler_draws: u64,
    /// Candidates passed over because their series was already covered.
    pub sampler_covered_skipped: u64,

    pub catalog_inspected: u64,
}

pub fn record_files_enumerated(n: u64) {
    FILES_ENUMERATED.fetch_add(n, Ordering::Relaxed);
}

pub fn record_range_evaluated() {
    RANGES_EVALUATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_range_matched(n: u64) {
    RANGE_FILES_MATCHED.fetch_add(n, Ordering::Relaxed);
}

pub fn record_sampler_run() {
    SAMPLER_RUNS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_sampler_draw(skipped: u64) {
    SAMPLER_DRAWS.fetch_add(1, Ordering::Relaxed);
    SAMPLER_COVERED_SKIPPED.fetch_add(skipped, Ordering::Relaxed);
}

pub fn record_catalog_inspected() {
    CATALOG_INSPECTED.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        files_enumerated: FILES_ENUMERATED.load(Ordering::Relaxed),
        ranges_evaluated: RANGES_EVALUATED.load(Ordering::Relaxed),
        range_files_matched: RANGE_FILES_MATCHED.load(Ordering::Relaxed),
        sampler_runs: SAMPLER_RUNS.load(Ordering::Relaxed),
        sampler_draws: SAMPLER_DRAWS.load(Ordering::Relaxed),
        sampler_covered_skipped: SAMPLER_COVERED_SKIPPED.load(Ordering::Relaxed),
        catalog_inspected: CATALOG_INSPECTED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    FILES_ENUMERATED.store(0, Ordering::Relaxed);
    RANGES_EVALUATED.store(0, Ordering::Relaxed);
    RANGE_FILES_MATCHED.store(0, Ordering::Relaxed);
    SAMPLER_RUNS.store(0, Ordering::Relaxed);
    SAMPLER_DRAWS.store(0, Ordering::Relaxed);
    SAMPLER_COVERED_SKIPPED.store(0, Ordering::Relaxed);
    CATALOG_INSPECTED.store(0, Ordering::Relaxed);
}

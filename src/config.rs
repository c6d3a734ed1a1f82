//! Centralized configuration for SnapPick.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - SnapConfig::from_env() reads the SNAPPICK_* variables; CLI flags override
//!   them through the fluent `with_*` setters.
//!
//! Env:
//! - SNAPPICK_DIR       — snapshot directory (default "databases")
//! - SNAPPICK_PATTERNS  — comma-separated enumeration patterns
//! - SNAPPICK_SEED      — fixed RNG seed for reproducible sampling
//! - SNAPPICK_PROJECT   — project root scanned by update-json (default ".")
//! - SNAPPICK_METADATA  — metadata cache file (default <project>/databases.json)
//! - SNAPPICK_BZCAT     — decompressor used to read .bz2 dumps (default "bzcat")

use std::fmt;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::consts::{DEFAULT_BZCAT, DEFAULT_SNAPSHOT_DIR, METADATA_FILE, SNAPSHOT_PATTERNS};

#[derive(Clone, Debug)]
pub struct SnapConfig {
    /// Directory holding the snapshot dumps.
    /// Env: SNAPPICK_DIR
    pub snapshot_dir: PathBuf,

    /// File-name patterns enumerated inside `snapshot_dir`.
    /// Env: SNAPPICK_PATTERNS = "*.sql.gz,*.sql.bz2"
    pub patterns: Vec<String>,

    /// Fixed seed for the sampler; None draws one from the OS.
    /// Env: SNAPPICK_SEED
    pub seed: Option<u64>,

    /// Root scanned for `database*/` folders by the catalog update.
    /// Env: SNAPPICK_PROJECT
    pub project_root: PathBuf,

    /// Explicit metadata cache path; None means <project_root>/databases.json.
    /// Env: SNAPPICK_METADATA
    pub metadata_file: Option<PathBuf>,

    /// Program that writes a decompressed .bz2 stream to stdout.
    /// Env: SNAPPICK_BZCAT
    pub bzcat: String,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            patterns: SNAPSHOT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            seed: None,
            project_root: PathBuf::from("."),
            metadata_file: None,
            bzcat: DEFAULT_BZCAT.to_string(),
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SnapConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_nonempty("SNAPPICK_DIR") {
            cfg.snapshot_dir = PathBuf::from(v);
        }

        if let Some(v) = env_nonempty("SNAPPICK_PATTERNS") {
            let pats: Vec<String> = v
                .split(',')
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !pats.is_empty() {
                cfg.patterns = pats;
            }
        }

        if let Some(v) = env_nonempty("SNAPPICK_SEED") {
            if let Ok(n) = v.parse::<u64>() {
                cfg.seed = Some(n);
            }
        }

        if let Some(v) = env_nonempty("SNAPPICK_PROJECT") {
            cfg.project_root = PathBuf::from(v);
        }

        if let Some(v) = env_nonempty("SNAPPICK_METADATA") {
            cfg.metadata_file = Some(PathBuf::from(v));
        }

        if let Some(v) = env_nonempty("SNAPPICK_BZCAT") {
            cfg.bzcat = v;
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_snapshot_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_project_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_metadata_file<P: Into<PathBuf>>(mut self, file: Option<P>) -> Self {
        self.metadata_file = file.map(Into::into);
        self
    }

    pub fn with_bzcat<S: Into<String>>(mut self, cmd: S) -> Self {
        self.bzcat = cmd.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.metadata_file
            .clone()
            .unwrap_or_else(|| self.project_root.join(METADATA_FILE))
    }

    /// Sampler RNG: seeded when `seed` is set, otherwise from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}

impl fmt::Display for SnapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SnapConfig {{ \
             snapshot_dir: {}, \
             patterns: [{}], \
             seed: {}, \
             project_root: {}, \
             metadata_file: {}, \
             bzcat: {} \
             }}",
            self.snapshot_dir.display(),
            self.patterns.join(","),
            self.seed
                .map(|v| v.to_string())
                .unwrap_or_else(|| "random".to_string()),
            self.project_root.display(),
            self.metadata_path().display(),
            self.bzcat,
        )
    }
}

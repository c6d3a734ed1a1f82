//! SnapshotLocator: resolves filter arguments against a snapshot directory.
//!
//! Argument kinds, checked in this order:
//! - ""            — ignored
//! - existing file — taken as is
//! - "@..."        — range expression over the enumerated snapshots
//! - contains '*'  — glob inside the snapshot directory
//! - anything else — SelectError::UnrecognizedArgument
//!
//! Results of all arguments are concatenated, then de-duplicated and sorted
//! by version. One bad argument fails the whole call.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};
use rand::Rng;

use crate::config::SnapConfig;
use crate::consts::SNAPSHOT_PATTERNS;
use crate::error::{SelectError, SelectResult};
use crate::filter::{is_glob_expr, is_range_expr, parse_filter_expr};
use crate::matcher::match_range;
use crate::metrics::record_files_enumerated;
use crate::version::sort_files_by_ver;

#[derive(Debug)]
pub struct SnapshotLocator {
    base_path: PathBuf,
    patterns: Vec<String>,
    // Enumerated lazily, once per locator.
    all: OnceCell<Vec<String>>,
}

impl SnapshotLocator {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
            patterns: SNAPSHOT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            all: OnceCell::new(),
        }
    }

    pub fn from_config(cfg: &SnapConfig) -> Self {
        Self {
            base_path: cfg.snapshot_dir.clone(),
            patterns: cfg.patterns.clone(),
            all: OnceCell::new(),
        }
    }

    /// Locator over an already enumerated list (no directory scan for ranges).
    pub fn from_files<P: Into<PathBuf>>(base_path: P, files: Vec<String>) -> Self {
        Self {
            base_path: base_path.into(),
            patterns: Vec::new(),
            all: OnceCell::from(files),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// All snapshot files: each pattern's matches in pattern order.
    pub fn all(&self) -> SelectResult<&[String]> {
        if let Some(files) = self.all.get() {
            return Ok(files.as_slice());
        }
        let mut files = Vec::new();
        for pat in &self.patterns {
            files.extend(self.glob_in_base(pat)?);
        }
        debug!(
            "enumerated {} snapshot(s) in {}",
            files.len(),
            self.base_path.display()
        );
        record_files_enumerated(files.len() as u64);
        Ok(self.all.get_or_init(|| files).as_slice())
    }

    /// Resolve a single argument (unsorted for globs/paths, see module docs).
    pub fn resolve<R: Rng + ?Sized>(&self, arg: &str, rng: &mut R) -> SelectResult<Vec<String>> {
        if arg.is_empty() {
            return Ok(Vec::new());
        }
        if Path::new(arg).is_file() {
            debug!("{}: existing file", arg);
            return Ok(vec![arg.to_string()]);
        }
        if is_range_expr(arg) {
            let range = parse_filter_expr(arg)?;
            return Ok(match_range(self.all()?, &range, rng));
        }
        if is_glob_expr(arg) {
            let files = self.glob_in_base(arg)?;
            debug!("{}: glob matched {} file(s)", arg, files.len());
            return Ok(files);
        }
        Err(SelectError::UnrecognizedArgument(arg.to_string()))
    }

    /// Resolve every argument, concatenate, de-duplicate and sort by version.
    pub fn find<S, R>(&self, args: &[S], rng: &mut R) -> SelectResult<Vec<String>>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut files: Vec<String> = Vec::new();
        for arg in args {
            files.extend(self.resolve(arg.as_ref(), rng)?);
        }
        Ok(sort_files_by_ver(&files))
    }

    fn glob_in_base(&self, pattern: &str) -> SelectResult<Vec<String>> {
        // Only the directory part is escaped; the pattern keeps its wildcards.
        let base = Pattern::escape(&self.base_path.to_string_lossy());
        let full = PathBuf::from(base).join(pattern);
        let full = full.to_string_lossy();

        let paths = glob::glob(&full).map_err(|source| SelectError::Pattern {
            pattern: full.to_string(),
            source,
        })?;

        let mut out = Vec::new();
        for entry in paths {
            match entry {
                Ok(p) => out.push(p.to_string_lossy().into_owned()),
                Err(e) => warn!("skip unreadable entry: {}", e),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn listed() -> SnapshotLocator {
        SnapshotLocator::from_files(
            "/nonexistent-snapshots",
            vec![
                "/nonexistent-snapshots/4.4.0-setupsh.sql.bz2".into(),
                "/nonexistent-snapshots/4.2.0-setupsh.sql.bz2".into(),
                "/nonexistent-snapshots/4.3.0-setupsh.sql.bz2".into(),
            ],
        )
    }

    #[test]
    fn range_over_listed_files() {
        let loc = listed();
        let mut rng = StdRng::seed_from_u64(0);
        // 4.2.0 sits above the bare "4.2" bound, 4.4.0 above "4.4"
        let got = loc.find(&["@4.2..4.4"], &mut rng).unwrap();
        assert_eq!(
            got,
            vec![
                "/nonexistent-snapshots/4.2.0-setupsh.sql.bz2",
                "/nonexistent-snapshots/4.3.0-setupsh.sql.bz2",
            ]
        );
        let got = loc.find(&["@4.2.0..4.4"], &mut rng).unwrap();
        assert_eq!(got, vec!["/nonexistent-snapshots/4.3.0-setupsh.sql.bz2"]);
    }

    #[test]
    fn concatenation_dedups_and_sorts() {
        let loc = listed();
        let mut rng = StdRng::seed_from_u64(0);
        let got = loc.find(&["@4.4", "@4.3..", ""], &mut rng).unwrap();
        assert_eq!(
            got,
            vec![
                "/nonexistent-snapshots/4.2.0-setupsh.sql.bz2",
                "/nonexistent-snapshots/4.3.0-setupsh.sql.bz2",
                "/nonexistent-snapshots/4.4.0-setupsh.sql.bz2",
            ]
        );
    }

    #[test]
    fn unrecognized_argument_aborts() {
        let loc = listed();
        let mut rng = StdRng::seed_from_u64(0);
        match loc.find(&["@4.4", "no-such-file.sql.gz"], &mut rng) {
            Err(SelectError::UnrecognizedArgument(a)) => assert_eq!(a, "no-such-file.sql.gz"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_range_aborts() {
        let loc = listed();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            loc.find(&["@4.4", "@abc"], &mut rng),
            Err(SelectError::MalformedExpression(_))
        ));
    }
}

//! Version keys embedded in snapshot file names.
//!
//! `/path/to/4.2.0-setupsh.sql.bz2` -> `4.2.0`.
//!
//! Порядок сегментов в одной позиции (от меньшего к большему):
//!   Other("...") < alphaN < betaN < (сегмент отсутствует) < число
//!
//! Итого: `4.2 < 4.2.1`, `4.6.alpha1 < 4.6.beta1 < 4.6.0`, `5.0.alpha1 < 5.0`,
//! и `4.10.0 > 4.9.0` (сравнение числовое, не строковое).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::consts::SNAPSHOT_SUFFIXES;

/// Decimal digit run of any length, kept as text without leading zeros.
///
/// Ordered by length first, then lexically: same as integer order, with no
/// upper bound on the value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// `None` unless `s` is a non-empty run of ASCII digits.
    pub fn parse(s: &str) -> Option<Self> {
        if !is_digits(s) {
            return None;
        }
        let trimmed = s.trim_start_matches('0');
        Some(Number(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number(n.to_string())
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One dot-separated component of a version.
///
/// Variant order is the comparison order; the derived `Ord` relies on it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// Anything that is neither numeric nor a pre-release tag.
    Other(String),
    Alpha(Option<Number>),
    Beta(Option<Number>),
    Numeric(Number),
}

impl Segment {
    pub fn parse(s: &str) -> Self {
        if let Some(n) = Number::parse(s) {
            return Segment::Numeric(n);
        }
        if let Some(rest) = s.strip_prefix("alpha") {
            if let Some(n) = tag_number(rest) {
                return Segment::Alpha(n);
            }
        }
        if let Some(rest) = s.strip_prefix("beta") {
            if let Some(n) = tag_number(rest) {
                return Segment::Beta(n);
            }
        }
        Segment::Other(s.to_string())
    }

    /// How this segment compares against a position the other key does not have.
    fn cmp_missing(&self) -> Ordering {
        match self {
            Segment::Numeric(_) => Ordering::Greater,
            _ => Ordering::Less,
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// "" -> Some(None), "12" -> Some(Some(12)), "x" -> None
fn tag_number(rest: &str) -> Option<Option<Number>> {
    if rest.is_empty() {
        return Some(None);
    }
    Number::parse(rest).map(Some)
}

/// Parsed version with its original text kept for display.
#[derive(Clone, Debug)]
pub struct VersionKey {
    raw: String,
    segments: Vec<Segment>,
}

impl VersionKey {
    pub fn parse(s: &str) -> Self {
        Self {
            raw: s.to_string(),
            segments: s.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First two dot-separated components: `4.2.10` -> `4.2`.
    /// A single-component key is its own series.
    pub fn major_minor(&self) -> &str {
        let mut dots = self.raw.match_indices('.');
        dots.next();
        match dots.next() {
            Some((idx, _)) => &self.raw[..idx],
            None => &self.raw,
        }
    }
}

impl From<&str> for VersionKey {
    fn from(s: &str) -> Self {
        VersionKey::parse(s)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for VersionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.segments.iter();
        let mut b = other.segments.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(x), Some(y)) => match x.cmp(y) {
                    Ordering::Equal => continue,
                    o => return o,
                },
                (Some(x), None) => return x.cmp_missing(),
                (None, Some(y)) => return y.cmp_missing().reverse(),
            }
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the ordering: "4.02" == "4.2".
impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::parse(a).cmp(&VersionKey::parse(b))
}

/// Extract the version part of a snapshot file name.
///
/// Base name up to the first `-`. Names without a `-` only lose their dump
/// suffix (`4.7.sql.gz` -> `4.7`).
pub fn parse_file_ver(file: &str) -> VersionKey {
    let name = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());

    let ver = match name.find('-') {
        Some(idx) => &name[..idx],
        None => SNAPSHOT_SUFFIXES
            .iter()
            .find_map(|sfx| name.strip_suffix(*sfx))
            .unwrap_or(name.as_str()),
    };
    VersionKey::parse(ver)
}

/// Major.minor series of a snapshot file.
pub fn file_major_minor(file: &str) -> String {
    parse_file_ver(file).major_minor().to_string()
}

/// De-duplicate (first occurrence wins) and sort ascending by version.
///
/// The sort is stable, so files sharing a version keep their relative order
/// and a second pass is a no-op.
pub fn sort_files_by_ver<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(files.len());
    let mut keyed: Vec<(VersionKey, String)> = Vec::with_capacity(files.len());
    for f in files {
        let f = f.as_ref();
        if seen.insert(f) {
            keyed.push((parse_file_ver(f), f.to_string()));
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, f)| f).collect()
}

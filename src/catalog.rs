//! Snapshot metadata cache (`databases.json`).
//!
//! Формат: <project>/databases.json
//! {
//!   "databases/4.2.0-setupsh.sql.bz2": {
//!     "set": "databases",
//!     "name": "4.2.0-setupsh",
//!     "civicrm": "4.2.0",
//!     "mysql": "5.5.35",
//!     "uf": "Drupal",
//!     "keyword": "setupsh"
//!   },
//!   ...
//! }
//!
//! Замечания:
//! - Ключи отсортированы (BTreeMap), уже известные файлы повторно не читаются.
//! - Файл переписывается только при изменениях, атомарно через tmp+rename.
//! - Версия MySQL берётся из строки "-- MySQL dump ..." в начале дампа.

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use glob::Pattern;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::consts::{
    CATALOG_JSON_INDENT, DUMP_HEADER_MARKER, DUMP_HEADER_VERSION_FIELD, METADATA_SCAN_PATTERN,
    UF_DEFAULT, UF_STANDALONE,
};
use crate::metrics::record_catalog_inspected;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub civicrm: Option<String>,
    #[serde(default)]
    pub mysql: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

pub type Catalog = BTreeMap<String, SnapshotRecord>;

/// Pieces of `<civicrm>-<keyword>.(my)sql...` file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpName {
    pub name: String,
    pub civicrm: String,
    pub keyword: String,
}

/// `4.7.31-drupal_multilingual.sql.bz2` -> name `4.7.31-drupal_multilingual`,
/// civicrm `4.7.31`, keyword `drupal_multilingual`.
pub fn parse_dump_name(file_name: &str) -> Option<DumpName> {
    let ver_len = file_name
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'.')
        .count();
    if ver_len == 0 {
        return None;
    }
    let rest = file_name[ver_len..].strip_prefix('-')?;
    let kw_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();
    if kw_len == 0 {
        return None;
    }
    let tail = &rest[kw_len..];
    if !(tail.starts_with(".sql") || tail.starts_with(".mysql")) {
        return None;
    }
    let civicrm = &file_name[..ver_len];
    let keyword = &rest[..kw_len];
    Some(DumpName {
        name: format!("{}-{}", civicrm, keyword),
        civicrm: civicrm.to_string(),
        keyword: keyword.to_string(),
    })
}

/// Server version from the first `-- MySQL dump` line; "" when there is none.
///
/// `-- MySQL dump 10.13  Distrib 5.7.33, for Linux (x86_64)` -> `5.7.33`
/// (7th single-space separated field, trailing comma dropped).
pub fn scan_dump_header<R: BufRead>(mut reader: R) -> Result<String> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(String::new());
        }
        let line = String::from_utf8_lossy(&buf);
        if line.contains(DUMP_HEADER_MARKER) {
            let line = line.trim_end_matches(['\r', '\n']);
            let field = if line.contains(' ') {
                line.split(' ').nth(DUMP_HEADER_VERSION_FIELD).unwrap_or("")
            } else {
                line
            };
            return Ok(field
                .trim_matches(|c| matches!(c, ' ' | '\r' | '\n' | '\t' | ','))
                .to_string());
        }
    }
}

/// Reads the server version out of a compressed dump.
pub trait DumpInspector {
    fn server_version(&self, dump: &Path) -> Result<String>;
}

/// `.gz` through flate2, `.bz2` through an external decompressor, anything
/// else as plain text.
#[derive(Debug, Clone)]
pub struct DecompressInspector {
    bzcat: String,
}

impl DecompressInspector {
    pub fn new<S: Into<String>>(bzcat: S) -> Self {
        Self { bzcat: bzcat.into() }
    }

    fn via_command(&self, dump: &Path) -> Result<String> {
        let mut child = Command::new(&self.bzcat)
            .arg(dump)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawn {} {}", self.bzcat, dump.display()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("no stdout from {}", self.bzcat))?;
        let res = scan_dump_header(BufReader::new(stdout));
        // Header found (or stream failed): the rest of the dump is not needed.
        let _ = child.kill();
        let _ = child.wait();
        res
    }
}

impl DumpInspector for DecompressInspector {
    fn server_version(&self, dump: &Path) -> Result<String> {
        let name = dump
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.ends_with(".gz") {
            let f = File::open(dump).with_context(|| format!("open {}", dump.display()))?;
            scan_dump_header(BufReader::new(GzDecoder::new(f)))
        } else if name.ends_with(".bz2") {
            self.via_command(dump)
        } else {
            let f = File::open(dump).with_context(|| format!("open {}", dump.display()))?;
            scan_dump_header(BufReader::new(f))
        }
    }
}

pub fn catalog_load(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Ok(Catalog::new());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let cat: Catalog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(cat)
}

/// Pretty JSON with 4-space indentation, the layout committed cache files use.
pub fn catalog_to_json(cat: &Catalog) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let fmt = PrettyFormatter::with_indent(CATALOG_JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    cat.serialize(&mut ser).context("serialize catalog")?;
    Ok(out)
}

pub fn catalog_save(path: &Path, cat: &Catalog) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("metadata path has no file name: {}", path.display()))?;
    let tmp = dir.join(format!("{}.tmp", file_name.to_string_lossy()));

    let mut f = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp)
        .with_context(|| format!("open {}", tmp.display()))?;

    f.write_all(&catalog_to_json(cat)?)?;
    let _ = f.sync_all();

    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CatalogUpdate {
    /// Ids inspected in this run (not present in the old cache).
    pub found: Vec<String>,
    pub changed: bool,
    pub path: PathBuf,
}

/// Scan `<project>/database*/*sql*z*`, inspect files missing from the cache
/// and rewrite the cache if anything was added.
pub fn catalog_update(
    project_root: &Path,
    metadata_path: &Path,
    inspector: &dyn DumpInspector,
) -> Result<CatalogUpdate> {
    let old = catalog_load(metadata_path)?;
    let mut new = old.clone();
    let mut found = Vec::new();

    let base = Pattern::escape(&project_root.to_string_lossy());
    let pattern = PathBuf::from(base).join(METADATA_SCAN_PATTERN);
    let pattern = pattern.to_string_lossy();
    let entries =
        glob::glob(&pattern).with_context(|| format!("bad scan pattern {}", pattern))?;

    for entry in entries {
        let f = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("skip unreadable entry: {}", e);
                continue;
            }
        };
        let set = f
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = f
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = format!("{}/{}", set, file_name);
        if old.contains_key(&id) {
            continue;
        }

        debug!("found {}", id);
        record_catalog_inspected();
        let mysql = match inspector.server_version(&f) {
            Ok(v) => v,
            Err(e) => {
                warn!("inspect {}: {:#}", f.display(), e);
                String::new()
            }
        };
        debug!("{}: mysql={:?}", id, mysql);

        let parts = parse_dump_name(&file_name);
        let uf = if set.contains("standalone") {
            UF_STANDALONE
        } else {
            UF_DEFAULT
        };
        new.insert(
            id.clone(),
            SnapshotRecord {
                set,
                name: parts.as_ref().map(|p| p.name.clone()),
                civicrm: parts.as_ref().map(|p| p.civicrm.clone()),
                mysql,
                uf: uf.to_string(),
                keyword: parts.map(|p| p.keyword),
            },
        );
        found.push(id);
    }

    let changed = new != old;
    if changed {
        debug!("update {}", metadata_path.display());
        catalog_save(metadata_path, &new)?;
    } else {
        debug!("no changes");
    }

    Ok(CatalogUpdate {
        found,
        changed,
        path: metadata_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn dump_name_parts() {
        let p = parse_dump_name("4.7.31-drupal_multilingual.sql.bz2").unwrap();
        assert_eq!(p.name, "4.7.31-drupal_multilingual");
        assert_eq!(p.civicrm, "4.7.31");
        assert_eq!(p.keyword, "drupal_multilingual");

        let p = parse_dump_name("5.0.0-setup-sh.mysql.gz").unwrap();
        assert_eq!(p.keyword, "setup-sh");

        assert!(parse_dump_name("notes.txt").is_none());
        assert!(parse_dump_name("4.2.0.sql.gz").is_none());
        assert!(parse_dump_name("4.2.0-x.tar.gz").is_none());
    }

    #[test]
    fn header_version_field() {
        let dump = "\n-- MySQL dump 10.13  Distrib 5.7.33, for Linux (x86_64)\n--\nCREATE TABLE x;\n";
        assert_eq!(scan_dump_header(Cursor::new(dump)).unwrap(), "5.7.33");
    }

    #[test]
    fn header_missing_gives_empty() {
        let dump = "CREATE TABLE x;\nINSERT INTO x VALUES (1);\n";
        assert_eq!(scan_dump_header(Cursor::new(dump)).unwrap(), "");
    }
}

//! Общие константы (каталог снапшотов, шаблоны файлов, кеш метаданных).

// -------- Snapshot directory --------
pub const DEFAULT_SNAPSHOT_DIR: &str = "databases";

// Suffixes recognised as database dumps. Order matters for enumeration:
// results of each pattern are appended in this order before sorting.
pub const SNAPSHOT_PATTERNS: [&str; 4] = ["*.sql.bz2", "*.sql.gz", "*.mysql.bz2", "*.mysql.gz"];
pub const SNAPSHOT_SUFFIXES: [&str; 4] = [".sql.bz2", ".sql.gz", ".mysql.bz2", ".mysql.gz"];

// -------- Filter expressions --------
pub const RANGE_PREFIX: char = '@';
pub const RANGE_SEP: &str = "..";
pub const COUNT_SEP: char = ':';
pub const GLOB_CHAR: char = '*';

// -------- Metadata cache (databases.json) --------
pub const METADATA_FILE: &str = "databases.json";
pub const CATALOG_JSON_INDENT: &[u8] = b"    ";
// Scan pattern relative to the project root: <project>/database*/*sql*z*
pub const METADATA_SCAN_PATTERN: &str = "database*/*sql*z*";
pub const DUMP_HEADER_MARKER: &str = "-- MySQL dump";
// 0-based index of the server version in the space-split header line.
pub const DUMP_HEADER_VERSION_FIELD: usize = 6;
pub const UF_STANDALONE: &str = "Standalone";
pub const UF_DEFAULT: &str = "Drupal";
pub const DEFAULT_BZCAT: &str = "bzcat";

// -------- CLI exit codes --------
pub const EXIT_MISSING_ARGUMENT: i32 = 1;
pub const EXIT_UNRECOGNIZED_ARGUMENT: i32 = 3;
pub const EXIT_MALFORMED_EXPRESSION: i32 = 4;
pub const EXIT_FAILURE: i32 = 5;

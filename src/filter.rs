//! Filter expressions.
//!
//! Два вида фильтров:
//! - glob: любая строка с `*` (передаётся в перечисление каталога как есть);
//! - диапазон: строка, начинающаяся с `@`.
//!
//! Range grammar:
//! ```text
//! '@' [ MinVersion '..' ] [ MaxVersion ] [ ':' MaxCount ]
//! Version   := digit+ ('.' Segment)*
//! Segment   := digit+ | ('alpha'|'beta') digit*
//! MaxCount  := digit+
//! ```
//! Examples: `@4.5`, `@4.2..4.5`, `@4.2..`, `@4.5:10`, `@4.2..4.5:10`.
//! At least one version bound must be present.

use std::fmt;

use serde::Serialize;

use crate::consts::{COUNT_SEP, GLOB_CHAR, RANGE_PREFIX, RANGE_SEP};
use crate::error::{SelectError, SelectResult};
use crate::version::VersionKey;

/// Parsed `@`-expression. `None` is the only representation of "unset".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterRange {
    #[serde(rename = "minVer")]
    pub min_ver: Option<VersionKey>,
    #[serde(rename = "maxVer")]
    pub max_ver: Option<VersionKey>,
    #[serde(rename = "maxCount")]
    pub max_count: Option<usize>,
}

impl fmt::Display for FilterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RANGE_PREFIX)?;
        if let Some(min) = &self.min_ver {
            write!(f, "{}{}", min, RANGE_SEP)?;
        }
        if let Some(max) = &self.max_ver {
            write!(f, "{}", max)?;
        }
        if let Some(n) = self.max_count {
            write!(f, "{}{}", COUNT_SEP, n)?;
        }
        Ok(())
    }
}

pub fn is_range_expr(arg: &str) -> bool {
    arg.starts_with(RANGE_PREFIX)
}

pub fn is_glob_expr(arg: &str) -> bool {
    arg.contains(GLOB_CHAR)
}

/// Parse a `@`-expression. Fails on anything outside the grammar.
pub fn parse_filter_expr(expr: &str) -> SelectResult<FilterRange> {
    let malformed = || SelectError::MalformedExpression(expr.to_string());

    let body = expr.strip_prefix(RANGE_PREFIX).ok_or_else(malformed)?;
    let mut p = Cursor::new(body);

    let first = p.version();
    let (min_ver, max_ver) = if p.eat(RANGE_SEP) {
        // "@..4.5" — нижняя граница обязательна перед ".."
        let min = first.ok_or_else(malformed)?;
        (Some(min), p.version())
    } else {
        (None, first)
    };

    let max_count = if p.eat_char(COUNT_SEP) {
        Some(p.count().ok_or_else(malformed)?)
    } else {
        None
    };

    if !p.at_end() || (min_ver.is_none() && max_ver.is_none()) {
        return Err(malformed());
    }

    Ok(FilterRange {
        min_ver: min_ver.map(VersionKey::parse),
        max_ver: max_ver.map(VersionKey::parse),
        max_count,
    })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, tok: &str) -> bool {
        if self.rest().starts_with(tok) {
            self.pos += tok.len();
            true
        } else {
            false
        }
    }

    fn eat_char(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> usize {
        let n = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        self.pos += n;
        n
    }

    /// `digit+ ('.' Segment)*`; returns the matched text without consuming
    /// anything on failure. A '.' is only taken when a segment follows it,
    /// which leaves ".." for the range separator.
    fn version(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.digits() == 0 {
            return None;
        }
        loop {
            let rest = self.rest();
            let Some(after_dot) = rest.strip_prefix('.') else {
                break;
            };
            let seg_len = segment_len(after_dot);
            if seg_len == 0 {
                break;
            }
            self.pos += 1 + seg_len;
        }
        Some(&self.src[start..self.pos])
    }

    fn count(&mut self) -> Option<usize> {
        let start = self.pos;
        if self.digits() == 0 {
            return None;
        }
        self.src[start..self.pos].parse::<usize>().ok()
    }
}

// Length of the segment at the start of `s`, 0 if there is none.
fn segment_len(s: &str) -> usize {
    let digits = |t: &str| t.bytes().take_while(|b| b.is_ascii_digit()).count();
    let n = digits(s);
    if n > 0 {
        return n;
    }
    for tag in ["alpha", "beta"] {
        if let Some(tail) = s.strip_prefix(tag) {
            return tag.len() + digits(tail);
        }
    }
    0
}

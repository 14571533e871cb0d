//! Textual codepoint → value mapping, the input of `colltrie build`.
//!
//! One mapping per line, `#` starts a comment:
//!
//! ```text
//! # codepoint(s)   value
//! 0041             12
//! U+00C0..U+00C5 ; 0x1F
//! 1F600            7
//! ```
//!
//! Codepoints are hex with an optional `U+` or `0x` prefix; a range is two
//! codepoints joined by `..`. Values are decimal, or hex with a `0x` prefix.
//! The separator is whitespace, `;` or both.

use crate::error::{Result, TableError};
use crate::trie::TrieBuilder;
use std::path::Path;

/// A parsed line: inclusive codepoint range and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub first: char,
    pub last: char,
    pub value: u32,
}

/// Parse a whole mapping document
pub fn parse_mapping(text: &str) -> Result<Vec<MappingEntry>> {
    let mut entries = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        entries.push(parse_line(line).map_err(|msg| TableError::parse(i + 1, msg))?);
    }
    Ok(entries)
}

/// Parse a mapping and load it into a builder. Later lines override
/// earlier ones.
pub fn builder_from_mapping(text: &str) -> Result<TrieBuilder> {
    let mut builder = TrieBuilder::new();
    for entry in parse_mapping(text)? {
        builder.insert_range(entry.first..=entry.last, entry.value);
    }
    Ok(builder)
}

/// Read and parse a mapping file
pub fn load_mapping(path: &Path) -> Result<TrieBuilder> {
    let text = std::fs::read_to_string(path)?;
    builder_from_mapping(&text)
}

fn parse_line(line: &str) -> std::result::Result<MappingEntry, String> {
    let mut fields = line
        .split(|c: char| c == ';' || c.is_whitespace())
        .filter(|f| !f.is_empty());

    let cps = fields.next().ok_or("missing codepoint")?;
    let value = fields.next().ok_or("missing value")?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field '{}'", extra));
    }

    let (first, last) = match cps.split_once("..") {
        Some((a, b)) => (parse_codepoint(a)?, parse_codepoint(b)?),
        None => {
            let c = parse_codepoint(cps)?;
            (c, c)
        }
    };
    if first > last {
        return Err(format!("empty range {}", cps));
    }

    Ok(MappingEntry {
        first,
        last,
        value: parse_value(value)?,
    })
}

fn parse_codepoint(s: &str) -> std::result::Result<char, String> {
    let digits = strip_hex_prefix(s).unwrap_or(s);
    let cp = u32::from_str_radix(digits, 16).map_err(|_| format!("invalid codepoint '{}'", s))?;
    char::from_u32(cp).ok_or_else(|| format!("'{}' is not a Unicode scalar value", s))
}

fn parse_value(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid value '{}'", s))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    ["U+", "u+", "0x", "0X"].iter().find_map(|p| s.strip_prefix(p))
}

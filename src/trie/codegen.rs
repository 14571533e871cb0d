//! Emit a table pair as Rust source.
//!
//! The output declares two statics that can be wrapped with
//! [`Trie::new_unchecked`](super::Trie::new_unchecked) at zero cost:
//!
//! ```text
//! pub static COLLATION_INDEX: [u16; 640] = [ ... ];
//! pub static COLLATION_VALUES: [u32; 832] = [ ... ];
//! ```

use super::Trie;
use std::io::{self, Write};

/// Write `trie` as two `pub static` arrays prefixed with `name` (upper-cased).
/// `per_line` values are printed per row; 0 is treated as 1.
pub fn write_rust<W: Write>(trie: &Trie<'_>, name: &str, per_line: usize, out: &mut W) -> io::Result<()> {
    let name = static_prefix(name);
    let per_line = per_line.max(1);
    let index = trie.index();
    let values = trie.values();

    writeln!(out, "// Generated by colltrie. Do not edit.")?;
    writeln!(
        out,
        "// {} index blocks, {} value blocks",
        index.len() / super::utf8::BLOCK_SIZE,
        values.len() / super::utf8::BLOCK_SIZE
    )?;
    writeln!(out)?;

    writeln!(out, "#[rustfmt::skip]")?;
    writeln!(out, "pub static {}_INDEX: [u16; {}] = [", name, index.len())?;
    for row in index.chunks(per_line) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:#06x},", v)).collect();
        writeln!(out, "    {}", cells.join(" "))?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "#[rustfmt::skip]")?;
    writeln!(out, "pub static {}_VALUES: [u32; {}] = [", name, values.len())?;
    for row in values.chunks(per_line) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:#010x},", v)).collect();
        writeln!(out, "    {}", cells.join(" "))?;
    }
    writeln!(out, "];")?;
    Ok(())
}

/// Render to a `String`
pub fn to_rust_source(trie: &Trie<'_>, name: &str, per_line: usize) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_rust(trie, name, per_line, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Turn an arbitrary table name into an upper snake case identifier
fn static_prefix(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::testdata::{TEST_INDEX, TEST_VALUES, test_trie};

    /// Parse the hex literals of one emitted array back out of the source
    fn parse_array(src: &str, decl: &str) -> Vec<u64> {
        let start = src.find(decl).expect("declaration present");
        let body = &src[start..];
        let body = &body[body.find('[').unwrap() + 1..];
        let body = &body[body.find('[').unwrap() + 1..body.find("];").unwrap()];
        body.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).unwrap())
            .collect()
    }

    #[test]
    fn test_emits_both_statics() {
        let src = to_rust_source(&test_trie(), "collation", 8);
        assert!(src.starts_with("// Generated by colltrie. Do not edit."));
        assert!(src.contains("pub static COLLATION_INDEX: [u16; 640] = ["));
        assert!(src.contains("pub static COLLATION_VALUES: [u32; 832] = ["));
    }

    #[test]
    fn test_emitted_values_match_tables() {
        let src = to_rust_source(&test_trie(), "t", 16);
        let index = parse_array(&src, "T_INDEX");
        let values = parse_array(&src, "T_VALUES");
        assert_eq!(index, TEST_INDEX.iter().map(|&v| v as u64).collect::<Vec<_>>());
        assert_eq!(values, TEST_VALUES.iter().map(|&v| v as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_respect_per_line() {
        let src = to_rust_source(&test_trie(), "t", 10);
        let row = src.lines().find(|l| l.starts_with("    0x")).unwrap();
        assert_eq!(row.matches(',').count(), 10);
    }

    #[test]
    fn test_static_prefix() {
        assert_eq!(static_prefix("root-und"), "ROOT_UND");
        assert_eq!(static_prefix("9x"), "_9X");
        assert_eq!(static_prefix(""), "_");
    }
}

//! Output formatting for `colltrie lookup`

use crate::trie::{Segment, SegmentKind};
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print one line per segment of `input` to stdout
pub fn print_segments(input: &[u8], segments: &[Segment], color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_segments(&mut stdout, input, segments)
}

/// Render segments to any color-aware writer.
///
/// Format: `offset  bytes  scalar  value  kind`, e.g.
/// `     3  c3 a9        U+00E9 'é'  0x00000002  mapped`
pub fn write_segments<W: WriteColor>(out: &mut W, input: &[u8], segments: &[Segment]) -> io::Result<()> {
    for seg in segments {
        let bytes = &input[seg.start..seg.end()];
        write!(out, "{:>6}  {:<12} {:<12} {:#010x}  ", seg.start, hex_bytes(bytes), describe_scalar(bytes), seg.value)?;

        out.set_color(&kind_color(seg.kind))?;
        write!(out, "{}", kind_label(seg.kind))?;
        out.reset()?;
        writeln!(out)?;
    }
    Ok(())
}

fn kind_color(kind: SegmentKind) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match kind {
        SegmentKind::Mapped => spec.set_fg(Some(Color::Green)),
        SegmentKind::Unmapped => spec.set_fg(Some(Color::Yellow)),
        SegmentKind::Malformed => spec.set_fg(Some(Color::Red)).set_bold(true),
        SegmentKind::Truncated => spec.set_fg(Some(Color::Magenta)).set_bold(true),
    };
    spec
}

pub fn kind_label(kind: SegmentKind) -> &'static str {
    match kind {
        SegmentKind::Mapped => "mapped",
        SegmentKind::Unmapped => "unmapped",
        SegmentKind::Malformed => "malformed",
        SegmentKind::Truncated => "truncated",
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `U+XXXX 'c'` for a well-formed scalar, `-` otherwise
fn describe_scalar(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes).ok().and_then(|s| s.chars().next()) {
        Some(c) if c.is_control() || c.is_whitespace() => format!("U+{:04X}", c as u32),
        Some(c) => format!("U+{:04X} '{}'", c as u32, c),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::TrieBuilder;
    use termcolor::NoColor;

    fn render(input: &[u8]) -> String {
        let mut b = TrieBuilder::new();
        b.insert('é', 2);
        let tables = b.build().unwrap();
        let segments: Vec<_> = tables.trie().segments(input).collect();

        let mut out = NoColor::new(Vec::new());
        write_segments(&mut out, input, &segments).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_lines_per_segment() {
        let text = render("é a\u{80}".as_bytes());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("c3 a9"));
        assert!(lines[0].contains("U+00E9 'é'"));
        assert!(lines[0].contains("0x00000002"));
        assert!(lines[0].ends_with("mapped"));
        assert!(lines[1].contains("U+0020"));
        assert!(lines[3].ends_with("unmapped"));
    }

    #[test]
    fn test_malformed_and_truncated() {
        let text = render(b"\xff\xe2\x82");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ff"));
        assert!(lines[0].contains(" - "));
        assert!(lines[0].ends_with("malformed"));
        assert!(lines[1].contains("e2 82"));
        assert!(lines[1].ends_with("truncated"));
    }
}

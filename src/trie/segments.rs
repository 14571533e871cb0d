//! Classifying iterator over a byte stream.
//!
//! [`Trie::lookup`] cannot tell an unmapped codepoint from invalid input:
//! both come back as value `0`. `Segments` repeats the lookup across a buffer
//! and validates each consumed run on the side, so callers that care about
//! the difference get it without a separate decoding pass.

use super::Trie;
use super::utf8::is_continuation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Well-formed scalar value with a non-zero value
    Mapped,
    /// Well-formed scalar value without a mapping
    Unmapped,
    /// Bytes that are not well-formed UTF-8 (includes overlong and surrogate
    /// encodings, which the trie walks like any other sequence)
    Malformed,
    /// Incomplete sequence at the end of the input: a lead byte followed only
    /// by continuation bytes, too few of them
    Truncated,
}

/// One lookup step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Byte offset in the scanned buffer
    pub start: usize,
    /// Bytes covered by this step
    pub len: usize,
    /// Value returned by the trie (may be non-zero for malformed input when
    /// the tables map that path)
    pub value: u32,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Iterator returned by [`Trie::segments`]
pub struct Segments<'t, 'b> {
    trie: Trie<'t>,
    bytes: &'b [u8],
    pos: usize,
}

impl<'t, 'b> Segments<'t, 'b> {
    pub fn new(trie: Trie<'t>, bytes: &'b [u8]) -> Self {
        Self { trie, bytes, pos: 0 }
    }
}

impl Iterator for Segments<'_, '_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let rest = self.bytes.get(self.pos..).filter(|r| !r.is_empty())?;
        let start = self.pos;
        let (value, size) = self.trie.lookup(rest);

        if size == 0 {
            // Short input for the lead byte. It is only truncated if the
            // rest could still be completed by more continuation bytes.
            if let Some(k) = rest.iter().skip(1).position(|&b| !is_continuation(b)) {
                self.pos += k + 1;
                return Some(Segment {
                    start,
                    len: k + 1,
                    value: 0,
                    kind: SegmentKind::Malformed,
                });
            }
            self.pos = self.bytes.len();
            return Some(Segment {
                start,
                len: rest.len(),
                value: 0,
                kind: SegmentKind::Truncated,
            });
        }

        self.pos += size;
        let kind = if std::str::from_utf8(&rest[..size]).is_err() {
            SegmentKind::Malformed
        } else if value != 0 {
            SegmentKind::Mapped
        } else {
            SegmentKind::Unmapped
        };
        Some(Segment {
            start,
            len: size,
            value,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::testdata::test_trie;

    fn kinds(bytes: &[u8]) -> Vec<(usize, usize, SegmentKind)> {
        test_trie()
            .segments(bytes)
            .map(|s| (s.start, s.len, s.kind))
            .collect()
    }

    #[test]
    fn test_segments_classify_mixed_input() {
        // U+000C mapped, 'a' unmapped, stray 0x80, U+0100 mapped
        let input = b"\x0ca\x80\xc4\x80";
        assert_eq!(
            kinds(input),
            vec![
                (0, 1, SegmentKind::Mapped),
                (1, 1, SegmentKind::Unmapped),
                (2, 1, SegmentKind::Malformed),
                (3, 2, SegmentKind::Mapped),
            ]
        );
    }

    #[test]
    fn test_segments_resync_after_bad_continuation() {
        // 3-byte lead, one continuation, then a fresh 2-byte sequence
        let input = b"\xe0\xa0\xc4\x80";
        assert_eq!(
            kinds(input),
            vec![(0, 2, SegmentKind::Malformed), (2, 2, SegmentKind::Mapped)]
        );
    }

    #[test]
    fn test_segments_truncated_tail_ends_iteration() {
        let input = b"a\xf0\x90\x80";
        assert_eq!(
            kinds(input),
            vec![(0, 1, SegmentKind::Unmapped), (1, 3, SegmentKind::Truncated)]
        );
    }

    #[test]
    fn test_segments_short_tail_with_non_continuation_is_malformed() {
        // U+000C is mapped in the fixture; the cut-short lead before it
        // cannot be completed, so it is malformed rather than truncated
        assert_eq!(
            kinds(b"\xe0\x0c"),
            vec![(0, 1, SegmentKind::Malformed), (1, 1, SegmentKind::Mapped)]
        );
        assert_eq!(
            kinds(b"a\xf0\x90a"),
            vec![
                (0, 1, SegmentKind::Unmapped),
                (1, 2, SegmentKind::Malformed),
                (3, 1, SegmentKind::Unmapped),
            ]
        );
        assert_eq!(kinds(b"\xc3"), vec![(0, 1, SegmentKind::Truncated)]);
    }

    #[test]
    fn test_segments_overlong_is_malformed() {
        assert_eq!(kinds(b"\xc0\x80"), vec![(0, 2, SegmentKind::Malformed)]);
        // encoded surrogate U+D800
        assert_eq!(kinds(b"\xed\xa0\x80"), vec![(0, 3, SegmentKind::Malformed)]);
    }

    #[test]
    fn test_segments_cover_input() {
        let input = "a\u{800}\u{10FFFF}".as_bytes();
        let segs: Vec<_> = test_trie().segments(input).collect();
        assert_eq!(segs.last().map(|s| s.end()), Some(input.len()));
        assert_eq!(segs.iter().map(|s| s.len).sum::<usize>(), input.len());
    }

    #[test]
    fn test_segments_empty_input() {
        assert!(kinds(b"").is_empty());
    }
}

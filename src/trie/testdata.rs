//! Hand-built fixture tables shared by the unit tests.
//!
//! `TEST_RUNES[i]` maps to value `i`: the smallest, largest and an arbitrary
//! codepoint for each encoding length, then five codepoints that live in one
//! sparse value block.

use super::Trie;

pub const TEST_RUNES: [char; 17] = [
    '\u{01}', '\u{0C}', '\u{7F}', // 1-byte sequences
    '\u{80}', '\u{100}', '\u{7FF}', // 2-byte sequences
    '\u{800}', '\u{999}', '\u{FFFF}', // 3-byte sequences
    '\u{10000}', '\u{10101}', '\u{10FFFF}', // 4-byte sequences
    '\u{200}', '\u{201}', '\u{202}', '\u{210}', '\u{215}', // one sparse block
];

const fn sparse<T: Copy, const N: usize>(zero: T, entries: &[(usize, T)]) -> [T; N] {
    let mut out = [zero; N];
    let mut i = 0;
    while i < entries.len() {
        out[entries[i].0] = entries[i].1;
        i += 1;
    }
    out
}

pub static TEST_VALUES: [u32; 832] = sparse(
    0,
    &[
        (0x000c, 0x01),
        (0x007f, 0x02),
        (0x00c0, 0x03),
        (0x0100, 0x04),
        (0x0140, 0x0c),
        (0x0141, 0x0d),
        (0x0142, 0x0e),
        (0x0150, 0x0f),
        (0x0155, 0x10),
        (0x01bf, 0x05),
        (0x01c0, 0x06),
        (0x0219, 0x07),
        (0x027f, 0x08),
        (0x0280, 0x09),
        (0x02c1, 0x0a),
        (0x033f, 0x0b),
    ],
);

pub static TEST_INDEX: [u16; 640] = sparse(
    0,
    &[
        (0x0c2, 0x03),
        (0x0c4, 0x04),
        (0x0c8, 0x05),
        (0x0df, 0x06),
        (0x0e0, 0x04),
        (0x0ef, 0x05),
        (0x0f0, 0x07),
        (0x0f4, 0x09),
        (0x120, 0x07),
        (0x126, 0x08),
        (0x17f, 0x09),
        (0x180, 0x0a),
        (0x184, 0x0b),
        (0x1d0, 0x06),
        (0x23f, 0x0c),
        (0x24f, 0x08),
    ],
);

pub fn test_trie() -> Trie<'static> {
    Trie::new(&TEST_INDEX, &TEST_VALUES).expect("fixture tables are valid")
}

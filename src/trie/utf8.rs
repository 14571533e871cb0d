//! UTF-8 byte classes used by the fused decode-and-lookup walk.
//!
//! A lead byte is compared against the class boundaries below; anything in
//! `TX..T2` is a continuation byte, anything at or above `T5` starts a legacy
//! 5- or 6-byte sequence (or is never legal at all) and is rejected.

/// First byte of a 1-byte sequence (ASCII)
pub const T1: u8 = 0x00;
/// First continuation byte, `10xx_xxxx`
pub const TX: u8 = 0x80;
/// First lead byte of a 2-byte sequence, `110x_xxxx`
pub const T2: u8 = 0xC0;
/// First lead byte of a 3-byte sequence, `1110_xxxx`
pub const T3: u8 = 0xE0;
/// First lead byte of a 4-byte sequence, `1111_0xxx`
pub const T4: u8 = 0xF0;
/// First lead byte of a legacy 5-byte sequence, `1111_10xx`
pub const T5: u8 = 0xF8;
/// First lead byte of a legacy 6-byte sequence, `1111_110x`
pub const T6: u8 = 0xFC;

/// Payload bits of a continuation byte
pub const MASKX: u8 = 0x3F;

/// Number of entries in one table block (one continuation byte's payload)
pub const BLOCK_SIZE: usize = 64;

/// Bits addressed within one block
pub const BLOCK_SHIFT: u32 = 6;

/// Longest sequence the trie accepts
pub const UTF_MAX: usize = 4;

/// Expected sequence length for a lead byte, or `None` when the byte can
/// never start a sequence (continuation bytes and legacy 5/6-byte leads).
#[inline]
pub fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..TX => Some(1),
        TX..T2 => None,
        T2..T3 => Some(2),
        T3..T4 => Some(3),
        T4..T5 => Some(4),
        _ => None,
    }
}

/// True for `10xx_xxxx`
#[inline]
pub fn is_continuation(b: u8) -> bool {
    (TX..T2).contains(&b)
}

/// Smallest scalar value that legitimately needs `len` bytes
pub fn min_scalar_for_len(len: usize) -> u32 {
    match len {
        1 => 0,
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    }
}

//! Compact sparse trie mapping a UTF-8 encoded codepoint to a `u32` value.
//!
//! The trie is two flat tables:
//!
//! - an **index** table of `u16` block numbers. Entries `0xC0..=0xFF` (index
//!   block 3) are the root, addressed by the lead byte itself; every further
//!   level is addressed by `(block << 6) + (byte & 0x3F)`.
//! - a **value** table of `u32` values. Entries `0x00..=0x7F` are the ASCII
//!   fast path; everything else is addressed by the block found in the index
//!   plus the payload bits of the final continuation byte.
//!
//! Decoding and lookup are fused: each continuation byte is validated and
//! then used directly as the next table offset. Failures never raise an
//! error, they return value `0` and the number of bytes the caller should
//! skip.
//!
//! ```
//! use colltrie::trie::TrieBuilder;
//!
//! let mut builder = TrieBuilder::new();
//! builder.insert('é', 7);
//! let tables = builder.build().unwrap();
//! let trie = tables.trie();
//!
//! assert_eq!(trie.lookup("é".as_bytes()), (7, 2));
//! assert_eq!(trie.lookup(&[0xC3]), (0, 0)); // truncated
//! assert_eq!(trie.lookup(&[0x80]), (0, 1)); // stray continuation byte
//! ```

pub mod builder;
pub mod codegen;
pub mod segments;
pub mod tables;
pub mod utf8;

#[cfg(test)]
pub(crate) mod testdata;

pub use builder::TrieBuilder;
pub use segments::{Segment, SegmentKind, Segments};
pub use tables::{TableStats, Tables};

use crate::error::{Result, TableError, TableKind};
use ahash::AHashSet;
use rayon::prelude::*;
use utf8::{BLOCK_SHIFT, BLOCK_SIZE, MASKX, T2, T5, UTF_MAX, is_continuation, sequence_len};

/// Index block holding the root entries (lead bytes `0xC0..=0xFF`)
pub const ROOT_BLOCK: u16 = 3;

/// Minimum index length: blocks 0..=3, so the root block exists
pub const MIN_INDEX_LEN: usize = (ROOT_BLOCK as usize + 1) * BLOCK_SIZE;

/// Minimum value length: the two ASCII blocks
pub const MIN_VALUES_LEN: usize = 2 * BLOCK_SIZE;

/// Borrowed view over a validated index/value table pair.
///
/// `Trie` is `Copy` and holds only shared references, so it can be handed to
/// any number of threads once the tables are built.
#[derive(Clone, Copy)]
pub struct Trie<'a> {
    index: &'a [u16],
    values: &'a [u32],
}

impl<'a> Trie<'a> {
    /// Wrap a table pair after checking that no legal walk can leave either
    /// table.
    pub fn new(index: &'a [u16], values: &'a [u32]) -> Result<Self> {
        validate(index, values)?;
        Ok(Self { index, values })
    }

    /// Wrap a table pair without validation.
    ///
    /// Meant for tables emitted by [`codegen`], which were validated when they
    /// were generated. Lookups on unvalidated tables may panic on an out of
    /// bounds block number, but never read out of bounds.
    pub const fn new_unchecked(index: &'a [u16], values: &'a [u32]) -> Self {
        Self { index, values }
    }

    /// Look up the first encoded codepoint in `s`.
    ///
    /// Returns `(value, consumed)`:
    /// - a legal encoding of length L returns its value and L;
    /// - empty input, or fewer than L bytes for the lead byte found, returns
    ///   `(0, 0)`;
    /// - a stray continuation byte or a legacy 5/6-byte lead returns `(0, 1)`;
    /// - an invalid byte at continuation position k returns `(0, k)`, the
    ///   offending byte is not counted.
    #[inline]
    pub fn lookup(&self, s: &[u8]) -> (u32, usize) {
        let Some(&c0) = s.first() else {
            return (0, 0);
        };
        let Some(len) = sequence_len(c0) else {
            return (0, 1);
        };
        if len == 1 {
            return (self.values[c0 as usize], 1);
        }
        if s.len() < len {
            return (0, 0);
        }

        let mut block = self.index[c0 as usize];
        for (k, &c) in s.iter().enumerate().take(len - 1).skip(1) {
            if !is_continuation(c) {
                return (0, k);
            }
            block = self.next_block(block, c);
        }

        let last = s[len - 1];
        if !is_continuation(last) {
            return (0, len - 1);
        }
        (self.value(block, last), len)
    }

    /// Look up a string's first codepoint. Same as `lookup(s.as_bytes())`.
    #[inline]
    pub fn lookup_str(&self, s: &str) -> (u32, usize) {
        self.lookup(s.as_bytes())
    }

    /// Value for a single scalar value
    #[inline]
    pub fn lookup_char(&self, c: char) -> u32 {
        let mut buf = [0u8; UTF_MAX];
        self.lookup(c.encode_utf8(&mut buf).as_bytes()).0
    }

    /// Iterate over `bytes`, classifying each lookup step
    pub fn segments<'b>(&self, bytes: &'b [u8]) -> Segments<'a, 'b> {
        Segments::new(*self, bytes)
    }

    /// Number of scalar values with a non-zero mapping
    pub fn mapped_count(&self) -> usize {
        (0..=char::MAX as u32)
            .into_par_iter()
            .filter_map(char::from_u32)
            .filter(|&c| self.lookup_char(c) != 0)
            .count()
    }

    /// Raw index table
    pub fn index(&self) -> &'a [u16] {
        self.index
    }

    /// Raw value table
    pub fn values(&self) -> &'a [u32] {
        self.values
    }

    #[inline]
    fn next_block(&self, block: u16, b: u8) -> u16 {
        self.index[((block as usize) << BLOCK_SHIFT) + (b & MASKX) as usize]
    }

    #[inline]
    fn value(&self, block: u16, b: u8) -> u32 {
        self.values[((block as usize) << BLOCK_SHIFT) + (b & MASKX) as usize]
    }
}

impl std::fmt::Debug for Trie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("index_blocks", &(self.index.len() / BLOCK_SIZE))
            .field("value_blocks", &(self.values.len() / BLOCK_SIZE))
            .finish()
    }
}

/// Check the structural invariants of a table pair.
///
/// Walks every block reachable through a lead byte `0xC0..0xF8`, tracking how
/// many index hops remain before a block number names a value block.
pub fn validate(index: &[u16], values: &[u32]) -> Result<()> {
    check_len(TableKind::Index, index.len(), MIN_INDEX_LEN)?;
    check_len(TableKind::Values, values.len(), MIN_VALUES_LEN)?;

    let index_blocks = index.len() / BLOCK_SIZE;
    let value_blocks = values.len() / BLOCK_SIZE;

    let mut walk = Walk {
        index_blocks,
        value_blocks,
        seen: AHashSet::new(),
        pending: Vec::new(),
    };

    for lead in T2..T5 {
        // sequence_len is 2..=4 over this range
        let hops = sequence_len(lead).unwrap_or(2) - 2;
        walk.check(lead as usize, index[lead as usize], hops)?;
    }

    while let Some((block, hops)) = walk.pending.pop() {
        let base = (block as usize) << BLOCK_SHIFT;
        for entry in base..base + BLOCK_SIZE {
            walk.check(entry, index[entry], hops)?;
        }
    }

    Ok(())
}

/// Worklist for [`validate`]: blocks still to visit, keyed by remaining hops
struct Walk {
    index_blocks: usize,
    value_blocks: usize,
    seen: AHashSet<(u16, usize)>,
    pending: Vec<(u16, usize)>,
}

impl Walk {
    fn check(&mut self, entry: usize, block: u16, hops: usize) -> Result<()> {
        if hops == 0 {
            if block as usize >= self.value_blocks {
                return Err(TableError::BlockOutOfRange {
                    table: TableKind::Values,
                    entry,
                    block,
                });
            }
            return Ok(());
        }
        if block as usize >= self.index_blocks {
            return Err(TableError::BlockOutOfRange {
                table: TableKind::Index,
                entry,
                block,
            });
        }
        if self.seen.insert((block, hops - 1)) {
            self.pending.push((block, hops - 1));
        }
        Ok(())
    }
}

fn check_len(table: TableKind, len: usize, min: usize) -> Result<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(TableError::PartialBlock { table, len });
    }
    if len < min {
        return Err(TableError::TooShort { table, len, min });
    }
    Ok(())
}

//! Offline construction of the index/value table pair.
//!
//! Layout produced by [`TrieBuilder::build`]:
//!
//! | table  | block | contents                                        |
//! |--------|-------|-------------------------------------------------|
//! | values | 0, 1  | ASCII fast path, `values[b]` for `b < 0x80`      |
//! | values | 2     | null block, all zero                            |
//! | index  | 0, 1  | unused (never addressed)                        |
//! | index  | 2     | null lookup block, every entry is 2             |
//! | index  | 3     | root, addressed by lead bytes `0xC0..=0xFF`     |
//!
//! Because the null lookup block and the null value block share the number 2,
//! an unmapped path resolves to value 0 no matter how many levels remain.
//! Every other block is hash-consed, so identical blocks are stored once.

use super::Tables;
use super::utf8::{BLOCK_SIZE, min_scalar_for_len};
use crate::error::{Result, TableError, TableKind};
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::debug;

/// Block number shared by the null lookup block and the null value block
pub const NULL_BLOCK: u16 = 2;

const ASCII_END: u32 = 0x80;

type ValueBlock = [u32; BLOCK_SIZE];
type LookupBlock = [u16; BLOCK_SIZE];

/// Accumulates a codepoint → value mapping and compiles it into tables.
#[derive(Debug, Clone, Default)]
pub struct TrieBuilder {
    entries: BTreeMap<u32, u32>,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `c` to `value`. A value of 0 removes any existing mapping.
    pub fn insert(&mut self, c: char, value: u32) -> &mut Self {
        if value == 0 {
            self.entries.remove(&(c as u32));
        } else {
            self.entries.insert(c as u32, value);
        }
        self
    }

    /// Map every scalar value in `range` to `value` (surrogates are skipped)
    pub fn insert_range(&mut self, range: RangeInclusive<char>, value: u32) -> &mut Self {
        for c in range {
            self.insert(c, value);
        }
        self
    }

    pub fn get(&self, c: char) -> Option<u32> {
        self.entries.get(&(c as u32)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile the mapping into a validated table pair
    pub fn build(&self) -> Result<Tables> {
        let mut state = BuildState::new();

        // ASCII blocks are addressed directly and never shared
        for (&cp, &value) in self.entries.range(..ASCII_END) {
            state.values[(cp >> 6) as usize][(cp & 0x3F) as usize] = value;
        }

        let mut root: LookupBlock = [NULL_BLOCK; BLOCK_SIZE];
        for lead in 0xC0u32..=0xFF {
            let slot = (lead & 0x3F) as usize;
            root[slot] = match lead {
                0xC0..=0xDF => state.value_block(&self.entries, (lead & 0x1F) << 6, 2)?,
                0xE0..=0xEF => state.lookup_block(&self.entries, (lead & 0x0F) << 12, 1 << 12, 3)?,
                0xF0..=0xF7 => state.lookup_block(&self.entries, (lead & 0x07) << 18, 1 << 18, 4)?,
                _ => NULL_BLOCK,
            };
        }
        state.index[ROOT_SLOT] = root;

        debug!(
            entries = self.entries.len(),
            index_blocks = state.index.len(),
            value_blocks = state.values.len(),
            "built trie tables"
        );

        let index = state.index.concat();
        let values = state.values.concat();
        Tables::new(index, values)
    }
}

const ROOT_SLOT: usize = super::ROOT_BLOCK as usize;

struct BuildState {
    index: Vec<LookupBlock>,
    values: Vec<ValueBlock>,
    index_ids: AHashMap<LookupBlock, u16>,
    value_ids: AHashMap<ValueBlock, u16>,
}

impl BuildState {
    fn new() -> Self {
        let null_lookup: LookupBlock = [NULL_BLOCK; BLOCK_SIZE];
        let null_values: ValueBlock = [0; BLOCK_SIZE];

        let mut state = Self {
            index: vec![[0; BLOCK_SIZE], [0; BLOCK_SIZE], null_lookup, null_lookup],
            values: vec![[0; BLOCK_SIZE], [0; BLOCK_SIZE], null_values],
            index_ids: AHashMap::new(),
            value_ids: AHashMap::new(),
        };
        state.index_ids.insert(null_lookup, NULL_BLOCK);
        state.value_ids.insert(null_values, NULL_BLOCK);
        state
    }

    /// Value block for the 64 codepoints starting at `base`, for sequences
    /// of `len` bytes
    fn value_block(&mut self, entries: &BTreeMap<u32, u32>, base: u32, len: usize) -> Result<u16> {
        if !overlaps_encoding_range(base, BLOCK_SIZE as u32, len) {
            return Ok(NULL_BLOCK);
        }
        let mut block: ValueBlock = [0; BLOCK_SIZE];
        for (&cp, &value) in entries.range(base..base + BLOCK_SIZE as u32) {
            block[(cp - base) as usize] = value;
        }
        intern(&mut self.values, &mut self.value_ids, block, TableKind::Values)
    }

    /// Lookup block for `[base, base + span)`, encodings of `len` bytes. Each
    /// entry covers `span / 64` codepoints: a value block once that reaches
    /// 64, a nested lookup block above it.
    fn lookup_block(
        &mut self,
        entries: &BTreeMap<u32, u32>,
        base: u32,
        span: u32,
        len: usize,
    ) -> Result<u16> {
        if !overlaps_encoding_range(base, span, len) || entries.range(base..base + span).next().is_none() {
            return Ok(NULL_BLOCK);
        }

        let child_span = span >> 6;
        let mut block: LookupBlock = [NULL_BLOCK; BLOCK_SIZE];
        for (k, slot) in block.iter_mut().enumerate() {
            let child_base = base + k as u32 * child_span;
            *slot = if child_span == BLOCK_SIZE as u32 {
                self.value_block(entries, child_base, len)?
            } else {
                self.lookup_block(entries, child_base, child_span, len)?
            };
        }
        intern(&mut self.index, &mut self.index_ids, block, TableKind::Index)
    }
}

/// True when `[base, base + span)` holds at least one codepoint that is
/// legally encoded with `len` bytes. The range boundaries are multiples of
/// 64, so a value block is always entirely inside or entirely outside.
fn overlaps_encoding_range(base: u32, span: u32, len: usize) -> bool {
    base + span > min_scalar_for_len(len) && base <= char::MAX as u32
}

fn intern<B: Copy + Eq + std::hash::Hash>(
    blocks: &mut Vec<B>,
    ids: &mut AHashMap<B, u16>,
    block: B,
    table: TableKind,
) -> Result<u16> {
    if let Some(&id) = ids.get(&block) {
        return Ok(id);
    }
    let id = u16::try_from(blocks.len()).map_err(|_| TableError::TooManyBlocks {
        table,
        blocks: blocks.len() + 1,
    })?;
    blocks.push(block);
    ids.insert(block, id);
    Ok(id)
}

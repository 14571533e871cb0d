//! Owned table storage and the binary table file format.
//!
//! File layout (all integers little-endian):
//!
//! ```text
//! 0   magic        b"CTRI"
//! 4   version      u16 (1)
//! 6   reserved     u16 (0)
//! 8   index_len    u32, number of u16 index entries
//! 12  values_len   u32, number of u32 values
//! 16  index        index_len * u16
//! ..  values       values_len * u32
//! ```

use super::Trie;
use super::utf8::BLOCK_SIZE;
use crate::error::{Result, TableError};
use crate::utils::{
    read_u16_le, read_u32_le, u16s_from_le_bytes, u32s_from_le_bytes, write_u16_le,
    write_u16_slice_le, write_u32_le, write_u32_slice_le,
};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

pub const MAGIC: [u8; 4] = *b"CTRI";
pub const FORMAT_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 16;

/// Validated, owned index and value tables
#[derive(Clone, PartialEq, Eq)]
pub struct Tables {
    index: Vec<u16>,
    values: Vec<u32>,
}

/// Summary of a table pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStats {
    pub index_entries: usize,
    pub value_entries: usize,
    pub index_blocks: usize,
    pub value_blocks: usize,
    /// Size of the table file, header included
    pub file_bytes: usize,
    /// Distinct non-zero values stored
    pub distinct_values: usize,
    /// Scalar values that resolve to a non-zero value
    pub mapped_codepoints: usize,
}

impl Tables {
    pub fn new(index: Vec<u16>, values: Vec<u32>) -> Result<Self> {
        super::validate(&index, &values)?;
        Ok(Self { index, values })
    }

    pub fn trie(&self) -> Trie<'_> {
        Trie::new_unchecked(&self.index, &self.values)
    }

    pub fn index(&self) -> &[u16] {
        &self.index
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Size in bytes of the serialized form
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.index.len() * 2 + self.values.len() * 4
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        write_u16_le(writer, FORMAT_VERSION)?;
        write_u16_le(writer, 0)?;
        write_u32_le(writer, self.index.len() as u32)?;
        write_u32_le(writer, self.values.len() as u32)?;
        write_u16_slice_le(writer, &self.index)?;
        write_u32_slice_le(writer, &self.values)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Parse and validate a serialized table pair
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(TableError::LengthMismatch {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        if magic != MAGIC {
            return Err(TableError::BadMagic(magic));
        }

        let mut header = &bytes[4..HEADER_LEN];
        let version = read_u16_le(&mut header)?;
        if version != FORMAT_VERSION {
            return Err(TableError::UnsupportedVersion(version));
        }
        let _reserved = read_u16_le(&mut header)?;
        let index_len = read_u32_le(&mut header)? as usize;
        let values_len = read_u32_le(&mut header)? as usize;

        let payload = &bytes[HEADER_LEN..];
        let index_bytes = index_len * 2;
        let expected = index_bytes + values_len * 4;
        if payload.len() != expected {
            return Err(TableError::LengthMismatch {
                expected: HEADER_LEN + expected,
                actual: bytes.len(),
            });
        }

        let index = u16s_from_le_bytes(&payload[..index_bytes]);
        let values = u32s_from_le_bytes(&payload[index_bytes..]);
        Self::new(index, values)
    }

    /// Load a table file. The file is memory-mapped and decoded once.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is only read while decoding into owned vectors
        let mmap = unsafe { Mmap::map(&file)? };
        let tables = Self::from_bytes(&mmap)?;
        debug!(
            path = %path.display(),
            index = tables.index.len(),
            values = tables.values.len(),
            "loaded trie tables"
        );
        Ok(tables)
    }

    /// Write the table file to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), bytes = self.encoded_len(), "wrote trie tables");
        Ok(())
    }

    pub fn stats(&self) -> TableStats {
        let mut distinct: Vec<u32> = self.values.iter().copied().filter(|&v| v != 0).collect();
        distinct.sort_unstable();
        distinct.dedup();

        TableStats {
            index_entries: self.index.len(),
            value_entries: self.values.len(),
            index_blocks: self.index.len() / BLOCK_SIZE,
            value_blocks: self.values.len() / BLOCK_SIZE,
            file_bytes: self.encoded_len(),
            distinct_values: distinct.len(),
            mapped_codepoints: self.trie().mapped_count(),
        }
    }
}

impl std::fmt::Debug for Tables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.trie(), f)
    }
}

//! Error types for table construction, parsing and loading.
//!
//! Lookup itself never fails; these errors only come out of the paths that
//! produce or load the two tables.

use thiserror::Error;

/// Result type alias using [`TableError`]
pub type Result<T> = std::result::Result<T, TableError>;

/// Which of the two tables an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Index,
    Values,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Index => f.write_str("index"),
            TableKind::Values => f.write_str("value"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TableError {
    /// I/O error while reading or writing a table file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table file does not start with the expected magic bytes
    #[error("Not a trie table file (bad magic {0:02x?})")]
    BadMagic([u8; 4]),

    /// Table file written by an unknown format version
    #[error("Unsupported table format version {0}")]
    UnsupportedVersion(u16),

    /// Header lengths disagree with the payload size
    #[error("Table payload is {actual} bytes, header declares {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A table length is not a whole number of 64-entry blocks
    #[error("The {table} table has {len} entries, not a multiple of the block size")]
    PartialBlock { table: TableKind, len: usize },

    /// A table is too short to hold its fixed blocks
    #[error("The {table} table has {len} entries, at least {min} are required")]
    TooShort {
        table: TableKind,
        len: usize,
        min: usize,
    },

    /// A reachable index entry names a block that does not exist
    #[error("Index entry {entry:#x} points at {table} block {block}, which does not exist")]
    BlockOutOfRange {
        table: TableKind,
        entry: usize,
        block: u16,
    },

    /// The mapping needs more blocks than a u16 block number can address
    #[error("The {table} table needs {blocks} blocks, more than a u16 can address")]
    TooManyBlocks { table: TableKind, blocks: usize },

    /// Malformed line in a textual mapping
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl TableError {
    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        TableError::Parse {
            line,
            message: message.into(),
        }
    }
}

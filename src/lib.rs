//! # colltrie - compact sparse trie for collation lookup
//!
//! Maps the first UTF-8 encoded codepoint of a byte slice to a `u32`
//! collation value with a fused decode-and-lookup over two flat tables.
//! Malformed or truncated input never raises an error: it yields value `0`
//! and the number of bytes to skip.
//!
//! ## Architecture
//!
//! - [`trie`] - the lookup itself, plus the table builder, file format and
//!   Rust source emitter
//! - [`mapping`] - textual codepoint → value mapping (builder input)
//! - [`scan`] - parallel classification of a text buffer
//! - [`output`] - lookup report formatting for the CLI
//! - [`error`] - errors from table construction and loading
//! - [`utils`] - config, little-endian codecs, progress bars
//!
//! ## Quick Start
//!
//! ```
//! use colltrie::trie::{Tables, TrieBuilder};
//!
//! let mut builder = TrieBuilder::new();
//! builder.insert('a', 1).insert('€', 0x2A);
//! let tables: Tables = builder.build().unwrap();
//!
//! let trie = tables.trie();
//! assert_eq!(trie.lookup("€100".as_bytes()), (0x2A, 3));
//! assert_eq!(trie.lookup(b"\xe2\x82"), (0, 0));
//! ```

pub mod error;
pub mod mapping;
pub mod output;
pub mod scan;
pub mod trie;
pub mod utils;

pub use error::{TableError, TableKind};
pub use trie::{Tables, Trie, TrieBuilder};

//! Library-level tests over the public API.

use colltrie::mapping::builder_from_mapping;
use colltrie::scan::{ScanOptions, scan, scan_sequential};
use colltrie::trie::{SegmentKind, codegen};
use colltrie::{TableError, Tables, Trie, TrieBuilder};
use std::sync::Arc;

fn script_tables() -> (TrieBuilder, Tables) {
    let builder = builder_from_mapping(
        "0000..007F 1\n\
         00C0..024F 0x100\n\
         0391..03C9 0x200\n\
         4E00..4E3F 0x300\n\
         10000..1007F 0x400\n\
         10FFFF 0xFFFFFFFF\n",
    )
    .unwrap();
    let tables = builder.build().unwrap();
    (builder, tables)
}

#[test]
fn test_every_scalar_matches_builder() {
    let (builder, tables) = script_tables();
    let trie = tables.trie();
    let mut buf = [0u8; 4];
    for c in (0..=char::MAX as u32).filter_map(char::from_u32) {
        let want = builder.get(c).unwrap_or(0);
        let bytes = c.encode_utf8(&mut buf).as_bytes();
        assert_eq!(trie.lookup(bytes), (want, bytes.len()), "U+{:04X}", c as u32);
    }
}

#[test]
fn test_file_round_trip_preserves_lookups() {
    let (_, tables) = script_tables();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scripts.ctri");
    tables.save(&path).unwrap();

    let loaded = Tables::open(&path).unwrap();
    assert_eq!(loaded, tables);
    assert_eq!(loaded.trie().lookup_str("Ω"), (0x200, 2));
    assert_eq!(loaded.trie().lookup_str("\u{10FFFF}"), (0xFFFF_FFFF, 4));
}

#[test]
fn test_static_tables_from_codegen_layout() {
    // The generated statics are plain arrays; a borrowed view over the same
    // data behaves identically.
    let (_, tables) = script_tables();
    let source = codegen::to_rust_source(&tables.trie(), "scripts", 16);
    assert!(source.contains(&format!("SCRIPTS_INDEX: [u16; {}]", tables.index().len())));

    let index: Vec<u16> = tables.index().to_vec();
    let values: Vec<u32> = tables.values().to_vec();
    let trie = Trie::new_unchecked(&index, &values);
    assert_eq!(trie.lookup_str("一"), (0x300, 3));
}

#[test]
fn test_rejects_inconsistent_tables() {
    let (_, tables) = script_tables();
    let mut index = tables.index().to_vec();
    index[0xC3] = u16::MAX;
    let err = Tables::new(index, tables.values().to_vec()).unwrap_err();
    assert!(matches!(err, TableError::BlockOutOfRange { .. }), "{err}");
}

#[test]
fn test_invalid_input_never_overconsumes() {
    let (_, tables) = script_tables();
    let trie = tables.trie();
    let cases: &[(&[u8], (u32, usize))] = &[
        (b"", (0, 0)),
        (b"\x80", (0, 1)),
        (b"\xff", (0, 1)),
        (b"\xc3", (0, 0)),
        (b"\xc3\x28", (0, 1)),
        (b"\xe4\xb8", (0, 0)),
        (b"\xe4\xb8\x28", (0, 2)),
        (b"\xf0\x90\x80\x28", (0, 3)),
    ];
    for &(input, want) in cases {
        assert_eq!(trie.lookup(input), want, "{:02x?}", input);
    }
}

#[test]
fn test_shared_across_threads() {
    let (builder, tables) = script_tables();
    let tables = Arc::new(tables);
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let tables = Arc::clone(&tables);
            std::thread::spawn(move || {
                let trie = tables.trie();
                (0..0x3000u32)
                    .filter_map(|cp| char::from_u32(cp * 4 + t))
                    .map(|c| (c, trie.lookup_char(c)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for handle in handles {
        for (c, value) in handle.join().unwrap() {
            assert_eq!(value, builder.get(c).unwrap_or(0));
        }
    }
}

#[test]
fn test_parallel_scan_matches_sequential_on_mixed_text() {
    let (_, tables) = script_tables();
    let trie = tables.trie();
    let mut text = Vec::new();
    for i in 0..500 {
        text.extend_from_slice("Ωμέγα 一丁 À la carte 𐀀\n".as_bytes());
        if i % 7 == 0 {
            text.extend_from_slice(b"\xc0\xaf\xed\xa0\x80\n");
        }
    }
    text.extend_from_slice(b"\xf0\x90");

    let sequential = scan_sequential(trie, &text);
    assert_eq!(sequential.truncated.segments, 1);
    assert_eq!(sequential.total_bytes, text.len());

    for chunk_bytes in [1, 64, 4096] {
        let options = ScanOptions {
            chunk_bytes,
            threads: 3,
            progress: false,
        };
        assert_eq!(scan(trie, &text, &options).unwrap(), sequential);
    }

    let kinds: Vec<_> = trie.segments(&text[..12]).map(|s| s.kind).collect();
    assert_eq!(kinds.first(), Some(&SegmentKind::Mapped));
}

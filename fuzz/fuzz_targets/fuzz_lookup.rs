#![no_main]

use arbitrary::Arbitrary;
use colltrie::TrieBuilder;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    mapping: Vec<(char, u32)>,
    text: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mut builder = TrieBuilder::new();
    for &(c, value) in &input.mapping {
        builder.insert(c, value);
    }
    let tables = builder.build().expect("builder output always validates");
    let trie = tables.trie();

    // Every mapped scalar resolves to its value with its full width
    for &(c, _) in &input.mapping {
        let want = builder.get(c).unwrap_or(0);
        assert_eq!(trie.lookup_char(c), want);
        let mut buf = [0u8; 4];
        assert_eq!(trie.lookup(c.encode_utf8(&mut buf).as_bytes()), (want, c.len_utf8()));
    }

    // Arbitrary bytes never over-consume; a well-formed prefix reports its
    // mapped value
    let (value, size) = trie.lookup(&input.text);
    assert!(size <= input.text.len());
    if size == 0 {
        assert_eq!(value, 0);
    }
    if let Some(c) = std::str::from_utf8(&input.text[..size]).ok().and_then(|s| s.chars().next()) {
        assert_eq!(value, builder.get(c).unwrap_or(0));
    }

    let covered: usize = trie.segments(&input.text).map(|s| s.len).sum();
    assert!(covered <= input.text.len());
});

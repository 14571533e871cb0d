#![no_main]

use colltrie::Tables;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any table file that loads must be safe to query with any input
    let Ok(tables) = Tables::from_bytes(data) else {
        return;
    };
    let trie = tables.trie();
    for start in 0..data.len().min(64) {
        let (_, size) = trie.lookup(&data[start..]);
        assert!(size <= data.len() - start);
    }
});

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use rsradix::Trie;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut trie) = Trie::<u64>::arbitrary(&mut unstructured) else {
        return;
    };
    let Ok(key) = Vec::<u8>::arbitrary(&mut unstructured) else {
        return;
    };
    trie.insert(&key, 7);

    assert_eq!(trie.get(&key), Some(&7));
    assert!(trie.validate().is_ok());
});

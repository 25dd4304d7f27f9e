#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use rsradix::Trie;
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Insert(Vec<u8>, u8),
    Get(Vec<u8>),
    Bump(Vec<u8>),
    Clear,
}

fuzz_target!(|data: Vec<Ops>| {
    let mut trie = Trie::<u8>::new();

    let mut twin = BTreeMap::<Vec<u8>, u8>::new();

    for datum in data {
        match datum {
            Ops::Insert(key, ops) => {
                assert_eq!(trie.insert(&key, ops), twin.insert(key, ops));
            }
            Ops::Get(key) => {
                assert_eq!(trie.get(&key), twin.get(&key));
            }
            Ops::Bump(key) => {
                if let Some(value) = trie.get_mut(&key) {
                    *value = value.wrapping_add(1);
                }
                if let Some(value) = twin.get_mut(&key) {
                    *value = value.wrapping_add(1);
                }
            }
            Ops::Clear => {
                trie.clear();
                twin.clear();
            }
        }

        assert_eq!(trie.len(), twin.len());
    }

    assert!(trie.validate().is_ok());
    assert!(trie.iter().map(|(k, v)| (k, *v)).eq(twin.into_iter()));
});

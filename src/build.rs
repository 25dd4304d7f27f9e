use std::{collections::HashMap, hash::BuildHasher};

use crate::Trie;

impl<V> Trie<V> {
    /// Builds a [Trie] from explicit key/value pairs. Keys may be any
    /// bytes at all, they do not have to be valid text.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from_pairs([
    ///     (vec![0xF0u8, 0x9F, 0x91], "short"),
    ///     (vec![0xF0u8, 0x9F, 0x91, 0x10], "modified"),
    /// ]);
    ///
    /// assert_eq!(tree.get([0xF0u8, 0x9F, 0x91]), Some(&"short"));
    /// ```
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
    {
        pairs.into_iter().collect()
    }
}

impl Trie<()> {
    /// Builds a [Trie] that only records which prefixes exist, with
    /// no data attached to them.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let routes = Trie::from_prefixes(["/api/", "/api/v2/", "/static/"]);
    ///
    /// assert!(routes.contains_key("/api/v2/"));
    /// assert!(!routes.contains_key("/api"));
    /// ```
    pub fn from_prefixes<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        keys.into_iter().map(|key| (key, ())).collect()
    }
}

impl<K, V> Extend<(K, V)> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Extends a [Trie] from an iterator of tuples. Later pairs overwrite
    /// earlier ones with the same key.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree: Trie<&str> = Trie::new();
    /// assert_eq!(tree.len(), 0);
    ///
    /// tree.extend([ ("hello", "world") ].into_iter());
    ///
    /// assert_eq!(*tree.get("hello").unwrap(), "world");
    ///
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Creates a [Trie] from an iterator of tuples.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree: Trie<usize> = Trie::from_iter([
    ///     ("hello", 4)
    /// ].into_iter());
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(*tree.get("hello").unwrap(), 4);
    /// ```
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Trie::new();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Creates a [Trie] from an array of tuples.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let trie: Trie<i32> = Trie::from([
    ///     ("hello", 4)
    /// ]);
    ///
    /// assert_eq!(trie.len(), 1);
    /// assert_eq!(*trie.get("hello").unwrap(), 4);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for Trie<V>
where
    K: AsRef<[u8]>,
    S: BuildHasher,
{
    /// Creates a [Trie] from a map. The map's iteration order does not
    /// matter, the resulting tree is the same for any order.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use rsradix::Trie;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("float", 31.7);
    /// map.insert("float.round", 32.0);
    ///
    /// let trie = Trie::from(map);
    /// assert_eq!(trie.get("float.round"), Some(&32.0));
    /// ```
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from_iter(map)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, V> arbitrary::Arbitrary<'a> for Trie<V>
where
    V: arbitrary::Arbitrary<'a>,
{
    /// Generates a [Trie] by inserting arbitrary pairs, so the result is
    /// always structurally valid.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let pairs: Vec<(Vec<u8>, V)> = u.arbitrary()?;
        Ok(Self::from_pairs(pairs))
    }
}

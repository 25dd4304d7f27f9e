//! A byte-keyed radix trie.
//!
//! Keys are arbitrary byte sequences and runs of bytes shared by no other
//! key are stored on a single edge. A [Trie] performs no internal locking,
//! so readers may share it freely but any writer needs exclusive access,
//! which callers provide with `&mut` or with their own lock.

use std::ops::{Index, IndexMut};

use list::{Node, NodeIndex, Slots};
use tracing::{debug, trace};

mod build;
mod error;
mod export;
mod iter;
mod list;
mod node;

pub use crate::error::StructureError;
pub use crate::export::{ExportSettings, export};
pub use crate::iter::{Iter, Keys, Values};
pub use crate::node::NodeRef;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A compressed trie mapping byte strings to values of type `V`.
pub struct Trie<V> {
    /// The node pool, this is where the internal nodes are actually store. This
    /// improves cache locality and ease of access while limiting weird lifetime errors.
    /// The root always sits at [NodeIndex::ROOT].
    node: Slots<V>,
    /// The amount of items in the Trie.
    size: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the longest run both slices start with.
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<V> Trie<V> {
    /// Creates a new [Trie] with no keys and records. This will
    /// create a [Trie] with room for the root only, using the [Trie::with_capacity] method.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::<&str>::new();
    /// assert_eq!(tree.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Creates a new [Trie] with room for a number of nodes.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::<usize>::with_capacity(20);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            node: Slots::with_capacity(nodes),
            size: 0,
        }
    }

    /// Walks the compressed edges for an exact key and returns the node
    /// it ends on. This method forms the basis for [Trie::get] and [Trie::get_mut].
    ///
    /// The node found may not hold a value, a key that stops at a fork is
    /// not a stored key.
    fn lookup_key(&self, key: &[u8]) -> Option<NodeIndex> {
        let mut remainder = key;
        let mut current = NodeIndex::ROOT;

        while let Some(&first) = remainder.first() {
            let child = self.node.subkey(current, self.node.child(current, first).ok()?);
            // Diverging strictly inside the edge is a miss.
            remainder = remainder.strip_prefix(self.node[child].label())?;
            current = child;
        }
        Some(current)
    }

    /// Gets a value from the [Trie] according to
    /// the key. Only exact matches are returned.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<&str>::new();
    /// tree.insert("hello", "world");
    /// assert_eq!(*tree.get("hello").unwrap(), "world");
    /// assert!(tree.get("hell").is_none());
    /// ```
    pub fn get<K>(&self, key: K) -> Option<&V>
    where
        K: AsRef<[u8]>,
    {
        self.node[self.lookup_key(key.as_ref())?].value().as_ref()
    }

    /// Gets a mutable reference of a value from the [Trie] according to
    /// the key.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<&str>::new();
    /// tree.insert("hello", "world");
    ///
    /// *tree.get_mut("hello").unwrap() = "world2";
    /// assert_eq!(*tree.get("hello").unwrap(), "world2");
    /// ```
    pub fn get_mut<K>(&mut self, key: K) -> Option<&mut V>
    where
        K: AsRef<[u8]>,
    {
        let index = self.lookup_key(key.as_ref())?;
        self.node[index].value_mut().as_mut()
    }

    /// Checks if the [Trie] contains a key. This operation
    /// occurs in the same time as [Trie::get].
    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        self.get(key).is_some()
    }

    /// Puts a new record in the [Trie], returning the old value
    /// if there previously was a value present.
    ///
    /// When the key runs out partway along an existing edge, or leaves it
    /// partway, the edge is split and a new fork node holds the shared
    /// part. At most one fork and one leaf are created per call.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// tree.insert("hello", 1);
    ///
    /// // Verify the key is in the tree.
    /// assert_eq!(*tree.get("hello").unwrap(), 1);
    ///
    /// // Verify the key replacement.
    /// assert_eq!(tree.insert("hello", 2).unwrap(), 1);
    /// ```
    pub fn insert<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: AsRef<[u8]>,
    {
        let mut remainder = key.as_ref();
        let mut current = NodeIndex::ROOT;

        loop {
            let Some(&first) = remainder.first() else {
                let previous = self.node[current].value_mut().replace(value);
                if previous.is_none() {
                    self.size += 1;
                }
                return previous;
            };

            let Ok(position) = self.node.child(current, first) else {
                trace!(len = remainder.len(), "attaching leaf");
                let leaf = self.node.insert(Node::leaf(remainder.to_vec(), value));
                self.node.attach(current, leaf);
                self.size += 1;
                return None;
            };

            let child = self.node.subkey(current, position);
            let label_len = self.node[child].label().len();
            let common = common_prefix(remainder, self.node[child].label());

            if common == label_len {
                current = child;
                remainder = &remainder[common..];
                continue;
            }

            trace!(common, label_len, "splitting edge");

            // The child keeps its own slot and only loses the shared head.
            let head = self.node[child]
                .label_mut()
                .drain(..common)
                .collect::<Vec<u8>>();
            let fork = self.node.insert(Node::branch(head));
            self.node.attach(fork, child);
            self.node.replace_subkey(current, position, fork);

            if common == remainder.len() {
                *self.node[fork].value_mut() = Some(value);
            } else {
                let leaf = self
                    .node
                    .insert(Node::leaf(remainder[common..].to_vec(), value));
                self.node.attach(fork, leaf);
            }

            self.size += 1;
            return None;
        }
    }

    /// Visits every record in ascending lexicographic order of its key.
    /// One key buffer is reused for the whole walk, so the visitor only
    /// borrows each key.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from([("b", 1), ("a", 2), ("c", 3)]);
    ///
    /// let mut seen = vec![];
    /// tree.walk(|key, value| seen.push((key.to_vec(), *value)));
    ///
    /// assert_eq!(seen, vec![
    ///     (b"a".to_vec(), 2),
    ///     (b"b".to_vec(), 1),
    ///     (b"c".to_vec(), 3),
    /// ]);
    /// ```
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&[u8], &V),
    {
        let mut key = Vec::new();
        // Frames carry the key length of the parent, as in [Iter].
        let mut stack = vec![(NodeIndex::ROOT, 0)];

        while let Some((index, base)) = stack.pop() {
            let node = &self.node[index];
            key.truncate(base);
            key.extend_from_slice(node.label());

            if let Some(value) = node.value() {
                visitor(&key, value);
            }

            let depth = key.len();
            stack.extend(node.subkeys().rev().map(|child| (*child, depth)));
        }
    }

    /// Returns an iterator over the entries of the [Trie]
    /// in the same order as [Trie::walk].
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from([("hello", 4), ("bye", 3)]);
    ///
    /// let mut entries = tree.iter();
    ///
    /// assert_eq!(entries.next().unwrap(), (b"bye".to_vec(), &3));
    /// assert_eq!(entries.next().unwrap(), (b"hello".to_vec(), &4));
    /// assert!(entries.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.node, self.size)
    }

    /// Returns an iterator over the keys of the [Trie], in order.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from([("hello", 4), ("bye", 3)]);
    ///
    /// let mut keys = tree.keys();
    ///
    /// assert_eq!(keys.next().unwrap(), b"bye");
    /// assert_eq!(keys.next().unwrap(), b"hello");
    /// assert!(keys.next().is_none());
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the [Trie],
    /// ordered by their keys.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    ///
    /// tree.insert("hello", 1);
    /// tree.insert("bye", 2);
    ///
    /// let mut values = tree.values();
    ///
    /// assert_eq!(values.next().cloned(), Some(2));
    /// assert_eq!(values.next().cloned(), Some(1));
    /// assert_eq!(values.next().cloned(), None);
    /// ```
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// A read-only view of the root node, for inspecting the shape of
    /// the tree.
    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef::new(&self.node, NodeIndex::ROOT)
    }

    /// Returns the amount of records within
    /// the [Trie].
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<&str>::new();
    /// tree.insert("hello", "world");
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }
    /// Returns true if the [Trie] is empty,
    /// else it will return false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The amount of nodes making up the tree, root included. Forks
    /// created by splits count even though they hold no value.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// assert_eq!(tree.node_count(), 1);
    ///
    /// tree.insert("ab", 1);
    /// tree.insert("ac", 2);
    /// assert_eq!(tree.node_count(), 4);
    /// ```
    pub fn node_count(&self) -> usize {
        self.node.len()
    }
    /// Will clear the [Trie] data structure.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::<usize>::new();
    /// tree.insert("hello", 0);
    /// assert!(!tree.is_empty());
    ///
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!(records = self.size, nodes = self.node.len(), "clearing trie");
        self.node.clear();
        self.size = 0;
    }
    /// Returns the node capacity of the underlying pool.
    pub fn capacity(&self) -> usize {
        self.node.capacity()
    }
    /// Reserves capacity for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.node.reserve(additional);
    }
    /// Shrinks the node pool as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.node.shrink_to_fit();
    }

    /// Checks the structural invariants of the tree: the root carries no
    /// label, every other node has a non-empty label, siblings are filed
    /// under strictly ascending first bytes, every node has exactly one
    /// owner, and [Trie::len] matches the number of stored values.
    ///
    /// A trie only ever modified through its own methods always passes.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from([("romane", 1), ("romanus", 2), ("rubens", 3)]);
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), StructureError> {
        if self.node.len() == 0 {
            return Err(StructureError::MissingRoot);
        }
        if !self.node[NodeIndex::ROOT].label().is_empty() {
            return Err(StructureError::LabelledRoot);
        }

        let mut seen = vec![false; self.node.len()];
        seen[NodeIndex::ROOT.position()] = true;

        let mut counted = 0;
        let mut stack = vec![NodeIndex::ROOT];
        while let Some(index) = stack.pop() {
            let node = &self.node[index];
            if node.value().is_some() {
                counted += 1;
            }

            let mut previous = None;
            for child in node.subkeys() {
                let position = child.position();
                let Some(slot) = seen.get_mut(position) else {
                    return Err(StructureError::DanglingChild {
                        parent: index.position(),
                        child: position,
                    });
                };
                if *slot {
                    return Err(StructureError::SharedChild { node: position });
                }
                *slot = true;

                let Some(&first) = self.node[*child].label().first() else {
                    return Err(StructureError::EmptyLabel { node: position });
                };
                if previous.is_some_and(|p| p >= first) {
                    return Err(StructureError::Misordered {
                        parent: index.position(),
                    });
                }
                previous = Some(first);

                stack.push(*child);
            }
        }

        if let Some(node) = seen.iter().position(|reached| !reached) {
            return Err(StructureError::Unreachable { node });
        }
        if counted != self.size {
            return Err(StructureError::LengthMismatch {
                recorded: self.size,
                counted,
            });
        }
        Ok(())
    }
}

impl<K, V> Index<K> for Trie<V>
where
    K: AsRef<[u8]>,
{
    type Output = V;

    /// Indexes into the [Trie] using a byte key.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let tree = Trie::from([("apple", 4)]);
    ///
    /// assert_eq!(tree["apple"], 4);
    /// ```
    fn index(&self, index: K) -> &Self::Output {
        self.get(index).expect("Invalid trie index")
    }
}

impl<K, V> IndexMut<K> for Trie<V>
where
    K: AsRef<[u8]>,
{
    /// Indexes mutably into the [Trie] using a byte key.
    ///
    /// ```
    /// use rsradix::Trie;
    ///
    /// let mut tree = Trie::from([("apple", 4)]);
    ///
    /// tree["apple"] = 5;
    ///
    /// assert_eq!(tree["apple"], 5);
    /// ```
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        self.get_mut(index).expect("Invalid trie index")
    }
}

impl<V> PartialEq for Trie<V>
where
    V: PartialEq,
{
    /// Checks if two [Trie] hold the same records. The shape of a radix
    /// trie is fixed by its keys, so this compares the trees node by node
    /// from the roots, regardless of where the nodes sit in each pool.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.node == other.node
    }
}

impl<V> Eq for Trie<V> where V: Eq {}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    use super::{StructureError, Trie, list::NodeIndex, list::Node};

    fn entries<V: Clone>(trie: &Trie<V>) -> Vec<(Vec<u8>, V)> {
        let mut out = vec![];
        trie.walk(|key, value| out.push((key.to_vec(), value.clone())));
        out
    }

    #[test]
    pub fn trie_from_tuples() {
        let trie = Trie::from([("hello", 4)]);
        assert_eq!(trie.get("hello"), Some(&4));
    }

    #[test]
    pub fn split_correctness() {
        let mut tree = Trie::new();
        tree.insert("ab", 1);
        tree.insert("ac", 2);

        assert_eq!(tree.get("ab"), Some(&1));
        assert_eq!(tree.get("ac"), Some(&2));
        assert_eq!(tree.get("a"), None);
        assert_eq!(
            entries(&tree),
            vec![(b"ab".to_vec(), 1), (b"ac".to_vec(), 2)]
        );

        // root -> "a" -> {"b", "c"}
        let (_, fork) = tree.root().children().next().unwrap();
        assert_eq!(fork.label(), b"a");
        assert_eq!(fork.value(), None);
        assert_eq!(fork.child_count(), 2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    pub fn prefix_chain() {
        let mut tree = Trie::new();
        tree.insert("a", 2);
        tree.insert("ab", 1);

        assert_eq!(tree.get("a"), Some(&2));
        assert_eq!(tree.get("ab"), Some(&1));

        // A plain extension never splits.
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    pub fn split_lands_on_new_key() {
        let mut tree = Trie::new();
        tree.insert("abcd", 1);
        tree.insert("ab", 2);

        assert_eq!(tree.get("abcd"), Some(&1));
        assert_eq!(tree.get("ab"), Some(&2));
        assert_eq!(tree.get("abc"), None);

        let (_, fork) = tree.root().children().next().unwrap();
        assert_eq!(fork.label(), b"ab");
        assert_eq!(fork.value(), Some(&2));

        let (byte, tail) = fork.children().next().unwrap();
        assert_eq!(byte, b'c');
        assert_eq!(tail.label(), b"cd");
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    pub fn empty_key() {
        let mut tree = Trie::new();
        assert_eq!(tree.get("x"), None);
        assert_eq!(tree.get(""), None);

        tree.insert("", 0);
        assert_eq!(tree.get(""), Some(&0));
        assert_eq!(tree.get("x"), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(entries(&tree), vec![(vec![], 0)]);
    }

    #[test]
    pub fn lexicographic_walk() {
        let tree = Trie::from([("b", 1), ("a", 2), ("c", 3)]);
        assert_eq!(
            entries(&tree),
            vec![(b"a".to_vec(), 2), (b"b".to_vec(), 1), (b"c".to_vec(), 3)]
        );
    }

    #[test]
    pub fn walk_orders_full_byte_range() {
        let keys: [&[u8]; 7] = [
            &[0xFF],
            &[0x00, 0x01],
            &[0x00],
            &[0x7F, 0xFF, 0x00],
            &[0x7F, 0xFF],
            &[0x80],
            &[],
        ];
        let tree = Trie::from_pairs(keys.iter().map(|k| (k.to_vec(), k.len())));

        let mut expected = keys.iter().map(|k| k.to_vec()).collect::<Vec<_>>();
        expected.sort();

        assert_eq!(tree.keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    pub fn overwrite_keeps_structure() {
        let mut tree = Trie::new();
        tree.insert("team", 1);
        tree.insert("tea", 2);
        tree.insert("ten", 3);

        let nodes = tree.node_count();

        assert_eq!(tree.insert("tea", 20), Some(2));
        assert_eq!(tree.insert("team", 10), Some(1));

        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get("tea"), Some(&20));
        assert_eq!(tree.get("team"), Some(&10));
        assert_eq!(tree, Trie::from([("ten", 3), ("team", 10), ("tea", 20)]));
    }

    #[test]
    pub fn insert_grows_by_at_most_two_nodes() {
        let mut tree = Trie::new();
        for key in ["romane", "romanus", "romulus", "rubens", "ruber", "rubicon", "rubicundus", "r", ""] {
            let before = tree.node_count();
            tree.insert(key, ());
            assert!(tree.node_count() - before <= 2, "{key} grew the tree too much");
        }
        assert!(tree.validate().is_ok());
    }

    #[test]
    pub fn non_membership() {
        let tree = Trie::from([("romane", 1), ("romanus", 2)]);

        // Stops at the valueless fork.
        assert!(!tree.contains_key("roman"));
        // Stops inside an edge.
        assert!(!tree.contains_key("rom"));
        // Diverges inside an edge.
        assert!(!tree.contains_key("romanz"));
        assert!(!tree.contains_key("romanes"));
        // Runs past a leaf.
        assert!(!tree.contains_key("romanesque"));
        // No child for the first byte.
        assert!(!tree.contains_key("x"));
        assert!(!tree.contains_key(""));
    }

    #[test]
    pub fn binary_keys() {
        let mut tree = Trie::new();
        tree.insert([0xF0u8, 0x9F, 0x91, 0xA8], "man");
        tree.insert(vec![0xF0u8, 0x9F, 0x91, 0xA9], "woman");
        tree.insert(&[0xF0u8, 0x9F][..], "prefix");

        assert_eq!(tree.get([0xF0u8, 0x9F]), Some(&"prefix"));
        assert_eq!(tree.get([0xF0u8, 0x9F, 0x91]), None);
        assert_eq!(tree["👩".as_bytes()], "woman");
        assert_eq!(tree["👨"], "man");
    }

    #[test]
    pub fn get_mut_and_index_mut() {
        let mut tree = Trie::from([("alpha", 1), ("alps", 2)]);
        *tree.get_mut("alps").unwrap() += 40;
        tree["alpha"] *= 10;

        assert_eq!(tree["alps"], 42);
        assert_eq!(tree["alpha"], 10);
        assert!(tree.get_mut("alp").is_none());
    }

    #[test]
    #[should_panic(expected = "Invalid trie index")]
    pub fn index_missing_key() {
        let tree = Trie::from([("alpha", 1)]);
        let _ = tree["alp"];
    }

    #[test]
    pub fn iter_matches_walk() {
        let tree = Trie::from([("tea", 1), ("ted", 2), ("ten", 3), ("i", 4), ("in", 5), ("inn", 6), ("to", 7)]);

        let iterated = tree
            .iter()
            .map(|(k, v)| (k, *v))
            .collect::<Vec<_>>();
        assert_eq!(iterated, entries(&tree));
        assert_eq!(tree.iter().len(), 7);
        assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec![4, 5, 6, 1, 2, 3, 7]);

        // The traversal is restartable.
        assert_eq!(iterated, (&tree).into_iter().map(|(k, v)| (k, *v)).collect::<Vec<_>>());
    }

    #[test]
    pub fn clear_resets() {
        let mut tree = Trie::from([("a", 1), ("b", 2)]);
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.get("a"), None);

        tree.insert("a", 3);
        assert_eq!(tree.get("a"), Some(&3));
        assert!(tree.validate().is_ok());
    }

    #[test]
    pub fn validate_reports_corruption() {
        let tree = Trie::from([("a", 1), ("b", 2)]);
        let a = tree.node.subkey(NodeIndex::ROOT, 0);
        let b = tree.node.subkey(NodeIndex::ROOT, 1);

        let mut shared = tree.clone();
        shared.node.replace_subkey(NodeIndex::ROOT, 1, a);
        assert_eq!(
            shared.validate(),
            Err(StructureError::SharedChild { node: a.position() })
        );

        let mut misordered = tree.clone();
        misordered.node.replace_subkey(NodeIndex::ROOT, 0, b);
        misordered.node.replace_subkey(NodeIndex::ROOT, 1, a);
        assert_eq!(
            misordered.validate(),
            Err(StructureError::Misordered { parent: 0 })
        );

        let mut unlabelled = tree.clone();
        let empty = unlabelled.node.insert(Node::branch(vec![]));
        unlabelled.node.replace_subkey(NodeIndex::ROOT, 0, empty);
        assert_eq!(
            unlabelled.validate(),
            Err(StructureError::EmptyLabel { node: empty.position() })
        );

        let mut orphaned = tree.clone();
        let orphan = orphaned.node.insert(Node::leaf(b"z".to_vec(), 9));
        assert_eq!(
            orphaned.validate(),
            Err(StructureError::Unreachable { node: orphan.position() })
        );

        let mut labelled = tree.clone();
        labelled.node[NodeIndex::ROOT].label_mut().push(b'x');
        assert_eq!(labelled.validate(), Err(StructureError::LabelledRoot));

        let mut rootless = tree.clone();
        rootless.node.truncate(0);
        assert_eq!(rootless.validate(), Err(StructureError::MissingRoot));

        let mut miscounted = tree.clone();
        miscounted.size += 1;
        assert_eq!(
            miscounted.validate(),
            Err(StructureError::LengthMismatch { recorded: 3, counted: 2 })
        );

        assert!(tree.validate().is_ok());
    }

    #[test]
    pub fn deep_chain_does_not_recurse() {
        const DEPTH: usize = 60_000;

        // Keys "a", "aa", "aaa", ... built straight into the pool, since
        // inserting them one by one is quadratic.
        let mut tree = Trie::new();
        let mut parent = NodeIndex::ROOT;
        for i in 0..DEPTH {
            let node = tree.node.insert(Node::leaf(vec![b'a'], i));
            tree.node.attach(parent, node);
            tree.size += 1;
            parent = node;
        }
        assert!(tree.validate().is_ok());

        let mut visited = 0;
        let mut longest = 0;
        tree.walk(|key, value| {
            assert_eq!(key.len(), *value + 1);
            visited += 1;
            longest = key.len();
        });
        assert_eq!(visited, DEPTH);
        assert_eq!(longest, DEPTH);

        assert_eq!(tree.get(vec![b'a'; DEPTH]), Some(&(DEPTH - 1)));

        let mut other = tree.clone();
        assert!(tree == other);
        *other.get_mut(vec![b'a'; DEPTH]).unwrap() = 0;
        assert!(tree != other);
    }

    #[test]
    pub fn test_arbitrary_against_model() {
        arbtest::arbtest(|u| {
            let pairs: Vec<(Vec<u8>, u16)> = u.arbitrary()?;

            let mut tree = Trie::new();
            let mut model = BTreeMap::new();
            for (key, value) in pairs {
                assert_eq!(tree.insert(&key, value), model.insert(key, value));
            }

            assert!(tree.validate().is_ok());
            assert_eq!(tree.len(), model.len());
            for (key, value) in &model {
                assert_eq!(tree.get(key), Some(value));
            }

            let probe: Vec<u8> = u.arbitrary()?;
            assert_eq!(tree.get(&probe), model.get(&probe));

            let walked = entries(&tree);
            let expected = model.into_iter().collect::<Vec<_>>();
            assert_eq!(walked, expected);

            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_insertion_order() {
        arbtest::arbtest(|u| {
            let unique = u
                .arbitrary::<Vec<(Vec<u8>, u8)>>()?
                .into_iter()
                .collect::<BTreeMap<_, _>>();
            let mut shuffled = unique.clone().into_iter().collect::<Vec<_>>();
            shuffled.shuffle(&mut StdRng::seed_from_u64(u.arbitrary()?));

            let sorted = Trie::from_pairs(unique);
            let scrambled = Trie::from_pairs(shuffled);

            assert_eq!(sorted, scrambled);
            assert_eq!(sorted.node_count(), scrambled.node_count());
            assert_eq!(entries(&sorted), entries(&scrambled));

            Ok(())
        });
    }

    #[cfg(feature = "serde")]
    #[test]
    pub fn serde_json_preserves_trie() {
        let tree = Trie::from([("romane", 1), ("romanus", 2), ("", 3)]);
        let text = serde_json::to_string(&tree).unwrap();
        let back: Trie<i32> = serde_json::from_str(&text).unwrap();

        assert!(back.validate().is_ok());
        assert_eq!(back, tree);
        assert_eq!(back.get("romanus"), Some(&2));
    }

    #[cfg(feature = "serde")]
    #[test]
    pub fn serde_json_rootless_trie_fails_validation() {
        let back: Trie<i32> = serde_json::from_str(r#"{"node":{"slots":[]},"size":0}"#).unwrap();
        assert_eq!(back.validate(), Err(StructureError::MissingRoot));
    }
}

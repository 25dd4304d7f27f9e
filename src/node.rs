use std::fmt::Debug;

use crate::list::{NodeIndex, Slots};

/// A read-only view of a single node inside a [Trie](crate::Trie).
///
/// This exposes the raw shape of the tree: the edge label, the optional
/// value and the children ordered by the byte they are filed under.
///
/// ```
/// use rsradix::Trie;
///
/// let tree = Trie::from([("ab", 1), ("ac", 2)]);
///
/// let root = tree.root();
/// assert!(root.is_root());
///
/// let (byte, fork) = root.children().next().unwrap();
/// assert_eq!(byte, b'a');
/// assert_eq!(fork.label(), b"a");
/// assert_eq!(fork.value(), None);
///
/// let labels = fork.children().map(|(_, c)| c.label()).collect::<Vec<_>>();
/// assert_eq!(labels, vec![b"b", b"c"]);
/// ```
pub struct NodeRef<'a, V> {
    pool: &'a Slots<V>,
    index: NodeIndex,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(pool: &'a Slots<V>, index: NodeIndex) -> Self {
        Self { pool, index }
    }
    /// The edge label leading into this node. Empty only for the root.
    pub fn label(&self) -> &'a [u8] {
        self.pool[self.index].label()
    }
    /// The value stored at this node, if a key ends here.
    pub fn value(&self) -> Option<&'a V> {
        self.pool[self.index].value().as_ref()
    }
    /// Whether this is the root of the trie.
    pub fn is_root(&self) -> bool {
        self.index == NodeIndex::ROOT
    }
    /// How many children hang off this node.
    pub fn child_count(&self) -> usize {
        self.pool[self.index].sub_key_len()
    }
    /// The children of this node in ascending byte order, each paired
    /// with the first byte of its label.
    pub fn children(self) -> impl Iterator<Item = (u8, NodeRef<'a, V>)> + 'a {
        let pool = self.pool;
        pool[self.index]
            .subkeys()
            .map(move |child| (pool[*child].first_byte(), NodeRef::new(pool, *child)))
    }
}

impl<V: Debug> Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("label", &self.label())
            .field("value", &self.value())
            .field("children", &self.child_count())
            .finish()
    }
}

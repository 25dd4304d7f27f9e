use std::{
    cmp::Ordering,
    ops::{Index, IndexMut},
    slice::Iter,
};

/// A radix node that holds an edge label, an array of subkeys, and a value.
/// The edge label is the run of bytes between the parent and this node, so
/// the full key of a node is the concatenation of the labels along its path.
///
/// In the case of a root node the label will just be empty. For the sake of
/// efficient serialization, if the `value` field is [Option::None] then it will not serialize
/// at all instead of just serializing as `null`,
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Node<V> {
    /// The edge label.
    label: Vec<u8>,
    /// The node subkeys, which points to other nodes in the [Slots]. These are
    /// kept sorted by the first byte of each child label.
    sub_keys: Vec<NodeIndex>,
    /// The value of the node. This is only populated if this node terminates
    /// a key.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    value: Option<V>,
}

impl<V> Node<V> {
    /// Creates a new root node. This just consists
    /// of a normal node with an empty label.
    pub const fn root() -> Self {
        Node {
            label: Vec::new(),
            sub_keys: Vec::new(),
            value: None,
        }
    }
    /// Creates a leaf terminating a key.
    pub fn leaf(label: Vec<u8>, value: V) -> Self {
        Self {
            label,
            sub_keys: Vec::new(),
            value: Some(value),
        }
    }
    /// Creates a valueless node that only exists to fork
    /// two edges apart.
    pub fn branch(label: Vec<u8>) -> Self {
        Self {
            label,
            sub_keys: Vec::new(),
            value: None,
        }
    }
}

impl<V> Node<V> {
    /// Gets the edge label. This will be empty only for the root.
    pub fn label(&self) -> &[u8] {
        &self.label
    }
    /// Gets the edge label mutably, used to truncate it in place when
    /// an edge is split.
    pub fn label_mut(&mut self) -> &mut Vec<u8> {
        &mut self.label
    }
    /// The byte this node is filed under in its parent.
    ///
    /// # Panics
    /// If called on the root, which is never filed under anything.
    pub fn first_byte(&self) -> u8 {
        *self
            .label
            .first()
            .expect("Only the root may have an empty label.")
    }
    /// Gets an iterator of all the subkeys as a form
    /// of [NodeIndex] iterators.
    pub fn subkeys(&self) -> Iter<'_, NodeIndex> {
        self.sub_keys.iter()
    }
    /// Returns the length of the subkey array, or in other words,
    /// how many children the specific node has.
    pub fn sub_key_len(&self) -> usize {
        self.sub_keys.len()
    }
    /// Returns an immutable reference to the inner value.
    pub fn value(&self) -> &Option<V> {
        &self.value
    }
    /// Returns a mutable reference to the inner value.
    pub fn value_mut(&mut self) -> &mut Option<V> {
        &mut self.value
    }
    /// Checks that a node matches another on label, value and child
    /// count. Children are left for the caller to pair up.
    fn shallow_equals(&self, other: &Self) -> bool
    where
        V: PartialEq,
    {
        self.label == other.label
            && self.value == other.value
            && self.sub_keys.len() == other.sub_keys.len()
    }
}

/// The array that holds all the underlying node data. Nodes are never
/// removed one at a time, so this is a plain vector that only grows
/// until it is cleared.
///
/// The slots will always have a root. In practice, this means that it will
/// never error because the root was indexed and it did not exist.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Slots<V> {
    slots: Vec<Node<V>>,
}

impl<V> PartialEq for Slots<V>
where
    V: PartialEq,
{
    /// Performs a semantic equals comparison across the nodes starting from the two roots.
    /// Children are compared pairwise in order, which is enough because a radix
    /// trie has exactly one shape for a given set of keys.
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(NodeIndex::ROOT, NodeIndex::ROOT)];
        while let Some((a, b)) = stack.pop() {
            let (left, right) = (&self[a], &other[b]);
            if !left.shallow_equals(right) {
                return false;
            }
            stack.extend(left.subkeys().copied().zip(right.subkeys().copied()));
        }
        true
    }
}

/// Represents the index of a node within the [Slots]. Indices stay valid
/// for as long as the pool is not cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    /// The root node, which always has an internal index of 0.
    pub const ROOT: NodeIndex = NodeIndex(0);
}

impl NodeIndex {
    /// Gets the internal position of the node as a [usize].
    pub fn position(&self) -> usize {
        self.0 as usize
    }
}

impl<V> Slots<V> {
    /// Creates a new [Slots] with a certain amount of capacity
    pub fn with_capacity(cap: usize) -> Self {
        let mut slots = Vec::with_capacity(cap.max(1));
        slots.push(Node::root());
        Self { slots }
    }
    /// The amount of nodes in the pool, root included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    /// Gets the capacity of the [Slots].
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
    /// Reserves a certain quantity in the underlying [Vec] that makes
    /// up the [Slots].
    pub fn reserve(&mut self, quantity: usize) {
        self.slots.reserve(quantity);
    }
    /// Reduces the internal vector to the minimum possible capacity.
    pub fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
    }
    /// Inserts a [Node] into the underlying [Vec], returning
    /// the new [NodeIndex]. The node is not attached to anything yet.
    pub fn insert(&mut self, item: Node<V>) -> NodeIndex {
        self.slots.push(item);
        NodeIndex((self.slots.len() - 1) as u32)
    }
    /// Finds the child of `source` filed under `byte`. Returns the
    /// position within the subkey list on success, or the position
    /// where such a child would have to be inserted.
    pub fn child(&self, source: NodeIndex, byte: u8) -> Result<usize, usize> {
        self.search_by(source, |first| first.cmp(&byte))
    }
    fn search_by<F>(&self, source: NodeIndex, mut functor: F) -> Result<usize, usize>
    where
        F: FnMut(u8) -> Ordering,
    {
        self[source]
            .sub_keys
            .binary_search_by(|node| functor(self[*node].first_byte()))
    }
    /// Gets the subkey stored at `position` in the list of `source`.
    pub fn subkey(&self, source: NodeIndex, position: usize) -> NodeIndex {
        self[source].sub_keys[position]
    }
    /// Swaps the subkey stored at `position` in the list of `source`
    /// for another node, returning the one that was there.
    pub fn replace_subkey(&mut self, source: NodeIndex, position: usize, value: NodeIndex) -> NodeIndex {
        std::mem::replace(&mut self[source].sub_keys[position], value)
    }
    /// Attaches `value` as a child of `source`, keeping the subkeys sorted.
    /// If a child with the same first byte was present it is replaced
    /// and returned.
    pub fn attach(&mut self, source: NodeIndex, value: NodeIndex) -> Option<NodeIndex> {
        let byte = self[value].first_byte();
        match self.child(source, byte) {
            Ok(valid) => Some(self.replace_subkey(source, valid, value)),
            Err(invalid) => {
                self[source].sub_keys.insert(invalid, value);
                None
            }
        }
    }
    /// Drops every node from position `len` on. Only used to build
    /// corrupted pools in tests.
    #[cfg(test)]
    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }
    /// Clears the underlying vector, reinserting the root node into
    /// the [Slots].
    pub fn clear(&mut self) {
        self.slots.clear();
        self.slots.push(Node::root());
    }
}

impl<V> Index<NodeIndex> for Slots<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        self.slots
            .get(index.position())
            .expect("Could not find node at requested index.")
    }
}

impl<V> IndexMut<NodeIndex> for Slots<V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        self.slots
            .get_mut(index.position())
            .expect("Could not find node at requested index.")
    }
}

use crate::list::{NodeIndex, Slots};

/// An iterator over the entries of a [Trie](crate::Trie) in ascending
/// lexicographic byte order.
///
/// The traversal is depth-first. Each frame on the stack remembers how long
/// the key buffer was when the frame was pushed, so popping a frame only
/// has to truncate the buffer back and append that node's label.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    pool: &'a Slots<V>,
    /// Pending nodes alongside the key length of their parent.
    stack: Vec<(NodeIndex, usize)>,
    /// The key of the node most recently popped.
    key: Vec<u8>,
    /// Values still to be yielded.
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(pool: &'a Slots<V>, remaining: usize) -> Self {
        Self {
            pool,
            stack: vec![(NodeIndex::ROOT, 0)],
            key: Vec::new(),
            remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool;
        while let Some((index, base)) = self.stack.pop() {
            let node = &pool[index];

            self.key.truncate(base);
            self.key.extend_from_slice(node.label());

            // Reversed so the smallest byte is popped first.
            let depth = self.key.len();
            self.stack
                .extend(node.subkeys().rev().map(|child| (*child, depth)));

            if let Some(value) = node.value() {
                // A corrupted `len` must not underflow here.
                self.remaining = self.remaining.saturating_sub(1);
                return Some((self.key.clone(), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// An iterator over the keys of a [Trie](crate::Trie), in order.
#[derive(Debug, Clone)]
pub struct Keys<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [Trie](crate::Trie), ordered by
/// their keys.
#[derive(Debug, Clone)]
pub struct Values<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

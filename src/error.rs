use thiserror::Error;

/// A broken structural invariant found by [Trie::validate](crate::Trie::validate).
///
/// None of these can be produced through the public API. Seeing one means the
/// trie was corrupted, for instance by deserializing a hand-edited document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("the node pool has no root")]
    MissingRoot,
    #[error("the root carries a label")]
    LabelledRoot,
    #[error("node {node} is not the root but has an empty label")]
    EmptyLabel { node: usize },
    #[error("children of node {parent} are not in strictly ascending byte order")]
    Misordered { parent: usize },
    #[error("node {parent} points at child {child}, which is outside the pool")]
    DanglingChild { parent: usize, child: usize },
    #[error("node {node} is owned by more than one parent")]
    SharedChild { node: usize },
    #[error("node {node} cannot be reached from the root")]
    Unreachable { node: usize },
    #[error("trie records {recorded} keys but holds {counted} values")]
    LengthMismatch { recorded: usize, counted: usize },
}

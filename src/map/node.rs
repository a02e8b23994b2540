use std::ptr;
use std::fmt;

use super::InnerNode;

/// A single node of the binary search tree
///
/// This is a read-only view that can be used to walk the structure of the tree directly.
pub struct Node<'a, K, V> {
    nodes: &'a [InnerNode<K, V>],
    index: usize,
}

impl<'a, K, V> fmt::Debug for Node<'a, K, V>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("value", self.value())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<'a, K, V> Clone for Node<'a, K, V> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, K: PartialEq, V: PartialEq> PartialEq for Node<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        // If the pointers are the same, the values are guaranteed to be equal (similar to `Arc`
        // using `ptr_eq` to optimize its `PartialEq` impl)
        let ptr_eq = ptr::eq(self.nodes, other.nodes) && self.index == other.index;
        ptr_eq || (self.key().eq(other.key()) && self.value().eq(other.value()))
    }
}

impl<'a, K: Eq, V: Eq> Eq for Node<'a, K, V> {}

impl<'a, K, V> Node<'a, K, V> {
    /// Creates a new `Node`
    ///
    /// `index` must be the index of a node in `nodes`
    pub(super) fn new(nodes: &'a [InnerNode<K, V>], index: usize) -> Self {
        debug_assert!(index < nodes.len());
        Self {nodes, index}
    }

    fn inner(&self) -> &'a InnerNode<K, V> {
        let nodes = self.nodes;
        &nodes[self.index]
    }

    /// Returns the key of this node
    pub fn key(&self) -> &'a K {
        &self.inner().key
    }

    /// Returns the value of this node
    pub fn value(&self) -> &'a V {
        &self.inner().value
    }

    /// Returns true if this node has a left subtree
    pub fn has_left(&self) -> bool {
        !self.inner().left.is_null()
    }

    /// Returns true if this node has a right subtree
    pub fn has_right(&self) -> bool {
        !self.inner().right.is_null()
    }

    /// Returns the left child node (subtree) of this node, if any
    pub fn left(&self) -> Option<Self> {
        self.inner().left.into_index().map(|index| Self::new(self.nodes, index))
    }

    /// Returns the right child node (subtree) of this node, if any
    pub fn right(&self) -> Option<Self> {
        self.inner().right.into_index().map(|index| Self::new(self.nodes, index))
    }

    /// Returns the parent of this node, or `None` for the root
    pub fn parent(&self) -> Option<Self> {
        self.inner().parent.into_index().map(|index| Self::new(self.nodes, index))
    }
}

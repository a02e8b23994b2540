use std::fmt;
use std::ptr;

use super::{InnerNode, Node};
use super::ptr::Ptr;

/// A position in a [`TreeMap`](crate::TreeMap): either at one of its entries, or at the end
///
/// The end position sits one past the entry with the largest key. A cursor moves through entries
/// in sorted order using only the links stored in each node, so moving is `O(h)` in the worst case
/// (`h` is the height of the tree) and `O(1)` amortized over a full traversal.
///
/// Cursors borrow the map, so they can never observe it being modified.
pub struct Cursor<'a, K, V> {
    nodes: &'a [InnerNode<K, V>],
    /// The root of the tree, used to find the last entry when moving back from the end
    root: Ptr,
    /// The current node, or null at the end
    current: Ptr,
    /// The node this cursor left when it last moved forward onto the end
    previous: Ptr,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, K, V> fmt::Debug for Cursor<'a, K, V>
    where K: fmt::Debug,
          V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.key_value())
            .finish()
    }
}

impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    /// Two cursors are equal if they are at the same position of the same map
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.nodes, other.nodes) && self.current == other.current
    }
}

impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(super) fn new(nodes: &'a [InnerNode<K, V>], root: Ptr, current: Ptr) -> Self {
        Self {
            nodes,
            root,
            current,
            previous: Ptr::null(),
        }
    }

    /// Returns true if the cursor is at the end position
    pub fn is_end(&self) -> bool {
        self.current.is_null()
    }

    /// Returns the key of the current entry, or `None` at the end
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns the value of the current entry, or `None` at the end
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns the key and value of the current entry, or `None` at the end
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let nodes = self.nodes;
        let node = &nodes[self.current.into_index()?];
        Some((&node.key, &node.value))
    }

    /// Returns the tree node of the current entry, or `None` at the end
    pub fn node(&self) -> Option<Node<'a, K, V>> {
        self.current.into_index().map(|index| Node::new(self.nodes, index))
    }

    /// Moves to the entry with the next larger key, or to the end if this is the last entry
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end.
    pub fn move_next(&mut self) {
        let index = match self.current.into_index() {
            Some(index) => index,
            None => panic!("cannot move a cursor forward past the end of the map"),
        };

        let next = successor(self.nodes, index);
        if next.is_null() {
            self.previous = self.current;
        }
        self.current = next;
    }

    /// Moves to the entry with the next smaller key
    ///
    /// From the end, this moves to the last entry of the map. From the first entry, this moves to
    /// the end.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of an empty map.
    pub fn move_prev(&mut self) {
        self.current = match self.current.into_index() {
            Some(index) => predecessor(self.nodes, index),

            None if !self.previous.is_null() => self.previous,

            None => {
                let last = rightmost(self.nodes, self.root);
                if last.is_null() {
                    panic!("cannot move a cursor back from the end of an empty map");
                }
                last
            },
        };
    }
}

/// Returns the node with the smallest key in the subtree at `ptr`
pub(super) fn leftmost<K, V>(nodes: &[InnerNode<K, V>], mut ptr: Ptr) -> Ptr {
    while let Some(index) = ptr.into_index() {
        let left = nodes[index].left;
        if left.is_null() {
            break;
        }
        ptr = left;
    }

    ptr
}

/// Returns the node with the largest key in the subtree at `ptr`
pub(super) fn rightmost<K, V>(nodes: &[InnerNode<K, V>], mut ptr: Ptr) -> Ptr {
    while let Some(index) = ptr.into_index() {
        let right = nodes[index].right;
        if right.is_null() {
            break;
        }
        ptr = right;
    }

    ptr
}

/// Returns the in-order successor of the node at `index`, or null if it holds the largest key
pub(super) fn successor<K, V>(nodes: &[InnerNode<K, V>], index: usize) -> Ptr {
    let node = &nodes[index];
    if !node.right.is_null() {
        return leftmost(nodes, node.right);
    }

    // Climb until we arrive from a left child. That parent is the next node.
    let mut child = Ptr::to(index);
    let mut parent = node.parent;
    while let Some(parent_index) = parent.into_index() {
        let parent_node = &nodes[parent_index];
        if parent_node.right != child {
            break;
        }
        child = parent;
        parent = parent_node.parent;
    }

    parent
}

/// Returns the in-order predecessor of the node at `index`, or null if it holds the smallest key
pub(super) fn predecessor<K, V>(nodes: &[InnerNode<K, V>], index: usize) -> Ptr {
    let node = &nodes[index];
    if !node.left.is_null() {
        return rightmost(nodes, node.left);
    }

    let mut child = Ptr::to(index);
    let mut parent = node.parent;
    while let Some(parent_index) = parent.into_index() {
        let parent_node = &nodes[parent_index];
        if parent_node.left != child {
            break;
        }
        child = parent;
        parent = parent_node.parent;
    }

    parent
}

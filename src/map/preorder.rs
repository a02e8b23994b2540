use std::iter::FusedIterator;

use super::InnerNode;
use super::ptr::Ptr;

/// A pre-order traversal of a `TreeMap`: each node is visited before its left subtree, which is
/// visited before its right subtree
///
/// The order depends on the shape of the tree, so this is mostly useful for inspecting (or
/// reproducing) that shape.
pub struct IterPreorder<'a, K, V> {
    nodes: &'a [InnerNode<K, V>],
    stack: Vec<usize>,
}

impl<'a, K, V> IterPreorder<'a, K, V> {
    pub(super) fn new(nodes: &'a [InnerNode<K, V>], root: Ptr) -> Self {
        Self {
            nodes,
            stack: root.into_index().into_iter().collect(),
        }
    }
}

// See: https://www.geeksforgeeks.org/iterative-preorder-traversal/
impl<'a, K, V> Iterator for IterPreorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[index];
        self.stack.extend(node.right.into_index());
        self.stack.extend(node.left.into_index());
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for IterPreorder<'a, K, V> {}

#[cfg(test)]
mod tests {
    use crate::TreeMap;

    #[test]
    fn traversal_order() {
        let mut map = TreeMap::new();
        // Create the following tree:
        //      4
        //   2     5
        // 1   3
        //
        // Inserting the tree one level at a time so it makes this shape:
        map.insert(4, 4);
        map.insert(5, 5);
        map.insert(2, 2);
        map.insert(3, 3);
        map.insert(1, 1);

        let values: Vec<_> = map.iter_preorder().map(|(k, _)| *k).collect();
        assert_eq!(&values, &[4, 2, 1, 3, 5]);

        let values: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(&values, &[1, 2, 3, 4, 5]);
    }
}

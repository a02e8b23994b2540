use std::iter::FusedIterator;

use super::InnerNode;
use super::ptr::Ptr;
use super::cursor::{leftmost, rightmost, successor, predecessor};

/// An iterator over the entries of a `TreeMap`, sorted by key
///
/// Walks the tree using parent links rather than a stack, from both ends.
pub struct Iter<'a, K, V> {
    nodes: &'a [InnerNode<K, V>],
    front: Ptr,
    back: Ptr,
    /// The number of entries left between `front` and `back` (inclusive)
    len: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a [InnerNode<K, V>], root: Ptr) -> Self {
        Self {
            nodes,
            front: leftmost(nodes, root),
            back: rightmost(nodes, root),
            len: nodes.len(),
        }
    }

    fn entry(&self, index: usize) -> (&'a K, &'a V) {
        let nodes = self.nodes;
        let node = &nodes[index];
        (&node.key, &node.value)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let index = self.front.into_index()?;

        self.len -= 1;
        self.front = successor(self.nodes, index);

        Some(self.entry(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let index = self.back.into_index()?;

        self.len -= 1;
        self.back = predecessor(self.nodes, index);

        Some(self.entry(index))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// An iterator over the keys of a `TreeMap`, in sorted order
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Self {iter}
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(key, _)| key)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// An iterator over the values of a `TreeMap`, sorted by key
#[derive(Clone)]
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Self {iter}
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, value)| value)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

#[cfg(test)]
mod tests {
    use crate::TreeMap;

    #[test]
    fn both_ends_meet() {
        let map: TreeMap<_, _> = [10, 5, 15, 3, 7, 12, 20].iter().map(|&k| (k, k)).collect();

        let mut iter = map.keys();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&20));
        assert_eq!(iter.next_back(), Some(&15));
        assert_eq!(iter.next(), Some(&5));
        assert_eq!(iter.len(), 3);

        let rest: Vec<_> = iter.collect();
        assert_eq!(&rest, &[&7, &10, &12]);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let map: TreeMap<_, _> = (0..3).map(|k| (k, k)).collect();

        let mut iter = map.iter();
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn values_sorted_by_key() {
        let map: TreeMap<_, _> = vec![(2, "two"), (1, "one"), (3, "three")].into_iter().collect();

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(&values, &["one", "two", "three"]);

        let values: Vec<_> = map.values().rev().copied().collect();
        assert_eq!(&values, &["three", "two", "one"]);

        let mut pairs = Vec::new();
        for (&key, &value) in &map {
            pairs.push((key, value));
        }
        assert_eq!(&pairs, &[(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn empty() {
        let map: TreeMap<i32, i32> = TreeMap::new();
        assert_eq!(map.iter().next(), None);
        assert_eq!(map.iter().next_back(), None);
        assert_eq!(map.keys().len(), 0);
    }
}

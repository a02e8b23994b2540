mod ptr;
mod node;
mod cursor;
mod inorder;
mod preorder;
#[cfg(feature = "serde")]
mod serialize;

pub use node::*;
pub use cursor::*;
pub use inorder::*;
pub use preorder::*;

use std::fmt;
use std::mem;
use std::ops::Index;
use std::cmp::Ordering;
use std::borrow::Borrow;
use std::iter::FromIterator;

use ptr::Ptr;

#[derive(Debug, Clone, PartialEq, Eq)]
struct InnerNode<K, V> {
    key: K,
    value: V,
    left: Ptr,
    right: Ptr,
    /// Back-reference used for traversal only. The arena owns every node.
    parent: Ptr,
}

impl<K, V> InnerNode<K, V> {
    fn new(key: K, value: V, parent: Ptr) -> Self {
        Self {
            key,
            value,
            left: Ptr::null(),
            right: Ptr::null(),
            parent,
        }
    }

    fn set_child(&mut self, side: Side, ptr: Ptr) {
        match side {
            Side::Left => self.left = ptr,
            Side::Right => self.right = ptr,
        }
    }
}

/// Which link of a parent node a child hangs off of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// The outcome of walking the tree looking for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    /// The key is stored in the node at this index
    Found(usize),
    /// The key is absent. A node for it would become the `side` child of `parent`, or the root if
    /// `parent` is null.
    Vacant {parent: Ptr, side: Side},
}

/// An ordered map with unique keys, backed by an unbalanced binary search tree (BST)
///
/// BST properties: For each node with key `k`:
/// - The key of each node in the left subtree is less than `k`
/// - The key of each node in the right subtree is greater than `k`
///
/// The tree is never rebalanced. Its shape is entirely determined by insertion order, so inserting
/// keys in sorted order degrades it into a linked list. Entries cannot be removed individually.
///
/// Nodes are stored in an arena owned by the map. Links between nodes (including the link from
/// each node back to its parent) are indexes into that arena, which is what allows [`Cursor`] to
/// walk the tree in both directions without an auxiliary stack.
pub struct TreeMap<K, V> {
    nodes: Vec<InnerNode<K, V>>,
    root: Ptr,
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self {
            nodes: Vec::default(),
            root: Ptr::null(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Two maps may be structured differently while still having all the same entries (e.g. if
        // insertion order is different). In-order traversal produces the entries in sorted order,
        // so comparing that is enough.
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for TreeMap<K, V> {}

impl<K: Clone, V: Clone> Clone for TreeMap<K, V> {
    /// Deep copies the tree, preserving its exact shape
    ///
    /// The copy is made with an explicit stack so that it works for trees of any height. Nodes of
    /// the copy are laid out in pre-order.
    fn clone(&self) -> Self {
        let mut nodes: Vec<InnerNode<K, V>> = Vec::with_capacity(self.nodes.len());

        // (index in `self.nodes`, parent in `nodes`, which child of that parent)
        let mut stack = Vec::new();
        stack.extend(self.root.into_index().map(|index| (index, Ptr::null(), Side::Left)));

        while let Some((index, parent, side)) = stack.pop() {
            let source = &self.nodes[index];

            let copy = Ptr::to(nodes.len());
            nodes.push(InnerNode::new(source.key.clone(), source.value.clone(), parent));
            if let Some(parent) = parent.into_index() {
                nodes[parent].set_child(side, copy);
            }

            // Right is pushed first so the left subtree is copied first
            stack.extend(source.right.into_index().map(|right| (right, copy, Side::Right)));
            stack.extend(source.left.into_index().map(|left| (left, copy, Side::Left)));
        }

        let root = if nodes.is_empty() { Ptr::null() } else { Ptr::to(0) };
        Self {nodes, root}
    }

    /// Replaces the contents of `self` with a deep copy of `source`
    ///
    /// If cloning a key or value panics, `self` is left unchanged.
    fn clone_from(&mut self, source: &Self) {
        self.assign(source.clone());
    }
}

impl<K, V> TreeMap<K, V> {
    /// Creates an empty `TreeMap`
    ///
    /// The map is initially created with a capacity of 0, so it will not allocate until it is first
    /// inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    /// let mut map: TreeMap<&str, i32> = TreeMap::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with space for at least `capacity` entries
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    /// let map: TreeMap<&str, i32> = TreeMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: Ptr::null(),
        }
    }

    /// Returns the number of entries in the map (i.e. the number of nodes in the binary search
    /// tree)
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        // Nodes are never removed individually, so every node in the arena is in the tree
        self.nodes.len()
    }

    /// Returns true if the map is empty
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.nodes.is_empty() == self.root.is_null());
        self.nodes.is_empty()
    }

    /// Returns the number of entries the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves capacity for at least `additional` more entries
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional)
    }

    /// Shrinks the capacity of the map as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit()
    }

    /// Clears the map, removing all entries
    ///
    /// The allocated capacity is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(map.begin() == map.end());
    /// ```
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = Ptr::null();
    }

    /// Exchanges the contents of two maps
    ///
    /// Time complexity: `O(1)`. No node is copied or visited.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.nodes, &mut other.nodes);
        mem::swap(&mut self.root, &mut other.root);
    }

    /// Replaces the contents of this map with `replacement`
    ///
    /// The replacement is swapped into place and the previous contents are dropped along with it.
    /// Pass `other.clone()` to copy another map, or even this map itself:
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "a");
    ///
    /// let mut other = TreeMap::new();
    /// other.insert(2, "b");
    ///
    /// other.assign(map.clone());
    /// assert_eq!(other, map);
    ///
    /// map.assign(map.clone());
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn assign(&mut self, mut replacement: Self) {
        self.swap(&mut replacement);
    }

    /// Returns a cursor at the entry with the smallest key, or the end cursor if the map is empty
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.nodes, self.root, cursor::leftmost(&self.nodes, self.root))
    }

    /// Returns the end cursor, positioned one past the entry with the largest key
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let map: TreeMap<_, _> = vec![(10, ()), (5, ()), (15, ())].into_iter().collect();
    ///
    /// let mut cursor = map.end();
    /// assert_eq!(cursor.key(), None);
    /// cursor.move_prev();
    /// assert_eq!(cursor.key(), Some(&15));
    /// ```
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.nodes, self.root, Ptr::null())
    }

    /// Returns the entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let index = cursor::leftmost(&self.nodes, self.root).into_index()?;
        let node = &self.nodes[index];
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let index = cursor::rightmost(&self.nodes, self.root).into_index()?;
        let node = &self.nodes[index];
        Some((&node.key, &node.value))
    }

    /// Returns an iterator over the entries of the map, sorted by key
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root)
    }

    /// Returns an iterator over the keys of the map, in sorted order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values of the map, sorted by key
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Performs a pre-order traversal of the tree
    pub fn iter_preorder(&self) -> IterPreorder<'_, K, V> {
        IterPreorder::new(&self.nodes, self.root)
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// The root is whichever key was inserted first. For a guaranteed ordering, use a cursor or
    /// one of the iteration methods.
    ///
    /// This is a low-level API meant to be used for implementing traversals.
    pub fn root(&self) -> Option<Node<'_, K, V>> {
        self.root.into_index().map(|index| Node::new(&self.nodes, index))
    }

    fn cursor_at(&self, index: usize) -> Cursor<'_, K, V> {
        Cursor::new(&self.nodes, self.root, Ptr::to(index))
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Returns `1` if the map contains the key and `0` otherwise
    ///
    /// Keys are unique, so no other result is possible.
    pub fn count<Q>(&self, key: &Q) -> usize
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        if self.contains_key(key) { 1 } else { 0 }
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the borrowed
    /// form must match the ordering on the key type.
    ///
    /// Time complexity: `O(h)` where `h` is the height of the tree
    pub fn contains_key<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        matches!(self.search(key), Search::Found(_))
    }

    /// Returns a cursor at the entry with the given key, or the end cursor if no such key exists
    ///
    /// Time complexity: `O(h)` where `h` is the height of the tree
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(5, "a");
    /// map.insert(8, "c");
    ///
    /// let mut cursor = map.find(&5);
    /// assert_eq!(cursor.key_value(), Some((&5, &"a")));
    /// cursor.move_next();
    /// assert_eq!(cursor.key_value(), Some((&8, &"c")));
    ///
    /// assert!(map.find(&6) == map.end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(index) => self.cursor_at(index),
            Search::Vacant {..} => self.end(),
        }
    }

    /// Returns a reference to the value corresponding to the given key, or `None` if no such key
    /// exists in the binary search tree
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map: TreeMap<String, _> = TreeMap::new();
    /// map.insert("abc".to_string(), 1);
    /// assert_eq!(map.get("abc"), Some(&1));
    /// assert_eq!(map.get("def"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(index) => Some(&self.nodes[index].value),
            Search::Vacant {..} => None,
        }
    }

    /// Returns a mutable reference to the value corresponding to the given key, or `None` if no
    /// such key exists in the binary search tree
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(index) => Some(&mut self.nodes[index].value),
            Search::Vacant {..} => None,
        }
    }

    /// Returns the key-value pair corresponding to the given key
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(index) => {
                let node = &self.nodes[index];
                Some((&node.key, &node.value))
            },
            Search::Vacant {..} => None,
        }
    }

    /// Inserts a new entry into the binary search tree, unless the key is already present
    ///
    /// Returns a cursor at the entry for `key` along with `true` if a new node was inserted. If the
    /// key was already present, the map is not modified: `key` and `value` are dropped and `false`
    /// is returned with a cursor at the existing entry.
    ///
    /// Use [`insert_or_assign`](Self::insert_or_assign) to overwrite existing values.
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// let (cursor, inserted) = map.insert(5, "a");
    /// assert!(inserted);
    /// assert_eq!(cursor.value(), Some(&"a"));
    ///
    /// let (cursor, inserted) = map.insert(5, "z");
    /// assert!(!inserted);
    /// assert_eq!(cursor.value(), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool) {
        let (index, inserted) = match self.search(&key) {
            Search::Found(index) => (index, false),
            Search::Vacant {parent, side} => (self.attach(parent, side, key, value), true),
        };

        (self.cursor_at(index), inserted)
    }

    /// Inserts a new entry into the binary search tree, or replaces the value of an existing one
    ///
    /// Returns a cursor at the entry for `key` along with `true` if a new node was inserted. If the
    /// key was already present, only its value is replaced (the stored key is kept) and `false` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert!(map.insert_or_assign(5, "a").1);
    ///
    /// let (cursor, inserted) = map.insert_or_assign(5, "z");
    /// assert!(!inserted);
    /// assert_eq!(cursor.value(), Some(&"z"));
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool) {
        let (index, inserted) = match self.search(&key) {
            Search::Found(index) => {
                self.nodes[index].value = value;
                (index, false)
            },
            Search::Vacant {parent, side} => (self.attach(parent, side, key, value), true),
        };

        (self.cursor_at(index), inserted)
    }

    /// Returns a mutable reference to the value for `key`, inserting the value returned by
    /// `default` first if the key is not present
    ///
    /// An existing value is never overwritten and `default` is only called on insertion.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
        where F: FnOnce() -> V,
    {
        let index = match self.search(&key) {
            Search::Found(index) => index,
            Search::Vacant {parent, side} => self.attach(parent, side, key, default()),
        };

        &mut self.nodes[index].value
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if the
    /// key is not present
    ///
    /// # Examples
    ///
    /// ```
    /// use treemap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// *map.get_or_insert_default(10) = "x";
    /// assert_eq!(map.count(&10), 1);
    /// assert_eq!(map.get(&10), Some(&"x"));
    ///
    /// // Existing values are left alone
    /// assert_eq!(*map.get_or_insert_default(10), "x");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
        where V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Walks down from the root looking for `key`
    fn search<Q>(&self, key: &Q) -> Search
        where K: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let mut parent = Ptr::null();
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(index) = current.into_index() {
            let node = &self.nodes[index];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    side = Side::Left;
                    current = node.left;
                },

                Ordering::Greater => {
                    side = Side::Right;
                    current = node.right;
                },

                Ordering::Equal => return Search::Found(index),
            }
            parent = Ptr::to(index);
        }

        Search::Vacant {parent, side}
    }

    /// Pushes a new node into the arena and links it in at a position returned by `search`
    ///
    /// Returns the index of the new node.
    fn attach(&mut self, parent: Ptr, side: Side, key: K, value: V) -> usize {
        let index = self.nodes.len();
        // Since we store `Ptr` internally, we can't have usize::MAX as a valid index into the arena
        let ptr = match Ptr::new(index) {
            Some(ptr) => ptr,
            None => panic!("cannot have more than usize::MAX - 1 entries in a map"),
        };

        self.nodes.push(InnerNode::new(key, value, parent));

        match parent.into_index() {
            Some(parent) => self.nodes[parent].set_child(side, ptr),
            None => {
                debug_assert!(self.root.is_null());
                self.root = ptr;
            },
        }

        index
    }
}

/// Exchanges the contents of two maps in constant time
pub fn swap<K, V>(a: &mut TreeMap<K, V>, b: &mut TreeMap<K, V>) {
    a.swap(b)
}

impl<K, Q, V> Index<&Q> for TreeMap<K, V>
    where K: Borrow<Q> + Ord,
          Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key"),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    /// Inserts every pair, replacing the values of keys that are already present
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert_or_assign(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
impl<K: Ord, V> TreeMap<K, V> {
    /// Checks the BST property, the parent back-links, and that every node is reachable
    pub(crate) fn assert_invariants(&self) {
        let mut stack: Vec<(usize, Option<&K>, Option<&K>)> = Vec::new();
        match self.root.into_index() {
            Some(root) => {
                assert!(self.nodes[root].parent.is_null(), "root must not have a parent");
                stack.push((root, None, None));
            },
            None => assert!(self.nodes.is_empty()),
        }

        let mut reachable = 0;
        while let Some((index, lower, upper)) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[index];
            if let Some(lower) = lower {
                assert!(lower < &node.key, "left of an ancestor holds a larger key");
            }
            if let Some(upper) = upper {
                assert!(&node.key < upper, "right of an ancestor holds a smaller key");
            }

            if let Some(left) = node.left.into_index() {
                assert_eq!(self.nodes[left].parent, Ptr::to(index));
                stack.push((left, lower, Some(&node.key)));
            }
            if let Some(right) = node.right.into_index() {
                assert_eq!(self.nodes[right].parent, Ptr::to(index));
                stack.push((right, Some(&node.key), upper));
            }
        }

        assert_eq!(reachable, self.len());
    }
}

//! An ordered map with unique keys, backed by an unbalanced binary search tree.
//!
//! [`TreeMap`] supports point lookup, insertion with or without overwriting existing values, and
//! sorted traversal in both directions through a [`Cursor`](map::Cursor) or the usual iterators.
//! There is no way to remove a single entry and the tree is never rebalanced.
//!
//! # Features
//!
//! - `serde` : enables serialisation of [`TreeMap`] via the serde crate.

pub mod map;

pub use map::{TreeMap, swap};

/// Creates a [`TreeMap`] from a list of `key => value` pairs
///
/// Later pairs replace the values of earlier pairs with the same key.
#[macro_export(local_inner_macros)]
macro_rules! treemap {
    // trailing comma case
    ($($key:expr => $value:expr,)+) => (treemap!($($key => $value),+));

    ( $($key:expr => $value:expr),* ) => {
        {
            let mut _map = $crate::TreeMap::new();
            $(
                let _ = _map.insert_or_assign($key, $value);
            )*
            _map
        }
    };
}

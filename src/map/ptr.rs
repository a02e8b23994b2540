#[cfg(test)]
use std::mem;

#[cfg(test)]
use static_assertions::const_assert_eq;

/// An index into a map's node arena, or "null"
///
/// This type is essentially `Option<usize>`. The value usize::MAX is
/// reserved to represent `None` or "null".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct Ptr(usize);

// Every node stores three of these, so it is worth keeping them small
#[cfg(test)]
const_assert_eq!(mem::size_of::<Ptr>(), mem::size_of::<usize>());
// Using `Option<usize>` directly would use more space.
#[cfg(test)]
const_assert_eq!(mem::size_of::<Option<usize>>(), 2 * mem::size_of::<usize>());

impl Default for Ptr {
    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl Ptr {
    #[inline(always)]
    pub fn new(index: usize) -> Option<Self> {
        if index == usize::MAX {
            None
        } else {
            Some(Ptr(index))
        }
    }

    /// Creates a pointer to an index that is known to be a valid arena index
    #[inline(always)]
    pub fn to(index: usize) -> Self {
        debug_assert_ne!(index, usize::MAX);
        Ptr(index)
    }

    #[inline(always)]
    pub fn null() -> Self {
        Ptr(usize::MAX)
    }

    // Methods on this type must be `#[inline]` to help the compiler see that the `Option` values
    // are only intermediate values used to make writing code easier. Instead of checking for `None`
    // and then `usize::MAX`, we want the compiler to just check the latter.
    #[inline(always)]
    pub fn into_index(self) -> Option<usize> {
        let Ptr(index) = self;
        if index == usize::MAX {
            None
        } else {
            Some(index)
        }
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.0 == usize::MAX
    }
}

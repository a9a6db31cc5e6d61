//! Node link type for index-based trees.
//!
//! Tree nodes never point at each other directly. A link is a [`Key`] into
//! the tree's storage, and the reserved [`Key::NONE`] value plays the role
//! of the nil leaf (for red-black trees it is the shared black sentinel).

/// Index type used to link nodes stored in a [`Storage`](crate::Storage).
///
/// `NONE` is never handed out by storage, so it is free to mean "no child"
/// or "no parent".
///
/// # Example
///
/// ```
/// use nexus_ordered::Key;
///
/// let link: u32 = 7;
/// assert!(link.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::from_usize(7), link);
/// ```
///
/// A narrower key shrinks every node by a few bytes, at the cost of a
/// smaller maximum tree size:
///
/// ```
/// use nexus_ordered::{AvlTree, Natural, Tree, VecStorage};
///
/// let mut tree: AvlTree<u64, Natural, u16> = Tree::with_storage(VecStorage::new(), Natural);
/// tree.insert(1).unwrap();
/// assert_eq!(tree.len(), 1);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// The nil link.
    const NONE: Self;

    /// Builds a key from a slot position.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position this key addresses.
    fn as_usize(self) -> usize;

    /// Returns `true` for the nil link.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` for a link to an actual node.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Largest number of slots addressable without colliding with `NONE`.
    #[inline]
    fn max_slots() -> usize {
        Self::NONE.as_usize()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val < <$ty>::MAX as usize, "slot position overflows key type");
                    val as Self
                }

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);

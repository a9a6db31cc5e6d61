//! Unbalanced trees.
//!
//! [`Plain`] carries no per-node metadata and its hooks do nothing, so a
//! [`BsTree`](crate::BsTree) keeps exactly the shape insertion order
//! produces:
//!
//! ```
//! use nexus_ordered::BsTree;
//!
//! let mut tree: BsTree<u32> = BsTree::new();
//! for x in 1..=4 {
//!     tree.insert(x).unwrap();
//! }
//! // Ascending input builds a right spine.
//! assert_eq!(tree.height(), 4);
//! assert_eq!(tree.root(), Some(&1));
//! ```

use super::{Balance, Links, LinksMut, Removal};
use crate::Error;

/// No balancing: the tree takes whatever shape insertion order gives it.
///
/// Sorted input degrades it to a linked list. Useful as a baseline and when
/// input order is known to be random.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl Balance for Plain {
    type Meta = ();

    #[inline]
    fn fresh() {}

    #[inline]
    fn after_insert<L: LinksMut<Meta = ()>>(_links: &mut L, _node: L::Key) {}

    #[inline]
    fn after_remove<L: LinksMut<Meta = ()>>(_links: &mut L, _removal: Removal<L::Key, ()>) {}

    #[inline]
    fn validate<L: Links<Meta = ()>>(_links: &L) -> Result<(), Error> {
        Ok(())
    }
}

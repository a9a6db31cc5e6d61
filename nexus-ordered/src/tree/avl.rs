//! AVL balancing: every node's subtrees differ in height by at most one.
//!
//! Node metadata is the subtree height (leaf = 1, nil = 0). After a leaf is
//! linked or a node unlinked, heights are refreshed from the change point
//! up to the root, rotating wherever the balance factor reaches ±2:
//!
//! | Case | Heavy side | Child leans | Fix |
//! |------|------------|-------------|-----|
//! | LL | left | left or level | rotate right |
//! | LR | left | right | rotate child left, then right |
//! | RR | right | right or level | rotate left |
//! | RL | right | left | rotate child right, then left |

use super::{Balance, Links, LinksMut, Node, Removal, Tree, violation};
use crate::policy::Compare;
use crate::storage::Storage;
use crate::{Error, Key};

/// AVL balancer. Metadata: subtree height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Avl;

#[inline]
fn height<L: Links<Meta = u32>>(links: &L, node: L::Key) -> u32 {
    if node.is_none() { 0 } else { links.meta(node) }
}

#[inline]
fn balance_factor<L: Links<Meta = u32>>(links: &L, node: L::Key) -> i64 {
    height(links, links.left(node)) as i64 - height(links, links.right(node)) as i64
}

#[inline]
fn refresh<L: LinksMut<Meta = u32>>(links: &mut L, node: L::Key) {
    let h = 1 + height(links, links.left(node)).max(height(links, links.right(node)));
    links.set_meta(node, h);
}

/// Rebalances the subtree at `node`, whose children are already balanced.
/// Returns the subtree's new root.
fn rebalance<L: LinksMut<Meta = u32>>(links: &mut L, node: L::Key) -> L::Key {
    refresh(links, node);
    let bf = balance_factor(links, node);

    if bf > 1 {
        let left = links.left(node);
        if balance_factor(links, left) < 0 {
            let pivot = links.rotate_left(left);
            refresh(links, left);
            refresh(links, pivot);
        }
        let top = links.rotate_right(node);
        refresh(links, node);
        refresh(links, top);
        top
    } else if bf < -1 {
        let right = links.right(node);
        if balance_factor(links, right) > 0 {
            let pivot = links.rotate_right(right);
            refresh(links, right);
            refresh(links, pivot);
        }
        let top = links.rotate_left(node);
        refresh(links, node);
        refresh(links, top);
        top
    } else {
        node
    }
}

fn rebalance_upward<L: LinksMut<Meta = u32>>(links: &mut L, mut node: L::Key) {
    while node.is_some() {
        let top = rebalance(links, node);
        node = links.parent(top);
    }
}

impl Balance for Avl {
    type Meta = u32;

    #[inline]
    fn fresh() -> u32 {
        1
    }

    fn after_insert<L: LinksMut<Meta = u32>>(links: &mut L, node: L::Key) {
        let parent = links.parent(node);
        rebalance_upward(links, parent);
    }

    fn after_remove<L: LinksMut<Meta = u32>>(links: &mut L, removal: Removal<L::Key, u32>) {
        rebalance_upward(links, removal.parent);
    }

    fn validate<L: Links<Meta = u32>>(links: &L) -> Result<(), Error> {
        // Post-order: children are checked before the height they feed into.
        let mut node = links.first_postorder(links.root_key());
        while node.is_some() {
            let l = height(links, links.left(node));
            let r = height(links, links.right(node));
            if links.meta(node) != 1 + l.max(r) {
                return Err(violation("stored AVL height is stale"));
            }
            if l.abs_diff(r) > 1 {
                return Err(violation("AVL balance factor out of range"));
            }
            node = links.next_postorder(node);
        }
        Ok(())
    }
}

impl<T, C, K, S> Tree<T, Avl, C, K, S>
where
    C: Compare<T>,
    K: Key,
    S: Storage<Node<T, u32, K>, Key = K>,
{
    /// Balance factor (left height minus right height) of `key`'s node.
    pub fn balance_factor_of(&self, key: &T) -> Option<i64> {
        let node = self.locate(key);
        if node.is_none() {
            None
        } else {
            Some(balance_factor(&self.links(), node))
        }
    }
}

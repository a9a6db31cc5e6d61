//! Raw link access and rotations.
//!
//! Balancers see a tree only through [`Links`] (reads) and [`LinksMut`]
//! (writes): child/parent links and the per-node balance metadata. They
//! never touch element values, so the same rotation code serves every
//! variant.
//!
//! Neither trait is reachable from outside the crate. A tree hands its
//! balancer a link view it builds itself, so safe callers cannot rewire
//! nodes behind the tree's back.

use crate::Key;

/// Which child slot of a parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left child.
    Left,
    /// Right child.
    Right,
}

/// Read-only link view of a binary tree.
///
/// Accessors take real node keys; passing `Key::NONE` where a node is
/// expected is a bug in the caller and panics.
pub trait Links {
    /// Node link type.
    type Key: Key;
    /// Per-node balance metadata (height, color, ...).
    type Meta: Copy;

    /// Returns the root link (`NONE` when empty).
    fn root_key(&self) -> Self::Key;

    /// Left child of `node`.
    fn left(&self, node: Self::Key) -> Self::Key;

    /// Right child of `node`.
    fn right(&self, node: Self::Key) -> Self::Key;

    /// Parent of `node` (`NONE` for the root).
    fn parent(&self, node: Self::Key) -> Self::Key;

    /// Balance metadata of `node`.
    fn meta(&self, node: Self::Key) -> Self::Meta;

    /// Which side of its parent `node` is on, or `None` for the root.
    #[inline]
    fn side_of(&self, node: Self::Key) -> Option<Side> {
        let parent = self.parent(node);
        if parent.is_none() {
            None
        } else if self.left(parent) == node {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Leftmost node of the subtree at `node`.
    #[inline]
    fn leftmost(&self, mut node: Self::Key) -> Self::Key {
        while node.is_some() {
            let left = self.left(node);
            if left.is_none() {
                break;
            }
            node = left;
        }
        node
    }

    /// Rightmost node of the subtree at `node`.
    #[inline]
    fn rightmost(&self, mut node: Self::Key) -> Self::Key {
        while node.is_some() {
            let right = self.right(node);
            if right.is_none() {
                break;
            }
            node = right;
        }
        node
    }

    /// In-order successor of `node`.
    fn next(&self, node: Self::Key) -> Self::Key {
        let right = self.right(node);
        if right.is_some() {
            return self.leftmost(right);
        }
        let mut child = node;
        let mut parent = self.parent(child);
        while parent.is_some() && self.right(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order predecessor of `node`.
    fn prev(&self, node: Self::Key) -> Self::Key {
        let left = self.left(node);
        if left.is_some() {
            return self.rightmost(left);
        }
        let mut child = node;
        let mut parent = self.parent(child);
        while parent.is_some() && self.left(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// Pre-order successor of `node`.
    fn next_preorder(&self, node: Self::Key) -> Self::Key {
        let left = self.left(node);
        if left.is_some() {
            return left;
        }
        let right = self.right(node);
        if right.is_some() {
            return right;
        }
        // Climb until we arrive from a left child whose sibling exists.
        let mut child = node;
        let mut parent = self.parent(child);
        while parent.is_some() {
            let sibling = self.right(parent);
            if self.left(parent) == child && sibling.is_some() {
                return sibling;
            }
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// First node of the subtree at `node` in post-order.
    fn first_postorder(&self, mut node: Self::Key) -> Self::Key {
        while node.is_some() {
            let left = self.left(node);
            let next = if left.is_some() { left } else { self.right(node) };
            if next.is_none() {
                break;
            }
            node = next;
        }
        node
    }

    /// Post-order successor of `node`.
    ///
    /// Reads only `node`'s parent and that parent's links, so `node` may be
    /// freed right after this returns.
    fn next_postorder(&self, node: Self::Key) -> Self::Key {
        let parent = self.parent(node);
        if parent.is_none() {
            return parent;
        }
        let sibling = self.right(parent);
        if self.left(parent) == node && sibling.is_some() {
            self.first_postorder(sibling)
        } else {
            parent
        }
    }
}

/// Write access to the links of a binary tree.
///
/// The setters bypass ordering entirely. Only balancer hooks get one, and
/// only through a view the tree constructs for the duration of the hook.
pub trait LinksMut: Links {
    /// Replaces the root link.
    fn set_root_key(&mut self, root: Self::Key);

    /// Sets the left child of `node`. Does not touch the child's parent link.
    fn set_left(&mut self, node: Self::Key, child: Self::Key);

    /// Sets the right child of `node`. Does not touch the child's parent link.
    fn set_right(&mut self, node: Self::Key, child: Self::Key);

    /// Sets the parent link of `node`.
    fn set_parent(&mut self, node: Self::Key, parent: Self::Key);

    /// Sets the balance metadata of `node`.
    fn set_meta(&mut self, node: Self::Key, meta: Self::Meta);

    /// Points `parent`'s link that currently targets `old` at `new`.
    ///
    /// With `parent == NONE` the root is replaced. `new`'s parent link is
    /// left to the caller.
    #[inline]
    fn replace_child(&mut self, parent: Self::Key, old: Self::Key, new: Self::Key) {
        if parent.is_none() {
            self.set_root_key(new);
        } else if self.left(parent) == old {
            self.set_left(parent, new);
        } else {
            debug_assert!(self.right(parent) == old, "not a child of parent");
            self.set_right(parent, new);
        }
    }

    /// Rotates `node` down to the left; its right child takes its place.
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     =>     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    ///
    /// Returns the new subtree root (`y`). Metadata is not updated.
    fn rotate_left(&mut self, x: Self::Key) -> Self::Key {
        let y = self.right(x);
        debug_assert!(y.is_some(), "rotate_left without right child");
        let b = self.left(y);

        self.set_right(x, b);
        if b.is_some() {
            self.set_parent(b, x);
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.set_left(y, x);
        self.set_parent(x, y);
        y
    }

    /// Rotates `node` down to the right; its left child takes its place.
    ///
    /// Mirror image of [`rotate_left`](LinksMut::rotate_left).
    fn rotate_right(&mut self, x: Self::Key) -> Self::Key {
        let y = self.left(x);
        debug_assert!(y.is_some(), "rotate_right without left child");
        let b = self.right(y);

        self.set_left(x, b);
        if b.is_some() {
            self.set_parent(b, x);
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.set_right(y, x);
        self.set_parent(x, y);
        y
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A bare link table for exercising rotations without element storage.

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Entry {
        pub left: u32,
        pub right: u32,
        pub parent: u32,
        pub meta: u32,
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct Table {
        pub root: u32,
        pub nodes: Vec<Entry>,
    }

    impl Table {
        pub fn with_nodes(n: usize) -> Self {
            let nil = u32::NONE;
            Self {
                root: nil,
                nodes: vec![
                    Entry {
                        left: nil,
                        right: nil,
                        parent: nil,
                        meta: 0,
                    };
                    n
                ],
            }
        }

        /// Links `child` under `parent` on `side`, both directions.
        pub fn attach(&mut self, parent: u32, side: Side, child: u32) {
            match side {
                Side::Left => self.nodes[parent as usize].left = child,
                Side::Right => self.nodes[parent as usize].right = child,
            }
            self.nodes[child as usize].parent = parent;
        }

        pub fn in_order(&self) -> Vec<u32> {
            let mut out = Vec::new();
            let mut cur = self.leftmost(self.root);
            while cur.is_some() {
                out.push(cur);
                cur = self.next(cur);
            }
            out
        }
    }

    impl Links for Table {
        type Key = u32;
        type Meta = u32;

        fn root_key(&self) -> u32 {
            self.root
        }
        fn left(&self, node: u32) -> u32 {
            self.nodes[node as usize].left
        }
        fn right(&self, node: u32) -> u32 {
            self.nodes[node as usize].right
        }
        fn parent(&self, node: u32) -> u32 {
            self.nodes[node as usize].parent
        }
        fn meta(&self, node: u32) -> u32 {
            self.nodes[node as usize].meta
        }
    }

    impl LinksMut for Table {
        fn set_root_key(&mut self, root: u32) {
            self.root = root;
        }
        fn set_left(&mut self, node: u32, child: u32) {
            self.nodes[node as usize].left = child;
        }
        fn set_right(&mut self, node: u32, child: u32) {
            self.nodes[node as usize].right = child;
        }
        fn set_parent(&mut self, node: u32, parent: u32) {
            self.nodes[node as usize].parent = parent;
        }
        fn set_meta(&mut self, node: u32, meta: u32) {
            self.nodes[node as usize].meta = meta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Table;
    use super::*;

    /// Node ids are chosen so that in-order position == id:
    ///
    /// ```text
    ///       1
    ///      / \
    ///     0   3
    ///        / \
    ///       2   4
    /// ```
    fn right_heavy() -> Table {
        let mut t = Table::with_nodes(5);
        t.root = 1;
        t.attach(1, Side::Left, 0);
        t.attach(1, Side::Right, 3);
        t.attach(3, Side::Left, 2);
        t.attach(3, Side::Right, 4);
        t
    }

    #[test]
    fn rotate_left_at_root() {
        let mut t = right_heavy();
        let top = t.rotate_left(1);

        assert_eq!(top, 3);
        assert_eq!(t.root, 3);
        assert!(t.parent(3).is_none());
        assert_eq!(t.left(3), 1);
        assert_eq!(t.right(3), 4);
        assert_eq!(t.left(1), 0);
        assert_eq!(t.right(1), 2);
        assert_eq!(t.parent(2), 1);
        assert_eq!(t.parent(1), 3);
        assert_eq!(t.in_order(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rotations_are_inverse() {
        let mut t = right_heavy();
        let before = t.nodes.clone();

        let top = t.rotate_left(1);
        let back = t.rotate_right(top);

        assert_eq!(back, 1);
        assert_eq!(t.root, 1);
        assert_eq!(t.nodes, before);
    }

    #[test]
    fn rotate_below_root_rewires_parent() {
        let mut t = right_heavy();
        let top = t.rotate_right(3);

        assert_eq!(top, 2);
        assert_eq!(t.right(1), 2);
        assert_eq!(t.parent(2), 1);
        assert_eq!(t.right(2), 3);
        assert!(t.left(3).is_none());
        assert_eq!(t.in_order(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn next_and_prev_walk() {
        let t = right_heavy();
        assert_eq!(t.next(0), 1);
        assert_eq!(t.next(2), 3);
        assert!(t.next(4).is_none());
        assert_eq!(t.prev(2), 1);
        assert!(t.prev(0).is_none());
        assert_eq!(t.side_of(2), Some(Side::Left));
        assert_eq!(t.side_of(1), None);
    }

    fn walk(t: &Table, first: u32, step: impl Fn(&Table, u32) -> u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut cur = first;
        while cur.is_some() {
            out.push(cur);
            cur = step(t, cur);
        }
        out
    }

    #[test]
    fn preorder_and_postorder_walks() {
        let t = right_heavy();
        assert_eq!(walk(&t, t.root, |t, n| t.next_preorder(n)), vec![1, 0, 3, 2, 4]);
        assert_eq!(
            walk(&t, t.first_postorder(t.root), |t, n| t.next_postorder(n)),
            vec![0, 2, 4, 3, 1]
        );
    }
}

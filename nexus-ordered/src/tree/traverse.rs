//! Traversals and iteration.
//!
//! In-order, pre-order and post-order walks step along parent links and
//! allocate nothing. Level order needs a work queue; its reservation is
//! fallible.
//!
//! Callbacks get `&mut T` and may change anything about an element except
//! what its comparator looks at. Changing ordered content breaks the tree,
//! which [`Tree::validate`] will then report.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::{Balance, Links, Node, Tree};
use crate::storage::Storage;
use crate::{Error, Key};

impl<T, B, C, K, S> Tree<T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    /// Visits every element in ascending order.
    pub fn traverse_inorder<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cur = self.links().leftmost(self.root);
        while cur.is_some() {
            f(&mut self.node_mut(cur).value);
            cur = self.links().next(cur);
        }
    }

    /// Visits every element, each node before its subtrees.
    pub fn traverse_preorder<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cur = self.root;
        while cur.is_some() {
            f(&mut self.node_mut(cur).value);
            cur = self.links().next_preorder(cur);
        }
    }

    /// Visits every element, each node after its subtrees.
    pub fn traverse_postorder<F: FnMut(&mut T)>(&mut self, mut f: F) {
        let mut cur = self.links().first_postorder(self.root);
        while cur.is_some() {
            f(&mut self.node_mut(cur).value);
            cur = self.links().next_postorder(cur);
        }
    }

    /// Visits every element breadth-first, left to right within a level.
    ///
    /// # Errors
    ///
    /// [`Error::AllocFailed`] if the work queue cannot be reserved. No
    /// element has been visited in that case.
    pub fn traverse_level<F: FnMut(&mut T)>(&mut self, mut f: F) -> Result<(), Error> {
        if self.root.is_none() {
            return Ok(());
        }

        // The widest level of a binary tree holds at most half its nodes
        // (rounded up), which bounds the queue.
        let mut queue = VecDeque::new();
        if queue.try_reserve(self.len.div_ceil(2) + 1).is_err() {
            tracing::debug!(len = self.len, "level traversal: queue reservation failed");
            return Err(Error::AllocFailed);
        }

        queue.push_back(self.root);
        while let Some(cur) = queue.pop_front() {
            let node = self.node_mut(cur);
            f(&mut node.value);
            for child in [node.left, node.right] {
                if child.is_some() {
                    queue.push_back(child);
                }
            }
        }
        Ok(())
    }

    /// Ascending iterator over borrowed elements.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, B, C, K, S> {
        let links = self.links();
        Iter {
            tree: self,
            front: links.leftmost(self.root),
            back: links.rightmost(self.root),
            remaining: self.len,
        }
    }
}

/// In-order iterator over a [`Tree`], from either end.
pub struct Iter<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    tree: &'a Tree<T, B, C, K, S>,
    front: K,
    back: K,
    remaining: usize,
}

impl<'a, T, B, C, K, S> Iterator for Iter<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let cur = self.front;
        self.front = self.tree.links().next(cur);
        self.remaining -= 1;
        Some(&self.tree.node(cur).value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, B, C, K, S> DoubleEndedIterator for Iter<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let cur = self.back;
        self.back = self.tree.links().prev(cur);
        self.remaining -= 1;
        Some(&self.tree.node(cur).value)
    }
}

impl<T, B, C, K, S> ExactSizeIterator for Iter<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
}

impl<T, B, C, K, S> FusedIterator for Iter<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
}

impl<'a, T, B, C, K, S> IntoIterator for &'a Tree<T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, B, C, K, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, BsTree, RbTree};

    //        50
    //      /    \
    //    30      70
    //   /  \    /  \
    //  20  40  60  80
    //     /  \
    //    35  45
    fn sample() -> BsTree<i32> {
        let mut tree = BsTree::new();
        for v in [50, 30, 70, 20, 40, 60, 80, 35, 45] {
            tree.insert(v).unwrap();
        }
        tree
    }

    fn collect(
        tree: &mut BsTree<i32>,
        walk: fn(&mut BsTree<i32>, &mut dyn FnMut(&mut i32)),
    ) -> Vec<i32> {
        let mut out = Vec::new();
        walk(tree, &mut |v| out.push(*v));
        out
    }

    #[test]
    fn depth_first_orders() {
        let mut tree = sample();
        assert_eq!(
            collect(&mut tree, |t, f| t.traverse_inorder(f)),
            vec![20, 30, 35, 40, 45, 50, 60, 70, 80]
        );
        assert_eq!(
            collect(&mut tree, |t, f| t.traverse_preorder(f)),
            vec![50, 30, 20, 40, 35, 45, 70, 60, 80]
        );
        assert_eq!(
            collect(&mut tree, |t, f| t.traverse_postorder(f)),
            vec![20, 35, 45, 40, 30, 60, 80, 70, 50]
        );
    }

    #[test]
    fn level_order() {
        let mut tree = sample();
        let mut out = Vec::new();
        tree.traverse_level(|v| out.push(*v)).unwrap();
        assert_eq!(out, vec![50, 30, 70, 20, 40, 60, 80, 35, 45]);
    }

    #[test]
    fn traversals_of_empty_tree_visit_nothing() {
        let mut tree: RbTree<i32> = RbTree::new();
        let mut visits = 0;
        tree.traverse_inorder(|_| visits += 1);
        tree.traverse_preorder(|_| visits += 1);
        tree.traverse_postorder(|_| visits += 1);
        tree.traverse_level(|_| visits += 1).unwrap();
        assert_eq!(visits, 0);
    }

    #[test]
    fn callbacks_may_mutate_unordered_content() {
        let mut tree: AvlTree<(u32, u32), _> =
            crate::Tree::with_compare(|a: &(u32, u32), b: &(u32, u32)| a.0.cmp(&b.0));
        for k in 0..10 {
            tree.insert((k, 0)).unwrap();
        }
        tree.traverse_postorder(|(k, hits)| *hits = *k * 2);
        tree.validate().unwrap();
        assert_eq!(tree.find(&(7, 0)), Some(&(7, 14)));
    }

    #[test]
    fn iter_from_both_ends() {
        let tree = sample();
        let mut it = tree.iter();
        assert_eq!(it.len(), 9);
        assert_eq!(it.next(), Some(&20));
        assert_eq!(it.next_back(), Some(&80));
        assert_eq!(it.next_back(), Some(&70));
        assert_eq!(it.len(), 6);

        let rest: Vec<_> = it.copied().collect();
        assert_eq!(rest, vec![30, 35, 40, 45, 50, 60]);

        let rev: Vec<_> = tree.iter().rev().copied().collect();
        assert_eq!(rev, vec![80, 70, 60, 50, 45, 40, 35, 30, 20]);
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = sample();
        let mut it = tree.iter();
        let mut seen = Vec::new();
        loop {
            match (it.next(), it.next_back()) {
                (Some(a), Some(b)) => {
                    seen.push(*a);
                    seen.push(*b);
                }
                (Some(a), None) => seen.push(*a),
                _ => break,
            }
        }
        seen.sort();
        assert_eq!(seen, vec![20, 30, 35, 40, 45, 50, 60, 70, 80]);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn for_loop_over_reference() {
        let tree = sample();
        let mut total = 0;
        for v in &tree {
            total += v;
        }
        assert_eq!(total, 20 + 30 + 35 + 40 + 45 + 50 + 60 + 70 + 80);
    }
}

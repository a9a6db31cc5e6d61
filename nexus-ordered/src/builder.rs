//! Builders for trees and priority queues.
//!
//! A builder collects the value policy (comparator and release hook) and
//! sizing, then validates everything at once in `build`:
//!
//! ```
//! use nexus_ordered::{AvlTree, Error, TreeBuilder};
//!
//! let mut tree = TreeBuilder::red_black()
//!     .compare(|a: &i64, b: &i64| b.cmp(a))
//!     .capacity(64)
//!     .build()?;
//! tree.insert(1)?;
//! tree.insert(2)?;
//! assert_eq!(tree.min(), Some(&2));
//!
//! // No comparator chosen.
//! let missing: Result<AvlTree<u32>, Error> = TreeBuilder::avl().build();
//! assert_eq!(missing.err(), Some(Error::ComparatorMissing));
//! # Ok::<(), Error>(())
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::Error;
use crate::policy::{Compare, Natural, Release, ValuePolicy};
use crate::queue::PriorityQueue;
use crate::storage::{BoxedStorage, VecStorage};
use crate::tree::{Avl, Balance, Node, Plain, RedBlack, Tree};

// =============================================================================
// TreeBuilder
// =============================================================================

/// Builder for [`Tree`].
///
/// Pick a balancer with [`avl`](TreeBuilder::avl),
/// [`red_black`](TreeBuilder::red_black) or [`plain`](TreeBuilder::plain),
/// then a comparator with [`natural`](TreeBuilder::natural) or
/// [`compare`](TreeBuilder::compare).
pub struct TreeBuilder<T, B, C = Natural> {
    compare: Option<C>,
    release: Option<Release<T>>,
    capacity: Option<usize>,
    _balance: PhantomData<B>,
}

/// Tree produced by [`TreeBuilder::build`].
pub type BuiltTree<T, B, C> =
    Tree<T, B, C, u32, VecStorage<Node<T, <B as Balance>::Meta, u32>, u32>>;

/// Tree produced by [`TreeBuilder::build_bounded`].
pub type BuiltBoundedTree<T, B, C> =
    Tree<T, B, C, u32, BoxedStorage<Node<T, <B as Balance>::Meta, u32>, u32>>;

impl<T, B: Balance> TreeBuilder<T, B> {
    /// Builder with no comparator, hook or capacity set.
    pub fn new() -> Self {
        Self {
            compare: None,
            release: None,
            capacity: None,
            _balance: PhantomData,
        }
    }
}

impl<T, B: Balance> Default for TreeBuilder<T, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T, Avl> {
    /// Builder for an AVL tree.
    pub fn avl() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T, RedBlack> {
    /// Builder for a red-black tree.
    pub fn red_black() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T, Plain> {
    /// Builder for an unbalanced search tree.
    pub fn plain() -> Self {
        Self::new()
    }
}

impl<T, B: Balance, C> TreeBuilder<T, B, C> {
    /// Orders elements by their `Ord` implementation.
    pub fn natural(self) -> TreeBuilder<T, B, Natural>
    where
        T: Ord,
    {
        self.compare(Natural)
    }

    /// Orders elements with `compare`.
    pub fn compare<C2: Compare<T>>(self, compare: C2) -> TreeBuilder<T, B, C2> {
        TreeBuilder {
            compare: Some(compare),
            release: self.release,
            capacity: self.capacity,
            _balance: PhantomData,
        }
    }

    /// Runs `hook` on each element the tree disposes of itself.
    pub fn release<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + Send + 'static,
    {
        self.release = Some(Release::new(hook));
        self
    }

    /// Node slots to reserve up front.
    ///
    /// A hint for [`build`](Self::build); the hard limit for
    /// [`build_bounded`](Self::build_bounded).
    pub fn capacity(mut self, nodes: usize) -> Self {
        self.capacity = Some(nodes);
        self
    }

    fn policy(&mut self) -> Result<ValuePolicy<T, C>, Error> {
        match self.compare.take() {
            Some(compare) => Ok(ValuePolicy::with_release(compare, self.release.take())),
            None => {
                tracing::debug!("tree builder: no comparator chosen");
                Err(Error::ComparatorMissing)
            }
        }
    }
}

impl<T, B: Balance, C: Compare<T>> TreeBuilder<T, B, C> {
    /// Builds a tree with growable storage.
    ///
    /// # Errors
    ///
    /// - [`Error::ComparatorMissing`] if no comparator was chosen
    /// - [`Error::AllocFailed`] if the capacity hint cannot be reserved
    pub fn build(mut self) -> Result<BuiltTree<T, B, C>, Error> {
        let policy = self.policy()?;
        let storage = match self.capacity {
            Some(nodes) => VecStorage::try_with_capacity(nodes).map_err(|_| {
                tracing::debug!(nodes, "tree builder: reservation failed");
                Error::AllocFailed
            })?,
            None => VecStorage::new(),
        };
        Ok(Tree::with_policy(storage, policy))
    }

    /// Builds a tree holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// - [`Error::ComparatorMissing`] if no comparator was chosen
    /// - [`Error::InvalidInput`] if the capacity is unset, zero, or beyond
    ///   what a `u32` link can address
    /// - [`Error::AllocFailed`] if the capacity cannot be reserved
    pub fn build_bounded(mut self) -> Result<BuiltBoundedTree<T, B, C>, Error> {
        let policy = self.policy()?;
        let nodes = match self.capacity {
            Some(nodes) if nodes > 0 && nodes <= <u32 as crate::Key>::max_slots() => nodes,
            capacity => {
                tracing::debug!(?capacity, "tree builder: unusable bounded capacity");
                return Err(Error::InvalidInput);
            }
        };
        let storage = BoxedStorage::try_with_capacity(nodes).map_err(|_| {
            tracing::debug!(nodes, "tree builder: reservation failed");
            Error::AllocFailed
        })?;
        Ok(Tree::with_policy(storage, policy))
    }
}

impl<T, B, C: fmt::Debug> fmt::Debug for TreeBuilder<T, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("compare", &self.compare)
            .field("release", &self.release)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// =============================================================================
// QueueBuilder
// =============================================================================

/// Builder for [`PriorityQueue`].
///
/// ```
/// use nexus_ordered::{PriorityQueue, Reversed, Natural};
///
/// // Lowest priority first.
/// let mut queue = PriorityQueue::builder(4)
///     .priority_compare(Reversed(Natural))
///     .value_compare(|a: &&str, b: &&str| a.cmp(b))
///     .build()
///     .unwrap();
/// queue.push(2u8, "two").unwrap();
/// queue.push(1u8, "one").unwrap();
/// assert_eq!(queue.top(), Some(&"one"));
/// ```
pub struct QueueBuilder<P, V, CP = Natural, CV = Natural> {
    capacity: usize,
    priority: Option<CP>,
    value: Option<CV>,
    release_priority: Option<Release<P>>,
    release_value: Option<Release<V>>,
}

impl<P, V> QueueBuilder<P, V> {
    /// Builder for a queue of `capacity` pairs, with no comparators set.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            priority: None,
            value: None,
            release_priority: None,
            release_value: None,
        }
    }

    /// Orders priorities and matches values by their `Ord` implementations.
    pub fn natural(mut self) -> Self
    where
        P: Ord,
        V: Ord,
    {
        self.priority = Some(Natural);
        self.value = Some(Natural);
        self
    }
}

impl<P, V, CP, CV> QueueBuilder<P, V, CP, CV> {
    /// Orders priorities with `compare`; larger pops first.
    pub fn priority_compare<C2: Compare<P>>(self, compare: C2) -> QueueBuilder<P, V, C2, CV> {
        QueueBuilder {
            capacity: self.capacity,
            priority: Some(compare),
            value: self.value,
            release_priority: self.release_priority,
            release_value: self.release_value,
        }
    }

    /// Matches values with `compare` in
    /// [`find_index`](PriorityQueue::find_index).
    pub fn value_compare<C2: Compare<V>>(self, compare: C2) -> QueueBuilder<P, V, CP, C2> {
        QueueBuilder {
            capacity: self.capacity,
            priority: self.priority,
            value: Some(compare),
            release_priority: self.release_priority,
            release_value: self.release_value,
        }
    }

    /// Runs `hook` on each priority the queue disposes of itself.
    pub fn release_priority<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut P) + Send + 'static,
    {
        self.release_priority = Some(Release::new(hook));
        self
    }

    /// Runs `hook` on each value the queue disposes of itself.
    pub fn release_value<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut V) + Send + 'static,
    {
        self.release_value = Some(Release::new(hook));
        self
    }

    /// Replaces the capacity.
    pub fn capacity(mut self, pairs: usize) -> Self {
        self.capacity = pairs;
        self
    }
}

impl<P, V, CP: Compare<P>, CV: Compare<V>> QueueBuilder<P, V, CP, CV> {
    /// Builds the queue.
    ///
    /// # Errors
    ///
    /// - [`Error::ComparatorMissing`] if either comparator is unset
    /// - [`Error::InvalidInput`] if the capacity is zero
    /// - [`Error::AllocFailed`] if the capacity cannot be reserved
    pub fn build(self) -> Result<PriorityQueue<P, V, CP, CV>, Error> {
        let (Some(priority), Some(value)) = (self.priority, self.value) else {
            tracing::debug!("queue builder: comparator missing");
            return Err(Error::ComparatorMissing);
        };
        PriorityQueue::with_policies(
            self.capacity,
            ValuePolicy::with_release(priority, self.release_priority),
            ValuePolicy::with_release(value, self.release_value),
        )
    }
}

impl<P, V, CP: fmt::Debug, CV: fmt::Debug> fmt::Debug for QueueBuilder<P, V, CP, CV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueBuilder")
            .field("capacity", &self.capacity)
            .field("priority", &self.priority)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Reversed};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn natural_avl() {
        let mut tree = TreeBuilder::avl().natural().build().unwrap();
        for v in [3, 1, 2] {
            tree.insert(v).unwrap();
        }
        assert_eq!(tree.root(), Some(&2));
        tree.validate().unwrap();
    }

    #[test]
    fn comparator_is_required() {
        let tree = TreeBuilder::<i32, RedBlack>::new().build();
        assert_eq!(tree.err(), Some(Error::ComparatorMissing));

        let queue = QueueBuilder::<u8, u8>::new(4).build();
        assert_eq!(queue.err(), Some(Error::ComparatorMissing));

        let half = QueueBuilder::<u8, u8>::new(4)
            .priority_compare(Natural)
            .build();
        assert_eq!(half.err(), Some(Error::ComparatorMissing));
    }

    #[test]
    fn bounded_capacity_is_checked() {
        let unset = TreeBuilder::<i32, Plain>::plain().natural().build_bounded();
        assert_eq!(unset.err(), Some(Error::InvalidInput));

        let zero = TreeBuilder::<i32, Plain>::plain()
            .natural()
            .capacity(0)
            .build_bounded();
        assert_eq!(zero.err(), Some(Error::InvalidInput));

        let mut tree = TreeBuilder::red_black()
            .natural()
            .capacity(2)
            .build_bounded()
            .unwrap();
        tree.insert(1).unwrap();
        tree.insert(2).unwrap();
        assert_eq!(tree.insert(3), Err(Error::AllocFailed));
        assert_eq!(tree.color_of(&1), Some(Color::Black));
    }

    #[test]
    fn tree_release_hook_is_wired() {
        let released = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&released);
        let mut tree = TreeBuilder::avl()
            .natural()
            .release(move |_: &mut String| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .build()
            .unwrap();
        tree.insert(String::from("a")).unwrap();
        tree.insert(String::from("b")).unwrap();
        tree.delete(&String::from("a")).unwrap();
        assert_eq!(released.load(Ordering::Relaxed), 1);
        drop(tree);
        assert_eq!(released.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn queue_builder_zero_capacity() {
        let queue = QueueBuilder::<u8, u8>::new(0).natural().build();
        assert_eq!(queue.err(), Some(Error::InvalidInput));
    }

    #[test]
    fn queue_builder_natural_and_hooks() {
        let released = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&released);
        let mut queue = PriorityQueue::builder(2)
            .natural()
            .release_priority(move |_: &mut u32| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .build()
            .unwrap();
        queue.push(1u32, 'a').unwrap();
        queue.push(2u32, 'b').unwrap();
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.top(), Some(&'b'));
        queue.clear();
        assert_eq!(released.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn reversed_priorities_pop_smallest() {
        let mut queue = QueueBuilder::new(3)
            .natural()
            .priority_compare(Reversed(Natural))
            .build()
            .unwrap();
        queue.push(5i32, 50i32).unwrap();
        queue.push(1, 10).unwrap();
        assert_eq!(queue.pop(), Ok((1, 10)));
    }
}

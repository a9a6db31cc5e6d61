//! Bounded max priority queue of `(priority, value)` pairs.
//!
//! A binary max-heap laid out as two parallel arrays, one for priorities
//! and one for values, so index `i` names a pair. Capacity is fixed when
//! the queue is built and never grows.
//!
//! Sifting uses strict comparisons: an entry only moves past a neighbor
//! whose priority is strictly lower (sifting up) or strictly higher
//! (sifting down). Equal priorities never trade places.
//!
//! The heap alone does not make equal priorities pop first-in first-out.
//! When that matters, fold an insertion counter into the priority:
//!
//! ```
//! use std::cmp::Reverse;
//! use nexus_ordered::PriorityQueue;
//!
//! // Lower sequence number wins among equal priorities.
//! let mut queue: PriorityQueue<(u8, Reverse<u64>), &str> =
//!     PriorityQueue::with_capacity(4).unwrap();
//! for (seq, (p, v)) in [(1, "x"), (2, "y"), (1, "z")].into_iter().enumerate() {
//!     queue.push((p, Reverse(seq as u64)), v).unwrap();
//! }
//!
//! let order: Vec<_> = std::iter::from_fn(|| queue.pop().ok().map(|(_, v)| v)).collect();
//! assert_eq!(order, ["y", "x", "z"]);
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::Error;
use crate::builder::QueueBuilder;
use crate::error::violation;
use crate::policy::{Compare, Natural, ValuePolicy};

/// A bounded max-heap keyed by priority.
///
/// - `P`: priority type, ordered by `CP`
/// - `V`: value type, matched by `CV` in [`find_index`](Self::find_index)
///
/// # Example
///
/// ```
/// use nexus_ordered::PriorityQueue;
///
/// let mut queue: PriorityQueue<u32, &str> = PriorityQueue::with_capacity(8).unwrap();
/// queue.push(3, "a").unwrap();
/// queue.push(5, "b").unwrap();
/// queue.push(1, "c").unwrap();
///
/// assert_eq!(queue.top(), Some(&"b"));
///
/// // Bump "c" above everything else.
/// let at = queue.find_index(&"c").unwrap();
/// queue.change_priority(at, 9).unwrap();
///
/// assert_eq!(queue.pop(), Ok((9, "c")));
/// assert_eq!(queue.pop(), Ok((5, "b")));
/// ```
pub struct PriorityQueue<P, V, CP = Natural, CV = Natural> {
    priorities: Vec<P>,
    values: Vec<V>,
    capacity: usize,
    priority: ValuePolicy<P, CP>,
    value: ValuePolicy<V, CV>,
}

impl<P, V, CP, CV> PriorityQueue<P, V, CP, CV> {
    /// Number of queued pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    /// Maximum number of pairs.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// Returns `true` if a push would fail.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Value with the highest priority.
    #[inline]
    pub fn top(&self) -> Option<&V> {
        self.values.first()
    }

    /// The highest priority.
    #[inline]
    pub fn top_priority(&self) -> Option<&P> {
        self.priorities.first()
    }

    /// The highest-priority pair.
    #[inline]
    pub fn peek(&self) -> Option<(&P, &V)> {
        self.priorities.first().zip(self.values.first())
    }

    /// Visits every pair in array order, which is not sorted order.
    ///
    /// The callback may change values freely; priorities are read-only since
    /// changing one in place would break the heap.
    pub fn traverse<F: FnMut(&P, &mut V)>(&mut self, mut f: F) {
        for (p, v) in self.priorities.iter().zip(self.values.iter_mut()) {
            f(p, v);
        }
    }

    /// Pairs in array order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&P, &V)> + '_ {
        self.priorities.iter().zip(self.values.iter())
    }

    /// Replaces the value at `index`, returning the old one.
    ///
    /// The priority is unchanged, so the heap is not touched.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index >= len()`.
    pub fn change_value(&mut self, index: usize, value: V) -> Result<V, Error> {
        let len = self.len();
        match self.values.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, value)),
            None => {
                tracing::debug!(index, len, "change_value: index out of range");
                Err(Error::OutOfRange)
            }
        }
    }

    /// Removes every pair, running the release hooks on each.
    pub fn clear(&mut self) {
        for p in self.priorities.drain(..) {
            self.priority.release(p);
        }
        for v in self.values.drain(..) {
            self.value.release(v);
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.priorities.swap(a, b);
        self.values.swap(a, b);
    }
}

impl<P, V, CP, CV> PriorityQueue<P, V, CP, CV>
where
    CP: Compare<P> + Default,
    CV: Compare<V> + Default,
{
    /// Creates an empty queue holding at most `capacity` pairs.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `capacity` is 0
    /// - [`Error::AllocFailed`] if the arrays cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_policies(
            capacity,
            ValuePolicy::new(CP::default()),
            ValuePolicy::new(CV::default()),
        )
    }
}

impl<P, V> PriorityQueue<P, V> {
    /// Starts configuring a queue of `capacity` pairs.
    pub fn builder(capacity: usize) -> QueueBuilder<P, V> {
        QueueBuilder::new(capacity)
    }
}

impl<P, V, CP, CV> PriorityQueue<P, V, CP, CV>
where
    CP: Compare<P>,
    CV: Compare<V>,
{
    /// Creates an empty queue with explicit comparators.
    ///
    /// # Errors
    ///
    /// Same as [`with_capacity`](Self::with_capacity).
    pub fn with_comparators(capacity: usize, priority: CP, value: CV) -> Result<Self, Error> {
        Self::with_policies(capacity, ValuePolicy::new(priority), ValuePolicy::new(value))
    }

    /// Creates an empty queue from full value policies.
    ///
    /// # Errors
    ///
    /// Same as [`with_capacity`](Self::with_capacity).
    pub fn with_policies(
        capacity: usize,
        priority: ValuePolicy<P, CP>,
        value: ValuePolicy<V, CV>,
    ) -> Result<Self, Error> {
        if capacity == 0 {
            tracing::debug!("priority queue: zero capacity");
            return Err(Error::InvalidInput);
        }

        let mut priorities = Vec::new();
        let mut values = Vec::new();
        if priorities.try_reserve_exact(capacity).is_err()
            || values.try_reserve_exact(capacity).is_err()
        {
            tracing::debug!(capacity, "priority queue: reservation failed");
            return Err(Error::AllocFailed);
        }

        Ok(Self {
            priorities,
            values,
            capacity,
            priority,
            value,
        })
    }

    /// Queues a pair.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the queue is full. The pair is dropped
    /// without running release hooks, as it was never queued.
    pub fn push(&mut self, priority: P, value: V) -> Result<(), Error> {
        if self.is_full() {
            tracing::debug!(capacity = self.capacity, "push rejected: queue is full");
            return Err(Error::CapacityExceeded);
        }

        self.priorities.push(priority);
        self.values.push(value);
        self.sift_up(self.len() - 1);
        Ok(())
    }

    /// Removes the highest-priority pair.
    ///
    /// Ownership passes to the caller; release hooks do not run.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nothing is queued.
    pub fn pop(&mut self) -> Result<(P, V), Error> {
        if self.is_empty() {
            tracing::debug!("pop rejected: queue is empty");
            return Err(Error::Empty);
        }

        let last = self.len() - 1;
        self.swap(0, last);
        let (Some(p), Some(v)) = (self.priorities.pop(), self.values.pop()) else {
            unreachable!("parallel arrays out of step");
        };
        self.sift_down(0);
        Ok((p, v))
    }

    /// Index of the first pair, in array order, whose value compares equal
    /// to `value`.
    pub fn find_index(&self, value: &V) -> Option<usize> {
        self.values
            .iter()
            .position(|v| self.value.compare(v, value) == Ordering::Equal)
    }

    /// Replaces the priority at `index` and restores heap order, returning
    /// the old priority.
    ///
    /// A raised priority sifts up, a lowered one sifts down.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index >= len()`.
    pub fn change_priority(&mut self, index: usize, priority: P) -> Result<P, Error> {
        let len = self.len();
        let Some(slot) = self.priorities.get_mut(index) else {
            tracing::debug!(index, len, "change_priority: index out of range");
            return Err(Error::OutOfRange);
        };
        let old = core::mem::replace(slot, priority);

        match self.priority.compare(&self.priorities[index], &old) {
            Ordering::Greater => self.sift_up(index),
            Ordering::Less => self.sift_down(index),
            Ordering::Equal => {}
        }
        Ok(old)
    }

    /// Checks the heap property over every parent/child pair.
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] on the first child that outranks its
    /// parent.
    pub fn validate(&self) -> Result<(), Error> {
        if self.priorities.len() != self.values.len() {
            return Err(violation("priority and value arrays differ in length"));
        }
        if self.len() > self.capacity {
            return Err(violation("queue holds more than its capacity"));
        }
        for child in 1..self.len() {
            let parent = (child - 1) / 2;
            if self.outranks(child, parent) {
                return Err(violation("child priority above parent"));
            }
        }
        Ok(())
    }

    /// Strictly higher priority at `a` than at `b`.
    #[inline]
    fn outranks(&self, a: usize, b: usize) -> bool {
        self.priority
            .compare(&self.priorities[a], &self.priorities[b])
            .is_gt()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.outranks(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;

            // Ties between children go left.
            let larger = if right < len && self.outranks(right, left) {
                right
            } else {
                left
            };

            if !self.outranks(larger, pos) {
                break;
            }
            self.swap(pos, larger);
            pos = larger;
        }
    }
}

impl<P, V, CP, CV> Drop for PriorityQueue<P, V, CP, CV> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<P: fmt::Debug, V: fmt::Debug, CP, CV> fmt::Debug for PriorityQueue<P, V, CP, CV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("top", &self.peek())
            .finish()
    }
}

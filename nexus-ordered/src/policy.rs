//! Value policy: how a container orders and disposes of its elements.
//!
//! Every container is built with a [`ValuePolicy`], fixed for its lifetime:
//!
//! - a [`Compare`] implementation defining a total order, and
//! - an optional [`Release`] hook run on each element the container
//!   disposes of itself (delete, clear, drop), right before the element's
//!   own `Drop`.
//!
//! Element size is simply `size_of::<T>()`; copying an element in is a move.
//!
//! # Records with a tiebreaker
//!
//! Ordered trees reject comparator-equal elements. When records are keyed
//! by a field that is not unique (say, a student's grade), a common idiom is
//! to break ties on a unique secondary field so every record is distinct:
//!
//! ```
//! use core::cmp::Ordering;
//! use nexus_ordered::{AvlTree, Tree};
//!
//! struct Student {
//!     grade: u32,
//!     index: u32,
//! }
//!
//! let by_grade = |a: &Student, b: &Student| {
//!     a.grade.cmp(&b.grade).then(a.index.cmp(&b.index))
//! };
//!
//! let mut tree: AvlTree<Student, _> = Tree::with_compare(by_grade);
//! tree.insert(Student { grade: 90, index: 0 }).unwrap();
//! tree.insert(Student { grade: 90, index: 1 }).unwrap();
//! assert_eq!(tree.len(), 2);
//! ```

use core::cmp::Ordering;
use core::fmt;

/// A total order over `T`.
///
/// Must be deterministic, antisymmetric and transitive. Containers treat
/// `Ordering::Equal` as "same element".
///
/// Implemented for [`Natural`], [`Reversed`], the comparators in
/// [`compare`](crate::compare), and any `Fn(&T, &T) -> Ordering`.
pub trait Compare<T: ?Sized> {
    /// Compares two elements.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders elements by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// ```
/// use nexus_ordered::{Compare, Natural, Reversed};
/// use core::cmp::Ordering;
///
/// assert_eq!(Reversed(Natural).compare(&1, &2), Ordering::Greater);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Hook run on an element right before the container drops it.
///
/// The hook may touch only the element it is given.
pub struct Release<T> {
    hook: Box<dyn FnMut(&mut T) + Send>,
}

impl<T> Release<T> {
    /// Wraps a release hook.
    pub fn new<F>(hook: F) -> Self
    where
        F: FnMut(&mut T) + Send + 'static,
    {
        Self {
            hook: Box::new(hook),
        }
    }

    /// Runs the hook on `value`.
    #[inline]
    pub fn run(&mut self, value: &mut T) {
        (self.hook)(value);
    }
}

impl<T> fmt::Debug for Release<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Release(..)")
    }
}

/// Per-container element rules.
#[derive(Debug)]
pub struct ValuePolicy<T, C> {
    compare: C,
    release: Option<Release<T>>,
}

impl<T, C> ValuePolicy<T, C> {
    /// Policy with the given comparator and no release hook.
    pub fn new(compare: C) -> Self {
        Self {
            compare,
            release: None,
        }
    }

    /// Policy with a comparator and an optional release hook.
    pub fn with_release(compare: C, release: Option<Release<T>>) -> Self {
        Self { compare, release }
    }

    /// Returns the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns `true` if a release hook is installed.
    #[inline]
    pub fn has_release(&self) -> bool {
        self.release.is_some()
    }

    /// Disposes of an element the container is done with.
    #[inline]
    pub fn release(&mut self, mut value: T) {
        if let Some(release) = &mut self.release {
            release.run(&mut value);
        }
        drop(value);
    }
}

impl<T, C: Compare<T>> ValuePolicy<T, C> {
    /// Compares two elements under this policy.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare.compare(a, b)
    }
}

impl<T, C: Compare<T> + Default> Default for ValuePolicy<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    #[test]
    fn natural_and_reversed() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Reversed(Natural).compare(&1, &2), Ordering::Greater);
        assert_eq!(Reversed(Reversed(Natural)).compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn closures_compare() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(by_len.compare(&"aaa", &"b"), Ordering::Greater);
    }

    #[test]
    fn release_hook_runs_once_per_element() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut policy = ValuePolicy::with_release(
            Natural,
            Some(Release::new(move |_: &mut u32| {
                seen.fetch_add(1, AtomicOrdering::Relaxed);
            })),
        );

        assert!(policy.has_release());
        policy.release(1);
        policy.release(2);
        assert_eq!(count.load(AtomicOrdering::Relaxed), 2);
    }

    #[test]
    fn release_without_hook_just_drops() {
        let mut policy: ValuePolicy<String, Natural> = ValuePolicy::default();
        assert!(!policy.has_release());
        policy.release(String::from("gone"));
    }

    #[test]
    fn tiebreaker_makes_records_distinct() {
        #[derive(Debug)]
        struct Record {
            grade: u32,
            index: u32,
        }

        let policy = ValuePolicy::new(|a: &Record, b: &Record| {
            a.grade.cmp(&b.grade).then(a.index.cmp(&b.index))
        });
        let a = Record { grade: 70, index: 0 };
        let b = Record { grade: 70, index: 1 };
        assert_eq!(policy.compare(&a, &b), Ordering::Less);
        assert_eq!(policy.compare(&a, &a), Ordering::Equal);
    }
}

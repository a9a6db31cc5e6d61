//! In-place sorting and searching over slices, driven by a [`Compare`].
//!
//! - [`quicksort_by`]: not stable, except that already-sorted input is
//!   left untouched
//! - [`heapsort_by`]: in-place max-heap, ascending under the comparator
//!   (pass [`Reversed`](crate::Reversed) for descending)
//! - [`binary_search_by`]: the slice must be sorted under the same
//!   comparator, otherwise the answer is meaningless (but memory safe)
//! - [`reverse`]: element-wise swap
//!
//! ```
//! use nexus_ordered::sort::{binary_search, quicksort};
//!
//! let mut v = [40, 15, 27, 9, 27, 3, 88];
//! quicksort(&mut v);
//! assert_eq!(v, [3, 9, 15, 27, 27, 40, 88]);
//! assert_eq!(binary_search(&v, &27), Some(&27));
//! assert_eq!(binary_search(&v, &26), None);
//! ```

use core::cmp::Ordering;
use core::mem;

use crate::policy::{Compare, Natural};

/// Sorts `v` ascending by `Ord`. See [`quicksort_by`].
pub fn quicksort<T: Ord>(v: &mut [T]) {
    quicksort_by(v, &Natural);
}

/// Sorts `v` ascending under `compare`.
///
/// Partitions three ways around the middle element, so runs of equal keys
/// are settled in one pass and never recursed into. Recurses into the
/// smaller side only, looping on the larger, so stack depth stays
/// logarithmic. Input that is already sorted is detected up front and not
/// reordered.
pub fn quicksort_by<T, C>(v: &mut [T], compare: &C)
where
    C: Compare<T> + ?Sized,
{
    if is_sorted_by(v, compare) {
        return;
    }
    quicksort_range(v, compare);
}

fn quicksort_range<T, C>(mut v: &mut [T], compare: &C)
where
    C: Compare<T> + ?Sized,
{
    while v.len() > 1 {
        let (lt, gt) = partition(v, compare);
        let (left, rest) = mem::take(&mut v).split_at_mut(lt);
        let right = &mut rest[gt - lt..];
        if left.len() < right.len() {
            quicksort_range(left, compare);
            v = right;
        } else {
            quicksort_range(right, compare);
            v = left;
        }
    }
}

/// Three-way partition with the middle element as pivot.
///
/// Returns `(lt, gt)` such that `v[..lt]` compares less than the pivot,
/// `v[lt..gt]` equal to it and `v[gt..]` greater.
fn partition<T, C>(v: &mut [T], compare: &C) -> (usize, usize)
where
    C: Compare<T> + ?Sized,
{
    // The pivot sits at 0 while the rest is scanned:
    // [pivot | < | == | unscanned | >]
    v.swap(0, v.len() / 2);
    let mut lt = 1;
    let mut i = 1;
    let mut gt = v.len();
    while i < gt {
        match compare.compare(&v[i], &v[0]) {
            Ordering::Less => {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                v.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    lt -= 1;
    v.swap(0, lt);
    (lt, gt)
}

/// Returns `true` if no adjacent pair of `v` is out of order.
pub fn is_sorted_by<T, C>(v: &[T], compare: &C) -> bool
where
    C: Compare<T> + ?Sized,
{
    v.windows(2)
        .all(|w| compare.compare(&w[0], &w[1]) != Ordering::Greater)
}

/// Sorts `v` ascending by `Ord`. See [`heapsort_by`].
pub fn heapsort<T: Ord>(v: &mut [T]) {
    heapsort_by(v, &Natural);
}

/// Sorts `v` ascending under `compare` with an in-place max-heap.
pub fn heapsort_by<T, C>(v: &mut [T], compare: &C)
where
    C: Compare<T> + ?Sized,
{
    let len = v.len();
    for start in (0..len / 2).rev() {
        sift_down(v, start, len, compare);
    }
    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(v, 0, end, compare);
    }
}

/// Sinks `v[pos]` within `v[..end]` until neither child is strictly larger.
fn sift_down<T, C>(v: &mut [T], mut pos: usize, end: usize, compare: &C)
where
    C: Compare<T> + ?Sized,
{
    loop {
        let left = 2 * pos + 1;
        if left >= end {
            break;
        }
        let right = left + 1;
        let larger = if right < end && compare.compare(&v[right], &v[left]) == Ordering::Greater {
            right
        } else {
            left
        };
        if compare.compare(&v[larger], &v[pos]) != Ordering::Greater {
            break;
        }
        v.swap(pos, larger);
        pos = larger;
    }
}

/// Finds an element equal to `key` in `v`, sorted by `Ord`.
pub fn binary_search<'a, T: Ord>(v: &'a [T], key: &T) -> Option<&'a T> {
    binary_search_by(v, key, &Natural)
}

/// Finds an element comparing equal to `key` in `v`, which must be sorted
/// under `compare`. Which one is returned among several equal elements is
/// unspecified.
pub fn binary_search_by<'a, T, C>(v: &'a [T], key: &T, compare: &C) -> Option<&'a T>
where
    C: Compare<T> + ?Sized,
{
    let mut lo = 0;
    let mut hi = v.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match compare.compare(&v[mid], key) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Some(&v[mid]),
        }
    }
    None
}

/// Reverses `v` in place.
pub fn reverse<T>(v: &mut [T]) {
    let len = v.len();
    for i in 0..len / 2 {
        v.swap(i, len - 1 - i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reversed;
    use crate::compare::Ints;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn quicksort_small_cases() {
        let mut empty: [i32; 0] = [];
        quicksort(&mut empty);

        let mut one = [1];
        quicksort(&mut one);
        assert_eq!(one, [1]);

        let mut dups = [2, 2, 1, 1, 2, 1];
        quicksort(&mut dups);
        assert_eq!(dups, [1, 1, 1, 2, 2, 2]);

        let mut desc = [5, 4, 3, 2, 1];
        quicksort(&mut desc);
        assert_eq!(desc, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn quicksort_keeps_sorted_input_in_place() {
        // Equal keys with distinct tags: a stable no-op keeps the tags in order.
        let mut v = [(1, 'a'), (1, 'b'), (2, 'c'), (2, 'd'), (3, 'e')];
        let before = v;
        quicksort_by(&mut v, &|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        assert_eq!(v, before);
    }

    #[test]
    fn sorts_agree_with_std_on_random_input() {
        let mut rng = SmallRng::seed_from_u64(7);
        for len in [2, 3, 10, 100, 1000] {
            let v: Vec<i32> = (0..len).map(|_| rng.random_range(-50..50)).collect();
            let mut expected = v.clone();
            expected.sort();

            let mut q = v.clone();
            quicksort_by(&mut q, &Ints);
            assert_eq!(q, expected);

            let mut h = v;
            heapsort(&mut h);
            assert_eq!(h, expected);
        }
    }

    #[test]
    fn quicksort_settles_equal_runs_in_one_pass() {
        use core::cell::Cell;

        const N: usize = 10_000;
        let calls = Cell::new(0usize);
        let counting = |a: &u8, b: &u8| {
            calls.set(calls.get() + 1);
            a.cmp(b)
        };

        // One stray key keeps the sorted-input check from returning early.
        let mut v = vec![1u8; N];
        v[0] = 2;
        quicksort_by(&mut v, &counting);

        assert_eq!(v[N - 1], 2);
        assert!(v[..N - 1].iter().all(|&x| x == 1));
        // A two-way partition makes ~N^2/2 comparisons on this input.
        assert!(calls.get() < 3 * N, "{} comparisons", calls.get());
    }

    #[test]
    fn quicksort_few_distinct_keys() {
        let mut rng = SmallRng::seed_from_u64(8);
        let v: Vec<u8> = (0..5_000).map(|_| rng.random_range(0..3)).collect();
        let mut expected = v.clone();
        expected.sort();

        let mut q = v;
        quicksort(&mut q);
        assert_eq!(q, expected);
    }

    #[test]
    fn partition_bands() {
        let mut v = [3, 1, 3, 5, 3, 0, 4];
        // Middle element (5) is swapped to the front as pivot.
        let (lt, gt) = partition(&mut v, &Natural);
        assert_eq!((lt, gt), (6, 7));
        assert!(v[..lt].iter().all(|&x| x < 5));
        assert_eq!(v[lt], 5);

        let mut w = [2, 7, 2, 2, 9, 2, 1];
        // Pivot is w[3] == 2.
        let (lt, gt) = partition(&mut w, &Natural);
        assert_eq!((lt, gt), (1, 5));
        assert_eq!(w[0], 1);
        assert_eq!(&w[lt..gt], &[2, 2, 2, 2]);
        assert!(w[gt..].iter().all(|&x| x > 2));
    }

    #[test]
    fn heapsort_descending_through_reversed() {
        let mut v = [3, 1, 4, 1, 5, 9, 2, 6];
        heapsort_by(&mut v, &Reversed(Natural));
        assert_eq!(v, [9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn binary_search_edges() {
        let v = [1, 3, 5, 7];
        assert_eq!(binary_search(&v, &1), Some(&1));
        assert_eq!(binary_search(&v, &7), Some(&7));
        assert_eq!(binary_search(&v, &0), None);
        assert_eq!(binary_search(&v, &4), None);
        assert_eq!(binary_search(&v, &8), None);
        assert_eq!(binary_search::<i32>(&[], &1), None);
    }

    #[test]
    fn binary_search_under_custom_order() {
        let v = [9, 7, 5, 3];
        let desc = Reversed(Natural);
        assert_eq!(binary_search_by(&v, &5, &desc), Some(&5));
        assert_eq!(binary_search_by(&v, &6, &desc), None);
    }

    #[test]
    fn reverse_in_place() {
        let mut even = [1, 2, 3, 4];
        reverse(&mut even);
        assert_eq!(even, [4, 3, 2, 1]);

        let mut odd = ["a", "b", "c"];
        reverse(&mut odd);
        assert_eq!(odd, ["c", "b", "a"]);
    }
}

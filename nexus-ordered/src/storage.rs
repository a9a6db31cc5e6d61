//! Node storage with stable keys.
//!
//! Trees keep their nodes in a [`Storage`] and link them by [`Key`]. A key
//! stays valid until the node is removed, and removed slots are reused by
//! later inserts, so a tree that churns does not keep growing its arena.

use core::fmt;
use std::collections::TryReserveError;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// - **Stable keys**: a key addresses the same value until it is removed
/// - **Slot reuse**: removed slots are handed out again by `try_insert`
/// - **No partial inserts**: a failed `try_insert` leaves storage untouched
///   and gives the value back through the error where it can
///
/// # Implementations
///
/// - [`VecStorage`] - growable, allocation failure is reported
/// - [`BoxedStorage`] - fixed capacity chosen up front
/// - `slab::Slab<T>` - growable (feature `slab`)
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Error returned when a value cannot be stored.
    type Error;

    /// Stores a value, returning its key.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error>;

    /// Removes and returns the value at `key`, if occupied.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if occupied.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if occupied.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when storage cannot take another value.
///
/// Carries the rejected value so the caller keeps ownership of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be stored.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Slot arena shared by VecStorage and BoxedStorage
// =============================================================================

#[derive(Debug, Clone)]
enum Slot<T, K> {
    Occupied(T),
    Vacant { next_free: K },
}

/// Vector of slots threaded with an intrusive free list.
#[derive(Debug, Clone)]
struct Slots<T, K: Key> {
    slots: Vec<Slot<T, K>>,
    free_head: K,
    len: usize,
}

impl<T, K: Key> Slots<T, K> {
    const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: K::NONE,
            len: 0,
        }
    }

    /// Puts `value` into a previously freed slot, if there is one.
    fn reuse(&mut self, value: T) -> Result<K, T> {
        if self.free_head.is_none() {
            return Err(value);
        }

        let key = self.free_head;
        let slot = &mut self.slots[key.as_usize()];
        let next_free = match slot {
            Slot::Vacant { next_free } => *next_free,
            Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
        };
        *slot = Slot::Occupied(value);
        self.free_head = next_free;
        self.len += 1;
        Ok(key)
    }

    /// Appends a fresh slot. The caller has already reserved room for it.
    fn push(&mut self, value: T) -> K {
        let key = K::from_usize(self.slots.len());
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        key
    }

    fn remove(&mut self, key: K) -> Option<T> {
        if key.is_none() {
            return None;
        }
        let slot = self.slots.get_mut(key.as_usize())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        let Slot::Occupied(value) = core::mem::replace(slot, vacant) else {
            unreachable!();
        };
        self.free_head = key;
        self.len -= 1;
        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        if key.is_none() {
            return None;
        }
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        if key.is_none() {
            return None;
        }
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free_head = K::NONE;
        self.len = 0;
    }
}

// =============================================================================
// VecStorage - growable, fallible growth
// =============================================================================

/// Growable storage backed by a `Vec` of slots.
///
/// Growth goes through [`Vec::try_reserve`], so running out of memory is
/// reported as [`Full`] instead of aborting the process. Running out of
/// key space (e.g. more than `u16::MAX - 1` nodes with `u16` keys) is
/// reported the same way.
///
/// # Example
///
/// ```
/// use nexus_ordered::{Storage, VecStorage};
///
/// let mut storage: VecStorage<&str> = VecStorage::new();
/// let a = storage.try_insert("a").unwrap();
/// let b = storage.try_insert("b").unwrap();
///
/// assert_eq!(storage.remove(a), Some("a"));
/// assert_eq!(storage.get(b), Some(&"b"));
///
/// // The freed slot is reused.
/// assert_eq!(storage.try_insert("c").unwrap(), a);
/// ```
#[derive(Debug, Clone)]
pub struct VecStorage<T, K: Key = u32> {
    slots: Slots<T, K>,
}

impl<T, K: Key> VecStorage<T, K> {
    /// Creates empty storage. Does not allocate.
    pub const fn new() -> Self {
        Self {
            slots: Slots::new(),
        }
    }

    /// Creates storage with room for at least `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the reservation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut storage = Self::new();
        storage.slots.slots.try_reserve(capacity)?;
        Ok(storage)
    }

    /// Number of slots that can be filled without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.slots.capacity()
    }

    /// Drops every stored value and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T, K: Key> Default for VecStorage<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> Storage<T> for VecStorage<T, K> {
    type Key = K;
    type Error = Full<T>;

    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        let value = match self.slots.reuse(value) {
            Ok(key) => return Ok(key),
            Err(value) => value,
        };

        if self.slots.slots.len() >= K::max_slots() {
            return Err(Full(value));
        }
        if self.slots.slots.try_reserve(1).is_err() {
            return Err(Full(value));
        }
        Ok(self.slots.push(value))
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.slots.remove(key)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len
    }
}

// =============================================================================
// BoxedStorage - fixed capacity
// =============================================================================

/// Fixed-capacity storage.
///
/// All slots are reserved at construction; `try_insert` never allocates and
/// fails with [`Full`] once `capacity` values are stored. Useful when a tree
/// must never grow past a known bound.
///
/// # Example
///
/// ```
/// use nexus_ordered::{BoxedStorage, Full, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(2);
/// storage.try_insert(1).unwrap();
/// storage.try_insert(2).unwrap();
/// assert_eq!(storage.try_insert(3), Err(Full(3)));
/// ```
#[derive(Debug, Clone)]
pub struct BoxedStorage<T, K: Key = u32> {
    slots: Slots<T, K>,
    capacity: usize,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or exceeds the key type's range.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(err) => panic!("failed to reserve storage: {err}"),
        }
    }

    /// Creates storage holding at most `capacity` values, reporting
    /// allocation failure instead of aborting.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the key type's range.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        assert!(
            capacity <= K::max_slots(),
            "capacity exceeds key type maximum"
        );

        let mut slots = Slots::new();
        slots.slots.try_reserve_exact(capacity)?;
        Ok(Self { slots, capacity })
    }

    /// Maximum number of values this storage holds.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.slots.len == self.capacity
    }

    /// Drops every stored value. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;
    type Error = Full<T>;

    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        let value = match self.slots.reuse(value) {
            Ok(key) => return Ok(key),
            Err(value) => value,
        };

        if self.slots.slots.len() == self.capacity {
            return Err(Full(value));
        }
        // Room was reserved up front, so this never reallocates.
        Ok(self.slots.push(value))
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.slots.remove(key)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_storage_starts_empty() {
        let storage: VecStorage<u64> = VecStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn vec_storage_insert_get_remove() {
        let mut storage: VecStorage<u64> = VecStorage::new();

        let a = storage.try_insert(10).unwrap();
        let b = storage.try_insert(20).unwrap();
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get(a), Some(&10));
        assert_eq!(storage.get(b), Some(&20));

        *storage.get_mut(a).unwrap() = 11;
        assert_eq!(storage.remove(a), Some(11));
        assert_eq!(storage.get(a), None);
        assert_eq!(storage.remove(a), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn vec_storage_reuses_slots_lifo() {
        let mut storage: VecStorage<u64> = VecStorage::new();
        let a = storage.try_insert(1).unwrap();
        let b = storage.try_insert(2).unwrap();
        let _c = storage.try_insert(3).unwrap();

        storage.remove(a);
        storage.remove(b);

        assert_eq!(storage.try_insert(4).unwrap(), b);
        assert_eq!(storage.try_insert(5).unwrap(), a);
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn vec_storage_nil_key_is_never_occupied() {
        let mut storage: VecStorage<u64> = VecStorage::new();
        storage.try_insert(1).unwrap();
        assert_eq!(storage.get(u32::NONE), None);
        assert_eq!(storage.remove(u32::NONE), None);
    }

    #[test]
    fn vec_storage_key_space_exhaustion() {
        // u16 keys reserve u16::MAX as nil.
        let mut storage: VecStorage<u8, u16> = VecStorage::new();
        for _ in 0..u16::MAX as usize {
            storage.try_insert(0).unwrap();
        }
        assert_eq!(storage.try_insert(9), Err(Full(9)));
    }

    #[test]
    fn boxed_storage_rejects_past_capacity() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(3);
        assert_eq!(storage.capacity(), 3);

        let keys: Vec<u32> = (0..3).map(|i| storage.try_insert(i).unwrap()).collect();
        assert!(storage.is_full());
        assert_eq!(storage.try_insert(99), Err(Full(99)));

        storage.remove(keys[1]);
        assert!(!storage.is_full());
        assert_eq!(storage.try_insert(99).unwrap(), keys[1]);
    }

    #[test]
    fn boxed_storage_clear_keeps_capacity() {
        let mut storage: BoxedStorage<String> = BoxedStorage::with_capacity(2);
        storage.try_insert("a".into()).unwrap();
        storage.try_insert("b".into()).unwrap();

        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.capacity(), 2);
        storage.try_insert("c".into()).unwrap();
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn boxed_storage_zero_capacity_panics() {
        let _: BoxedStorage<u64> = BoxedStorage::with_capacity(0);
    }

    #[test]
    fn full_gives_value_back() {
        let err = Full(String::from("rejected"));
        assert_eq!(err.to_string(), "storage is full");
        assert_eq!(err.into_inner(), "rejected");
    }

    #[cfg(feature = "slab")]
    #[test]
    fn slab_backend() {
        let mut storage: slab::Slab<u64> = slab::Slab::new();
        let key = Storage::try_insert(&mut storage, 5).unwrap();
        assert_eq!(Storage::get(&storage, key), Some(&5));
        assert_eq!(Storage::remove(&mut storage, key), Some(5));
        assert!(Storage::is_empty(&storage));
    }
}

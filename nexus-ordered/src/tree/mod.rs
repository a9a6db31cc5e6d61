//! Ordered binary search trees over index-based node storage.
//!
//! One core, [`Tree`], implements everything that does not depend on the
//! balancing scheme: search, insertion point, deletion by in-place successor
//! replacement, min/max, predecessor/successor, lowest common ancestor,
//! level, traversals and iteration. The scheme is a [`Balance`] type
//! parameter whose hooks run after each structural change:
//!
//! | Balancer | Metadata | Alias |
//! |----------|----------|-------|
//! | [`Plain`] | none | [`BsTree`] |
//! | [`Avl`] | subtree height | [`AvlTree`] |
//! | [`RedBlack`] | [`Color`] | [`RbTree`] |
//!
//! ```text
//! Tree ──owns──► Storage<Node>      Node { value, left, right, parent, meta }
//!   │                                  links are Keys; Key::NONE is nil
//!   └── after insert/remove ──► Balance hooks ──► link view (rotations)
//! ```
//!
//! Nodes link by [`Key`]; the parent link is relational only. The storage
//! owns every element, and read accessors hand out `&T` borrowed from the
//! tree, so a view cannot outlive the next mutation. Links themselves are
//! never writable from outside the crate:
//!
//! ```compile_fail
//! use nexus_ordered::RbTree;
//!
//! let mut tree: RbTree<u32> = RbTree::new();
//! tree.insert(1).unwrap();
//! tree.set_left(0, u32::MAX);
//! ```
//!
//! # Example
//!
//! ```
//! use nexus_ordered::{Error, RbTree};
//!
//! let mut tree: RbTree<u32> = RbTree::new();
//! for x in [50, 30, 70, 20, 40] {
//!     tree.insert(x).unwrap();
//! }
//!
//! assert_eq!(tree.insert(30), Err(Error::Duplicate));
//! assert_eq!(tree.successor_of(&40), Some(&50));
//! assert_eq!(tree.lowest_common_ancestor_of(&20, &40), Some(&30));
//!
//! tree.delete(&30).unwrap();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![20, 40, 50, 70]);
//! ```

mod avl;
mod links;
mod plain;
mod red_black;
mod traverse;

pub use avl::Avl;
pub use links::Side;
pub use plain::Plain;
pub use red_black::{Color, RedBlack};
pub use traverse::Iter;

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

use crate::builder::TreeBuilder;
use crate::error::violation;
use crate::policy::{Compare, Natural, Release, ValuePolicy};
use crate::storage::{BoxedStorage, Storage, VecStorage};
use crate::{Error, Key};

use links::{Links, LinksMut};

// ============================================================================
// Balance
// ============================================================================

/// What a balancer learns about a physical removal.
///
/// The removed node had at most one child. `child` took its place under
/// `parent` (either may be `NONE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal<K, M> {
    /// Node now occupying the removed node's slot, or `NONE`.
    pub child: K,
    /// Parent of the removed node, or `NONE` if it was the root.
    pub parent: K,
    /// Side of `parent` the removed node hung from.
    pub side: Option<Side>,
    /// Metadata the removed node carried.
    pub meta: M,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Plain {}
    impl Sealed for super::Avl {}
    impl Sealed for super::RedBlack {}
}

/// Balancing scheme plugged into [`Tree`].
///
/// Hooks only see link structure, never element values. The set of schemes
/// is closed: [`Plain`], [`Avl`] and [`RedBlack`].
pub trait Balance: sealed::Sealed {
    /// Per-node metadata.
    type Meta: Copy + PartialEq + fmt::Debug;

    /// Metadata of a freshly linked leaf.
    fn fresh() -> Self::Meta;

    /// Restores the scheme's invariant after `node` was linked in as a leaf.
    fn after_insert<L: LinksMut<Meta = Self::Meta>>(links: &mut L, node: L::Key);

    /// Restores the scheme's invariant after a node was unlinked.
    fn after_remove<L>(links: &mut L, removal: Removal<L::Key, Self::Meta>)
    where
        L: LinksMut<Meta = Self::Meta>;

    /// Checks the scheme's invariant over the whole tree.
    fn validate<L: Links<Meta = Self::Meta>>(links: &L) -> Result<(), Error>;
}

// ============================================================================
// Node
// ============================================================================

/// A tree node as kept in storage.
#[derive(Debug, Clone)]
pub struct Node<T, M, K> {
    value: T,
    left: K,
    right: K,
    parent: K,
    meta: M,
}

impl<T, M, K: Key> Node<T, M, K> {
    #[inline]
    fn leaf(value: T, parent: K, meta: M) -> Self {
        Self {
            value,
            left: K::NONE,
            right: K::NONE,
            parent,
            meta,
        }
    }

    /// The element stored in this node.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}

// ============================================================================
// Tree
// ============================================================================

/// An ordered binary search tree that owns its elements.
///
/// - `T`: element type
/// - `B`: balancing scheme ([`Plain`], [`Avl`], [`RedBlack`])
/// - `C`: comparator ([`Compare`]); comparator-equal elements are the same
///   element, so duplicates are rejected
/// - `K`: node link type
/// - `S`: node storage
///
/// Use the aliases ([`AvlTree`], [`RbTree`], [`BsTree`] and their bounded
/// forms) rather than spelling all five parameters.
pub struct Tree<T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    storage: S,
    root: K,
    len: usize,
    policy: ValuePolicy<T, C>,
    _balance: PhantomData<B>,
}

/// Unbalanced binary search tree with growable storage.
pub type BsTree<T, C = Natural, K = u32, S = VecStorage<Node<T, (), K>, K>> =
    Tree<T, Plain, C, K, S>;

/// AVL tree with growable storage.
pub type AvlTree<T, C = Natural, K = u32, S = VecStorage<Node<T, u32, K>, K>> =
    Tree<T, Avl, C, K, S>;

/// Red-black tree with growable storage.
pub type RbTree<T, C = Natural, K = u32, S = VecStorage<Node<T, Color, K>, K>> =
    Tree<T, RedBlack, C, K, S>;

/// Unbalanced binary search tree holding at most a fixed number of elements.
pub type BoundedBsTree<T, C = Natural, K = u32> =
    Tree<T, Plain, C, K, BoxedStorage<Node<T, (), K>, K>>;

/// AVL tree holding at most a fixed number of elements.
pub type BoundedAvlTree<T, C = Natural, K = u32> =
    Tree<T, Avl, C, K, BoxedStorage<Node<T, u32, K>, K>>;

/// Red-black tree holding at most a fixed number of elements.
pub type BoundedRbTree<T, C = Natural, K = u32> =
    Tree<T, RedBlack, C, K, BoxedStorage<Node<T, Color, K>, K>>;

impl<T, B, C, K, S> Tree<T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    /// Creates an empty tree over `storage`, which must be empty.
    ///
    /// # Panics
    ///
    /// Panics if `storage` already holds nodes.
    pub fn with_storage(storage: S, compare: C) -> Self {
        Self::with_policy(storage, ValuePolicy::new(compare))
    }

    /// Creates an empty tree over `storage` with a full value policy.
    ///
    /// # Panics
    ///
    /// Panics if `storage` already holds nodes.
    pub fn with_policy(storage: S, policy: ValuePolicy<T, C>) -> Self {
        assert!(storage.is_empty(), "tree storage must start empty");
        Self {
            storage,
            root: K::NONE,
            len: 0,
            policy,
            _balance: PhantomData,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The value policy this tree was built with.
    #[inline]
    pub fn policy(&self) -> &ValuePolicy<T, C> {
        &self.policy
    }

    /// Borrowed view of the root element.
    #[inline]
    pub fn root(&self) -> Option<&T> {
        self.value_at(self.root)
    }

    /// Structural view of the root node.
    #[inline]
    pub fn root_node(&self) -> Option<NodeRef<'_, T, B, C, K, S>> {
        NodeRef::at(self, self.root)
    }

    /// Smallest element.
    #[inline]
    pub fn min(&self) -> Option<&T> {
        self.value_at(self.links().leftmost(self.root))
    }

    /// Largest element.
    #[inline]
    pub fn max(&self) -> Option<&T> {
        self.value_at(self.links().rightmost(self.root))
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut tallest = 0;
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push((self.root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            tallest = tallest.max(depth);
            let n = self.node(node);
            for child in [n.left, n.right] {
                if child.is_some() {
                    stack.push((child, depth + 1));
                }
            }
        }
        tallest
    }

    /// Removes every element, running the release hook on each in
    /// post-order.
    pub fn clear(&mut self) {
        let mut cur = self.links().first_postorder(self.root);
        while cur.is_some() {
            let next = self.links().next_postorder(cur);
            // `next` is computed first: it reads the parent's links, which
            // removal of `cur` does not touch.
            if let Some(node) = self.storage.remove(cur) {
                self.policy.release(node.value);
            }
            cur = next;
        }
        self.root = K::NONE;
        self.len = 0;
    }

    /// Read-only link view for traversal and balancer validation.
    #[inline]
    fn links(&self) -> LinkView<'_, T, B, C, K, S> {
        LinkView { tree: self }
    }

    /// Writable link view, handed to balancer hooks only.
    #[inline]
    fn links_mut(&mut self) -> LinkViewMut<'_, T, B, C, K, S> {
        LinkViewMut { tree: self }
    }

    #[inline]
    fn node(&self, key: K) -> &Node<T, B::Meta, K> {
        self.storage.get(key).expect("dangling node link")
    }

    #[inline]
    fn node_mut(&mut self, key: K) -> &mut Node<T, B::Meta, K> {
        self.storage.get_mut(key).expect("dangling node link")
    }

    #[inline]
    fn value_at(&self, key: K) -> Option<&T> {
        if key.is_none() {
            None
        } else {
            Some(&self.node(key).value)
        }
    }
}

impl<T, B, C, K, S> Tree<T, B, C, K, S>
where
    B: Balance,
    C: Compare<T>,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    /// Creates an empty tree ordered by `compare`.
    pub fn with_compare(compare: C) -> Self
    where
        S: Default,
    {
        Self::with_storage(S::default(), compare)
    }

    /// Creates an empty tree with a comparator and a release hook.
    pub fn with_release<F>(compare: C, release: F) -> Self
    where
        S: Default,
        F: FnMut(&mut T) + Send + 'static,
    {
        Self::with_policy(
            S::default(),
            ValuePolicy::with_release(compare, Some(Release::new(release))),
        )
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Finds the node comparing equal to `key`, or `NONE`.
    fn locate(&self, key: &T) -> K {
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            cur = match self.policy.compare(key, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return cur,
            };
        }
        K::NONE
    }

    /// Borrowed view of the element comparing equal to `key`.
    #[inline]
    pub fn find(&self, key: &T) -> Option<&T> {
        self.value_at(self.locate(key))
    }

    /// Returns `true` if an element compares equal to `key`.
    #[inline]
    pub fn contains(&self, key: &T) -> bool {
        self.locate(key).is_some()
    }

    /// Smallest element in the subtree rooted at `key`'s node.
    pub fn min_from(&self, key: &T) -> Option<&T> {
        let node = self.locate(key);
        self.value_at(self.links().leftmost(node))
    }

    /// Largest element in the subtree rooted at `key`'s node.
    pub fn max_from(&self, key: &T) -> Option<&T> {
        let node = self.locate(key);
        self.value_at(self.links().rightmost(node))
    }

    /// Least element strictly greater than `key`.
    ///
    /// `key` need not be present; the answer is the neighbor it would have
    /// if it were.
    pub fn successor_of(&self, key: &T) -> Option<&T> {
        let mut cur = self.root;
        let mut candidate = K::NONE;
        while cur.is_some() {
            let node = self.node(cur);
            match self.policy.compare(key, &node.value) {
                Ordering::Less => {
                    candidate = cur;
                    cur = node.left;
                }
                Ordering::Greater => cur = node.right,
                Ordering::Equal => {
                    if node.right.is_some() {
                        candidate = self.links().leftmost(node.right);
                    }
                    break;
                }
            }
        }
        self.value_at(candidate)
    }

    /// Greatest element strictly less than `key`.
    ///
    /// `key` need not be present; the answer is the neighbor it would have
    /// if it were.
    pub fn predecessor_of(&self, key: &T) -> Option<&T> {
        let mut cur = self.root;
        let mut candidate = K::NONE;
        while cur.is_some() {
            let node = self.node(cur);
            match self.policy.compare(key, &node.value) {
                Ordering::Greater => {
                    candidate = cur;
                    cur = node.right;
                }
                Ordering::Less => cur = node.left,
                Ordering::Equal => {
                    if node.left.is_some() {
                        candidate = self.links().rightmost(node.left);
                    }
                    break;
                }
            }
        }
        self.value_at(candidate)
    }

    /// Deepest element that is an ancestor of (or equal to) both `a` and
    /// `b`. `None` unless both are present.
    pub fn lowest_common_ancestor_of(&self, a: &T, b: &T) -> Option<&T> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }

        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            let side_a = self.policy.compare(a, &node.value);
            let side_b = self.policy.compare(b, &node.value);
            cur = match (side_a, side_b) {
                (Ordering::Less, Ordering::Less) => node.left,
                (Ordering::Greater, Ordering::Greater) => node.right,
                _ => return Some(&node.value),
            };
        }
        None
    }

    /// Depth of `key`'s node; the root is level 0.
    pub fn level_of(&self, key: &T) -> Option<usize> {
        let mut cur = self.root;
        let mut level = 0;
        while cur.is_some() {
            let node = self.node(cur);
            cur = match self.policy.compare(key, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(level),
            };
            level += 1;
        }
        None
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Inserts `value`.
    ///
    /// The node is allocated before any link changes, so on failure the tree
    /// is exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`Error::Duplicate`] if an equal element is present
    /// - [`Error::AllocFailed`] if storage cannot take another node
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        let mut parent = K::NONE;
        let mut side = Side::Left;
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            parent = cur;
            match self.policy.compare(&value, &node.value) {
                Ordering::Less => {
                    side = Side::Left;
                    cur = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    cur = node.right;
                }
                Ordering::Equal => {
                    tracing::debug!(len = self.len, "insert rejected: duplicate element");
                    return Err(Error::Duplicate);
                }
            }
        }

        let node = Node::leaf(value, parent, B::fresh());
        let key = match self.storage.try_insert(node) {
            Ok(key) => key,
            Err(_) => {
                tracing::debug!(len = self.len, "insert rejected: node storage exhausted");
                return Err(Error::AllocFailed);
            }
        };

        if parent.is_none() {
            self.root = key;
        } else {
            match side {
                Side::Left => self.node_mut(parent).left = key,
                Side::Right => self.node_mut(parent).right = key,
            }
        }
        self.len += 1;

        B::after_insert(&mut self.links_mut(), key);
        Ok(())
    }

    /// Removes the element comparing equal to `key` and returns it.
    ///
    /// The release hook does not run; ownership passes to the caller.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no element compares equal to `key`.
    pub fn take(&mut self, key: &T) -> Result<T, Error> {
        let target = self.locate(key);
        if target.is_none() {
            tracing::debug!(len = self.len, "remove rejected: element not found");
            return Err(Error::NotFound);
        }
        Ok(self.unlink(target))
    }

    /// Removes the element comparing equal to `key`, running the release
    /// hook on it.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no element compares equal to `key`.
    pub fn delete(&mut self, key: &T) -> Result<(), Error> {
        let value = self.take(key)?;
        self.policy.release(value);
        Ok(())
    }

    /// Removes the smallest element.
    pub fn pop_min(&mut self) -> Option<T> {
        let first = self.links().leftmost(self.root);
        if first.is_none() {
            return None;
        }
        Some(self.unlink(first))
    }

    /// Removes the largest element.
    pub fn pop_max(&mut self) -> Option<T> {
        let last = self.links().rightmost(self.root);
        if last.is_none() {
            return None;
        }
        Some(self.unlink(last))
    }

    /// Detaches `target`'s element from the tree.
    ///
    /// A node with two children keeps its slot and takes its in-order
    /// successor's element; the successor's node (at most one child) is the
    /// one physically removed.
    fn unlink(&mut self, target: K) -> T {
        let victim = {
            let node = self.node(target);
            if node.left.is_some() && node.right.is_some() {
                self.links().leftmost(node.right)
            } else {
                target
            }
        };

        let (child, parent) = {
            let node = self.node(victim);
            let child = if node.left.is_some() {
                node.left
            } else {
                node.right
            };
            (child, node.parent)
        };
        let side = self.links().side_of(victim);

        if child.is_some() {
            self.node_mut(child).parent = parent;
        }
        self.links_mut().replace_child(parent, victim, child);

        let mut removed = self
            .storage
            .remove(victim)
            .expect("dangling node link");
        if victim != target {
            core::mem::swap(&mut self.node_mut(target).value, &mut removed.value);
        }
        self.len -= 1;

        B::after_remove(
            &mut self.links_mut(),
            Removal {
                child,
                parent,
                side,
                meta: removed.meta,
            },
        );
        removed.value
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks every structural invariant.
    ///
    /// - parent and child links agree
    /// - in-order traversal is strictly increasing
    /// - `len` matches the number of reachable nodes
    /// - the balancer's own invariant holds
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] on the first broken invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if self.root.is_some() && self.node(self.root).parent.is_some() {
            return Err(violation("root has a parent"));
        }

        let mut count = 0;
        let mut prev: Option<&T> = None;
        let mut cur = self.links().leftmost(self.root);
        while cur.is_some() {
            let node = self.node(cur);
            for child in [node.left, node.right] {
                if child.is_some() && self.node(child).parent != cur {
                    return Err(violation("child does not point back at parent"));
                }
            }
            if let Some(prev) = prev {
                if self.policy.compare(prev, &node.value) != Ordering::Less {
                    return Err(violation("in-order sequence not strictly increasing"));
                }
            }
            prev = Some(&node.value);
            count += 1;
            if count > self.len {
                return Err(violation("more reachable nodes than len"));
            }
            cur = self.links().next(cur);
        }

        if count != self.len || self.storage.len() != self.len {
            return Err(violation("len does not match reachable nodes"));
        }

        B::validate(&self.links())
    }
}

impl<T, B, C, K, S> Tree<T, B, C, K, S>
where
    B: Balance,
    C: Compare<T> + Default,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K> + Default,
{
    /// Creates an empty tree with the default comparator and storage.
    pub fn new() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T, B: Balance> Tree<T, B, Natural, u32, VecStorage<Node<T, B::Meta, u32>, u32>> {
    /// Starts configuring a tree; see [`TreeBuilder`].
    pub fn builder() -> TreeBuilder<T, B> {
        TreeBuilder::new()
    }
}

impl<T, B, C, K, S> Default for Tree<T, B, C, K, S>
where
    B: Balance,
    C: Compare<T> + Default,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, B, C, K, S> Drop for Tree<T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, B, C, K, S> fmt::Debug for Tree<T, B, C, K, S>
where
    T: fmt::Debug,
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ============================================================================
// Link views
// ============================================================================

/// Shared link view of a tree. Only the tree itself constructs one.
struct LinkView<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    tree: &'a Tree<T, B, C, K, S>,
}

/// Exclusive link view of a tree, lent to a balancer hook.
struct LinkViewMut<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    tree: &'a mut Tree<T, B, C, K, S>,
}

impl<T, B, C, K, S> Links for LinkView<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    type Key = K;
    type Meta = B::Meta;

    #[inline]
    fn root_key(&self) -> K {
        self.tree.root
    }

    #[inline]
    fn left(&self, node: K) -> K {
        self.tree.node(node).left
    }

    #[inline]
    fn right(&self, node: K) -> K {
        self.tree.node(node).right
    }

    #[inline]
    fn parent(&self, node: K) -> K {
        self.tree.node(node).parent
    }

    #[inline]
    fn meta(&self, node: K) -> B::Meta {
        self.tree.node(node).meta
    }
}

impl<T, B, C, K, S> Links for LinkViewMut<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    type Key = K;
    type Meta = B::Meta;

    #[inline]
    fn root_key(&self) -> K {
        self.tree.root
    }

    #[inline]
    fn left(&self, node: K) -> K {
        self.tree.node(node).left
    }

    #[inline]
    fn right(&self, node: K) -> K {
        self.tree.node(node).right
    }

    #[inline]
    fn parent(&self, node: K) -> K {
        self.tree.node(node).parent
    }

    #[inline]
    fn meta(&self, node: K) -> B::Meta {
        self.tree.node(node).meta
    }
}

impl<T, B, C, K, S> LinksMut for LinkViewMut<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    #[inline]
    fn set_root_key(&mut self, root: K) {
        self.tree.root = root;
    }

    #[inline]
    fn set_left(&mut self, node: K, child: K) {
        self.tree.node_mut(node).left = child;
    }

    #[inline]
    fn set_right(&mut self, node: K, child: K) {
        self.tree.node_mut(node).right = child;
    }

    #[inline]
    fn set_parent(&mut self, node: K, parent: K) {
        self.tree.node_mut(node).parent = parent;
    }

    #[inline]
    fn set_meta(&mut self, node: K, meta: B::Meta) {
        self.tree.node_mut(node).meta = meta;
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// Read-only structural view of one node.
///
/// Lets callers walk the shape of the tree, e.g. to check black heights
/// from the outside.
pub struct NodeRef<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    tree: &'a Tree<T, B, C, K, S>,
    key: K,
}

impl<'a, T, B, C, K, S> NodeRef<'a, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    #[inline]
    fn at(tree: &'a Tree<T, B, C, K, S>, key: K) -> Option<Self> {
        if key.is_none() {
            None
        } else {
            Some(Self { tree, key })
        }
    }

    /// The element in this node.
    #[inline]
    pub fn value(&self) -> &'a T {
        &self.tree.node(self.key).value
    }

    /// Balance metadata of this node.
    #[inline]
    pub fn meta(&self) -> B::Meta {
        self.tree.node(self.key).meta
    }

    /// Left child.
    #[inline]
    pub fn left(&self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.key).left)
    }

    /// Right child.
    #[inline]
    pub fn right(&self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.key).right)
    }

    /// Parent node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.key).parent)
    }
}

impl<T, B, C, K, S> Clone for NodeRef<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, B, C, K, S> Copy for NodeRef<'_, T, B, C, K, S>
where
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
}

impl<T, B, C, K, S> fmt::Debug for NodeRef<'_, T, B, C, K, S>
where
    T: fmt::Debug,
    B: Balance,
    K: Key,
    S: Storage<Node<T, B::Meta, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("meta", &self.meta())
            .finish()
    }
}

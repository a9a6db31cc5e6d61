//! Ordered collections over index-based node storage.
//!
//! Search trees (plain, AVL, red-black), a bounded max priority queue, and
//! slice sort/search utilities, all parameterized by a comparator rather
//! than tied to `Ord`.
//!
//! # Design
//!
//! Tree nodes live in a [`Storage`] arena and link to each other by
//! [`Key`], never by pointer:
//!
//! ```text
//! Tree<T, B, C, K, S>
//!   storage: S ── Node { value: T, left: K, right: K, parent: K, meta }
//!   policy:  C (order) + optional release hook
//!   B:       balancer run after each insert/remove
//! ```
//!
//! - **One core, three shapes**: search, deletion, neighbors, LCA, levels
//!   and traversals are written once; [`Plain`], [`Avl`] and [`RedBlack`]
//!   only supply the fix-up after a structural change
//! - **Strong failure safety**: a node is allocated before any link moves,
//!   so a failed insert leaves the tree exactly as it was
//! - **Borrowed views**: accessors return `&T` tied to `&self`, so a view
//!   cannot outlive the next mutation
//!
//! # Quick Start
//!
//! ```
//! use nexus_ordered::{AvlTree, Error};
//!
//! let mut tree: AvlTree<i32> = AvlTree::new();
//! for x in [10, 20, 30, 40, 50, 25] {
//!     tree.insert(x)?;
//! }
//!
//! assert_eq!(tree.root(), Some(&30));
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.insert(25), Err(Error::Duplicate));
//! assert_eq!(tree.level_of(&25), Some(2));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Choosing a Tree
//!
//! | Alias | Balancer | Storage | Insert failure |
//! |-------|----------|---------|----------------|
//! | [`AvlTree`] | height | [`VecStorage`] | allocator refuses |
//! | [`RbTree`] | color | [`VecStorage`] | allocator refuses |
//! | [`BsTree`] | none | [`VecStorage`] | allocator refuses |
//! | [`BoundedAvlTree`] | height | [`BoxedStorage`] | capacity reached |
//! | [`BoundedRbTree`] | color | [`BoxedStorage`] | capacity reached |
//! | [`BoundedBsTree`] | none | [`BoxedStorage`] | capacity reached |
//!
//! AVL trees are more rigidly balanced (faster lookups); red-black trees
//! rotate less on mutation.
//!
//! # Failures
//!
//! Mutators return `Result<_, `[`Error`]`>`; queries with no answer return
//! `None`. Every [`Error`] renders to a fixed message, and
//! [`Error::report`] writes it to stderr.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod builder;
pub mod compare;
pub mod error;
pub mod key;
pub mod policy;
pub mod queue;
pub mod sort;
pub mod storage;
pub mod tree;

pub use builder::{QueueBuilder, TreeBuilder};
pub use error::{Error, describe};
pub use key::Key;
pub use policy::{Compare, Natural, Release, Reversed, ValuePolicy};
pub use queue::PriorityQueue;
pub use storage::{BoxedStorage, Full, Storage, VecStorage};
pub use tree::{
    Avl, AvlTree, Balance, BoundedAvlTree, BoundedBsTree, BoundedRbTree, BsTree, Color, Node,
    NodeRef, Plain, RbTree, RedBlack, Removal, Side, Tree,
};

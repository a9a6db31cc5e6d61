//! Red-black balancing.
//!
//! Properties kept after every mutation:
//!
//! 1. the root is black
//! 2. a red node has no red child
//! 3. every root-to-nil path crosses the same number of black nodes
//!
//! The nil link (`Key::NONE`) is the shared black leaf. It has no slot in
//! storage, so reading its color yields black and painting it is a no-op;
//! it is never handed out to callers.

use super::{Balance, Links, LinksMut, Node, Removal, Side, Tree, violation};
use crate::policy::Compare;
use crate::storage::Storage;
use crate::{Error, Key};

/// Node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red.
    Red,
    /// Black.
    Black,
}

/// Red-black balancer. Metadata: [`Color`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedBlack;

#[inline]
fn color<L: Links<Meta = Color>>(links: &L, node: L::Key) -> Color {
    if node.is_none() {
        Color::Black
    } else {
        links.meta(node)
    }
}

#[inline]
fn paint<L: LinksMut<Meta = Color>>(links: &mut L, node: L::Key, color: Color) {
    if node.is_some() {
        links.set_meta(node, color);
    }
}

#[inline]
fn is_red<L: Links<Meta = Color>>(links: &L, node: L::Key) -> bool {
    color(links, node) == Color::Red
}

impl Balance for RedBlack {
    type Meta = Color;

    #[inline]
    fn fresh() -> Color {
        Color::Red
    }

    fn after_insert<L: LinksMut<Meta = Color>>(links: &mut L, mut node: L::Key) {
        loop {
            let parent = links.parent(node);
            if !is_red(links, parent) {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let grand = links.parent(parent);

            if links.left(grand) == parent {
                let uncle = links.right(grand);
                if is_red(links, uncle) {
                    paint(links, parent, Color::Black);
                    paint(links, uncle, Color::Black);
                    paint(links, grand, Color::Red);
                    node = grand;
                    continue;
                }
                let mut parent = parent;
                if links.right(parent) == node {
                    // Zig-zag: straighten into the outer case.
                    links.rotate_left(parent);
                    node = parent;
                    parent = links.parent(node);
                }
                paint(links, parent, Color::Black);
                paint(links, grand, Color::Red);
                links.rotate_right(grand);
            } else {
                let uncle = links.left(grand);
                if is_red(links, uncle) {
                    paint(links, parent, Color::Black);
                    paint(links, uncle, Color::Black);
                    paint(links, grand, Color::Red);
                    node = grand;
                    continue;
                }
                let mut parent = parent;
                if links.left(parent) == node {
                    links.rotate_right(parent);
                    node = parent;
                    parent = links.parent(node);
                }
                paint(links, parent, Color::Black);
                paint(links, grand, Color::Red);
                links.rotate_left(grand);
            }
            break;
        }

        let root = links.root_key();
        paint(links, root, Color::Black);
    }

    fn after_remove<L: LinksMut<Meta = Color>>(links: &mut L, removal: Removal<L::Key, Color>) {
        if removal.meta == Color::Red {
            return;
        }

        // `node` carries an extra black. It may be nil, in which case only
        // `removal.side` tells which child of `parent` it is.
        let mut node = removal.child;
        let mut parent = removal.parent;
        while parent.is_some() && !is_red(links, node) {
            let on_left = if node.is_some() {
                links.left(parent) == node
            } else {
                removal.side == Some(Side::Left)
            };

            if on_left {
                let mut sibling = links.right(parent);
                if is_red(links, sibling) {
                    paint(links, sibling, Color::Black);
                    paint(links, parent, Color::Red);
                    links.rotate_left(parent);
                    sibling = links.right(parent);
                }
                if !is_red(links, links.left(sibling)) && !is_red(links, links.right(sibling)) {
                    paint(links, sibling, Color::Red);
                    node = parent;
                    parent = links.parent(node);
                    continue;
                }
                if !is_red(links, links.right(sibling)) {
                    let near = links.left(sibling);
                    paint(links, near, Color::Black);
                    paint(links, sibling, Color::Red);
                    links.rotate_right(sibling);
                    sibling = links.right(parent);
                }
                let parent_color = color(links, parent);
                paint(links, sibling, parent_color);
                paint(links, parent, Color::Black);
                let far = links.right(sibling);
                paint(links, far, Color::Black);
                links.rotate_left(parent);
            } else {
                let mut sibling = links.left(parent);
                if is_red(links, sibling) {
                    paint(links, sibling, Color::Black);
                    paint(links, parent, Color::Red);
                    links.rotate_right(parent);
                    sibling = links.left(parent);
                }
                if !is_red(links, links.left(sibling)) && !is_red(links, links.right(sibling)) {
                    paint(links, sibling, Color::Red);
                    node = parent;
                    parent = links.parent(node);
                    continue;
                }
                if !is_red(links, links.left(sibling)) {
                    let near = links.right(sibling);
                    paint(links, near, Color::Black);
                    paint(links, sibling, Color::Red);
                    links.rotate_left(sibling);
                    sibling = links.left(parent);
                }
                let parent_color = color(links, parent);
                paint(links, sibling, parent_color);
                paint(links, parent, Color::Black);
                let far = links.left(sibling);
                paint(links, far, Color::Black);
                links.rotate_right(parent);
            }
            node = links.root_key();
            break;
        }
        paint(links, node, Color::Black);
    }

    fn validate<L: Links<Meta = Color>>(links: &L) -> Result<(), Error> {
        let root = links.root_key();
        if is_red(links, root) {
            return Err(violation("red-black root is red"));
        }

        let mut expected = None;
        let mut node = links.leftmost(root);
        while node.is_some() {
            if is_red(links, node)
                && (is_red(links, links.left(node)) || is_red(links, links.right(node)))
            {
                return Err(violation("red node with red child"));
            }
            if links.left(node).is_none() || links.right(node).is_none() {
                let blacks = blacks_to_root(links, node);
                match expected {
                    None => expected = Some(blacks),
                    Some(e) if e != blacks => {
                        return Err(violation("unequal black heights"));
                    }
                    Some(_) => {}
                }
            }
            node = links.next(node);
        }
        Ok(())
    }
}

fn blacks_to_root<L: Links<Meta = Color>>(links: &L, mut node: L::Key) -> usize {
    let mut blacks = 0;
    while node.is_some() {
        if !is_red(links, node) {
            blacks += 1;
        }
        node = links.parent(node);
    }
    blacks
}

impl<T, C, K, S> Tree<T, RedBlack, C, K, S>
where
    C: Compare<T>,
    K: Key,
    S: Storage<Node<T, Color, K>, Key = K>,
{
    /// Color of `key`'s node.
    pub fn color_of(&self, key: &T) -> Option<Color> {
        let node = self.locate(key);
        if node.is_none() {
            None
        } else {
            Some(color(&self.links(), node))
        }
    }

    /// Black nodes on the path from the root to the leftmost nil.
    ///
    /// Every root-to-nil path has this many when the tree is valid.
    pub fn black_height(&self) -> usize {
        let links = self.links();
        let mut blacks = 0;
        let mut node = links.root_key();
        while node.is_some() {
            if !is_red(&links, node) {
                blacks += 1;
            }
            node = links.left(node);
        }
        blacks
    }

    /// Black height of every root-to-nil path, left to right.
    pub fn black_heights(&self) -> Vec<usize> {
        let links = self.links();
        let mut out = Vec::new();
        let mut node = links.leftmost(links.root_key());
        while node.is_some() {
            let here = blacks_to_root(&links, node);
            // One entry per nil child, in order.
            for child in [links.left(node), links.right(node)] {
                if child.is_none() {
                    out.push(here);
                }
            }
            node = links.next(node);
        }
        out
    }
}

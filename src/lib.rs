//! An AVL tree: an ordered map kept height-balanced by rotations.
//!
//! Nodes are stored in an arena and refer to each other through stable handles. The parent link of
//! each node is a back-reference used only to walk upward; the arena alone owns the nodes.

// Conventions used in comments:
// - The height of a subtree `x` is denoted `h(x)`; an empty subtree has height 0.
// - The parent of a node `x` is denoted `p(x)`.
// - The balance of a node `x` is `b(x) = h(right(x)) - h(left(x))`.
//
// The invariants of an AVL tree are:
// 1. Keys are in symmetric order.
// 2. `b(x) ∈ {-1, 0, 1}` for every node `x`.
//
// Balances are never recomputed from heights; each rebalancing step assigns them explicitly.

use core::{borrow::Borrow, cmp::Ordering, mem};

mod arena;
mod balance;
mod bst;
mod debug;
mod error;
mod iter;
mod links;
mod map;

#[cfg(any(test, feature = "model"))]
pub mod model;


use arena::{Arena, Node, NodeId};
use links::{Dir, Link, Links};

pub use error::Error;
pub use iter::{IntoIter, Iter, Keys, Values};

/// An ordered map based on an [AVL tree].
///
/// Inserting an existing key overwrites its value in place. Removing an absent key does nothing.
/// Both operations complete in _O(log(n))_ time.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
#[derive(Clone)]
pub struct AvlTree<K, V> {
    arena: Arena<K, V>,
    root: Link,
}

impl<K, V> AvlTree<K, V> {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<K, V> {
        AvlTree {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns the height of the tree. An empty tree has height 0 and a single node height 1.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, link: Link) -> usize {
        link.map_or(0, |node| {
            let links = self.links(node);
            1 + self
                .subtree_height(links.left())
                .max(self.subtree_height(links.right()))
        })
    }

    /// Returns `true` if the heights of the two subtrees of every node differ by at most one.
    ///
    /// Heights are measured, not read from the stored balances.
    pub fn is_balanced(&self) -> bool {
        fn measure<K, V>(tree: &AvlTree<K, V>, link: Link) -> Option<usize> {
            let Some(node) = link else {
                return Some(0);
            };

            let left = measure(tree, tree.links(node).left())?;
            let right = measure(tree, tree.links(node).right())?;

            (left.abs_diff(right) <= 1).then_some(1 + left.max(right))
        }

        measure(self, self.root).is_some()
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            assert_eq!(self.len(), 0);
            return;
        };

        assert_eq!(self.parent(root), None, "root must not have a parent");

        let (_height, count) = self.assert_invariants_at(root);
        assert_eq!(count, self.len(), "reachable nodes must match `len`");

        // Ensure keys are in symmetric order.
        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key, "keys out of order");
                prev = key;
            }
        }
    }

    // Returns the height and node count of the subtree at `node`.
    fn assert_invariants_at(&self, node: NodeId) -> (usize, usize) {
        let links = self.links(node);
        let mut heights = [0; 2];
        let mut count = 1;

        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = links.child(dir) {
                // Ensure child's parent link points to this node.
                let parent = self
                    .parent(child)
                    .unwrap_or_else(|| panic!("{child:?}: parent pointer not set"));
                assert_eq!(node, parent);

                let (height, n) = self.assert_invariants_at(child);
                heights[dir as usize] = height;
                count += n;
            }
        }

        // Ensure the stored balance matches the measured one, and is stable.
        let measured = heights[Dir::Right as usize] as isize - heights[Dir::Left as usize] as isize;
        assert_eq!(
            links.balance() as isize,
            measured,
            "{node:?}: stored balance disagrees with subtree heights"
        );
        assert!(balance::is_stable(links.balance()), "{node:?}: unbalanced");

        (1 + heights[0].max(heights[1]), count)
    }

    /// Returns a reference to the value corresponding to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        Some(&self.arena[node].value)
    }

    /// Returns the value corresponding to `key`, or [`Error::KeyNotFound`].
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        Some(&mut self.arena[node].value)
    }

    /// Returns the key-value pair corresponding to `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        let node = &self.arena[node];
        Some((&node.key, &node.value))
    }

    /// Returns `true` if the tree contains a value for `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the key-value pair with the minimum key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.arena[self.first_node()?];
        Some((&node.key, &node.value))
    }

    /// Returns the key-value pair with the maximum key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.arena[self.last_node()?];
        Some((&node.key, &node.value))
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// If the tree already held `key`, its value is overwritten in place and the old value is
    /// returned; the shape of the tree is left untouched. The stored key is not updated.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            // Tree is empty. Set the new node as the root and return.
            let node = self.arena.alloc(Node {
                links: Links::new(None),
                key,
                value,
            });
            self.root = Some(node);
            return None;
        };

        // Descend the tree, looking for a free slot.
        let mut parent = root;
        let dir = loop {
            let dir = match key.cmp(&self.arena[parent].key) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.arena[parent].value, value));
                }
                Ordering::Greater => Dir::Right,
            };

            match self.child(parent, dir) {
                Some(child) => parent = child,
                None => break dir,
            }
        };

        let node = self.arena.alloc(Node {
            links: Links::new(Some(parent)),
            key,
            value,
        });
        self.links_mut(parent).set_child(dir, Some(node));

        if self.balance(parent) != 0 {
            // The parent's only other child was a leaf on the opposite side. Both sides now have
            // height 1, so nothing above the parent changes.
            self.set_balance(parent, 0);
        } else {
            // The parent was a leaf and grew by one level.
            self.set_balance(parent, dir.sign());
            self.rebalance_inserted(parent, node);
        }

        None
    }

    // Performs a bottom-up rebalance of the tree after `parent`'s subtree grew by one level.
    //
    // Invariants on entry:
    // - `node` is a child of `parent`.
    // - `b(parent) = ±1`, leaning toward `node`.
    fn rebalance_inserted(&mut self, mut parent: NodeId, mut node: NodeId) {
        debug_assert_eq!(self.parent(node), Some(parent));
        debug_assert_eq!(self.balance(parent).abs(), 1);

        // While `parent`'s subtree has grown and is not the root, update its parent.
        while let Some(grandparent) = self.parent(parent) {
            let dir = self.which_child(grandparent, parent);
            let new_balance = self.balance(grandparent) + dir.sign();
            self.set_balance(grandparent, new_balance);

            match new_balance {
                // The shorter side caught up; the height of `grandparent` is unchanged.
                0 => return,

                // `grandparent` grew as well. Ascend one level.
                -1 | 1 => {
                    node = parent;
                    parent = grandparent;
                }

                _ => {
                    if self.which_child(parent, node) == dir {
                        tracing::trace!(?grandparent, ?parent, ?dir, "insert: single rotation");

                        self.rotate(grandparent, !dir);
                        self.set_balance(parent, 0);
                        self.set_balance(grandparent, 0);
                    } else {
                        tracing::trace!(
                            ?grandparent,
                            ?parent,
                            ?node,
                            ?dir,
                            "insert: double rotation"
                        );

                        let table = balance::double_rotation(dir, self.balance(node));
                        self.rotate(parent, dir);
                        self.rotate(grandparent, !dir);
                        self.set_balance(grandparent, table.top);
                        self.set_balance(parent, table.mid);
                        self.set_balance(node, table.bottom);
                    }

                    // A rotation restores the height the subtree had before the insertion.
                    return;
                }
            }
        }
    }

    /// Removes `key` from the tree, returning its value if it was present.
    ///
    /// Removing an absent key leaves the tree untouched.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the tree, returning the stored key and value if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        Some(self.remove_at(node))
    }

    /// Removes and returns the key-value pair with the minimum key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node = self.first_node()?;
        Some(self.remove_at(node))
    }

    /// Removes and returns the key-value pair with the maximum key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node = self.last_node()?;
        Some(self.remove_at(node))
    }

    fn remove_at(&mut self, node: NodeId) -> (K, V) {
        // A node with two children first trades places with its in-order predecessor, the maximum
        // of its left subtree. The predecessor has no right child, so after the swap `node` has at
        // most one child and can be spliced out directly.
        if let (Some(left), Some(_)) = (self.links(node).left(), self.links(node).right()) {
            let predecessor = self.extreme_in_subtree(left, Dir::Right);
            self.node_swap(node, predecessor);
        }

        let parent = self.parent(node);
        let child = self.links(node).left().or(self.links(node).right());

        // `diff` is the change in `b(parent)` caused by its `dir` subtree shrinking.
        let diff = match parent {
            Some(parent) => {
                let dir = self.which_child(parent, node);
                self.links_mut(parent).set_child(dir, child);
                self.maybe_set_parent(child, Some(parent));
                -dir.sign()
            }

            None => {
                self.root = child;
                if let Some(child) = child {
                    self.links_mut(child).set_parent(None);
                    self.set_balance(child, 0);
                }
                0
            }
        };

        // Release the node only once nothing links to it anymore.
        let Node { key, value, .. } = self.arena.free(node);

        if let Some(parent) = parent {
            self.rebalance_removed(parent, diff);
        }

        (key, value)
    }

    // Performs a bottom-up rebalance of the tree after one subtree of `node` shrank by one level.
    //
    // `diff` is +1 if the left subtree shrank, -1 if the right one did.
    fn rebalance_removed(&mut self, node: NodeId, diff: i8) {
        let mut opt_cur = Some(node);
        let mut diff = diff;

        while let Some(cur) = opt_cur {
            // Computed before any rotation moves `cur`; the rotated subtree takes `cur`'s place
            // under `parent`.
            let parent = self.parent(cur);
            let parent_diff = parent.map_or(0, |p| -self.which_child(p, cur).sign());

            let new_balance = self.balance(cur) + diff;

            match new_balance {
                // Height of `cur` is unchanged.
                -1 | 1 => {
                    self.set_balance(cur, new_balance);
                    return;
                }

                // Height of `cur` shrank.
                0 => self.set_balance(cur, 0),

                -2 | 2 => {
                    let heavy = balance::heavy_side(new_balance);
                    let s = heavy.sign();

                    let child = self
                        .child(cur, heavy)
                        .unwrap_or_else(|| unreachable!("{cur:?}: heavy side has no child"));
                    let child_balance = self.balance(child);

                    if child_balance == s {
                        tracing::trace!(?cur, ?child, ?heavy, "remove: single rotation");

                        self.rotate(cur, !heavy);
                        self.set_balance(cur, 0);
                        self.set_balance(child, 0);

                        // The subtree lost a level; keep going.
                    } else if child_balance == 0 {
                        tracing::trace!(?cur, ?child, ?heavy, "remove: single rotation, stop");

                        self.rotate(cur, !heavy);
                        self.set_balance(cur, s);
                        self.set_balance(child, -s);

                        // The subtree kept its height.
                        return;
                    } else {
                        let grandchild = self
                            .child(child, !heavy)
                            .unwrap_or_else(|| unreachable!("{child:?}: inner side has no child"));

                        tracing::trace!(
                            ?cur,
                            ?child,
                            ?grandchild,
                            ?heavy,
                            "remove: double rotation"
                        );

                        let table = balance::double_rotation(heavy, self.balance(grandchild));
                        self.rotate(child, heavy);
                        self.rotate(cur, !heavy);
                        self.set_balance(cur, table.top);
                        self.set_balance(child, table.mid);
                        self.set_balance(grandchild, table.bottom);

                        // `grandchild` is now one level lower than `cur` was, so the subtree lost
                        // a level; keep going.
                    }
                }

                b => unreachable!("{cur:?}: balance {b} after removal"),
            }

            opt_cur = parent;
            diff = parent_diff;
        }
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        tracing::debug!(len = self.len(), "clearing tree");

        self.arena.clear();
        self.root = None;
    }

    // Rotation and swap primitives ===========================================

    // Performs a rotation, moving `up` up and its parent `down` down.
    //
    // The balances of affected nodes are not updated.
    fn rotate_at(&mut self, down: NodeId, up: NodeId) {
        debug_assert_eq!(self.parent(up), Some(down));

        // - `down` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
        let dir = if self.links(down).right() == Some(up) {
            Dir::Left
        } else {
            Dir::Right
        };

        let across = self.child(up, dir);
        self.links_mut(down).set_child(!dir, across);
        self.maybe_set_parent(across, Some(down));

        self.links_mut(up).set_child(dir, Some(down));
        let parent = self.links_mut(down).set_parent(Some(up));
        self.links_mut(up).set_parent(parent);

        self.replace_child_or_set_root(parent, down, Some(up));
    }

    /// Rotates the subtree at `node` to the left, raising its right child.
    fn rotate_left(&mut self, node: NodeId) {
        let up = self
            .child(node, Dir::Right)
            .unwrap_or_else(|| unreachable!("{node:?}: left rotation without a right child"));
        self.rotate_at(node, up);
    }

    /// Rotates the subtree at `node` to the right, raising its left child.
    fn rotate_right(&mut self, node: NodeId) {
        let up = self
            .child(node, Dir::Left)
            .unwrap_or_else(|| unreachable!("{node:?}: right rotation without a left child"));
        self.rotate_at(node, up);
    }

    #[inline]
    fn rotate(&mut self, node: NodeId, dir: Dir) {
        match dir {
            Dir::Left => self.rotate_left(node),
            Dir::Right => self.rotate_right(node),
        }
    }

    // Exchanges the tree positions of `a` and `b`, along with their balances, so that each
    // position keeps its balance. Keys and values stay with their nodes.
    fn node_swap(&mut self, a: NodeId, b: NodeId) {
        self.swap_positions(a, b);

        let (a, b) = self.arena.pair_mut(a, b);
        a.links.swap_balance(&mut b.links);
    }

    #[inline]
    fn balance(&self, node: NodeId) -> i8 {
        self.links(node).balance()
    }

    #[inline]
    fn set_balance(&mut self, node: NodeId, balance: i8) {
        self.links_mut(node).set_balance(balance);
    }
}

//! Plain binary search tree operations.
//!
//! Nothing in here reads or writes balance factors; the AVL layer in the crate root builds on
//! these primitives and keeps the balance bookkeeping to itself.

use core::{borrow::Borrow, cmp::Ordering};

use crate::{
    arena::NodeId,
    links::{Dir, Link, Links},
    AvlTree,
};

impl<K, V> AvlTree<K, V> {
    #[inline]
    pub(crate) fn links(&self, node: NodeId) -> &Links {
        &self.arena[node].links
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, node: NodeId) -> &mut Links {
        &mut self.arena[node].links
    }

    #[inline]
    pub(crate) fn parent(&self, node: NodeId) -> Link {
        self.links(node).parent()
    }

    #[inline]
    pub(crate) fn child(&self, node: NodeId, dir: Dir) -> Link {
        self.links(node).child(dir)
    }

    /// Returns the node holding `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match key.cmp(self.arena[cur].key.borrow()) {
                Ordering::Less => opt_cur = self.links(cur).left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = self.links(cur).right(),
            }
        }
    }

    /// Follows `dir` links from `root` as far as they go.
    pub(crate) fn extreme_in_subtree(&self, root: NodeId, dir: Dir) -> NodeId {
        let mut cur = root;

        while let Some(next) = self.child(cur, dir) {
            cur = next;
        }

        cur
    }

    pub(crate) fn first_node(&self) -> Link {
        self.root.map(|root| self.extreme_in_subtree(root, Dir::Left))
    }

    pub(crate) fn last_node(&self) -> Link {
        self.root.map(|root| self.extreme_in_subtree(root, Dir::Right))
    }

    // Returns the in-order neighbour of `node` in direction `dir`: the successor for `Right`,
    // the predecessor for `Left`.
    fn neighbour(&self, node: NodeId, dir: Dir) -> Link {
        if let Some(child) = self.child(node, dir) {
            return Some(self.extreme_in_subtree(child, !dir));
        }

        // Ascend until arriving from the `!dir` side.
        let mut cur = node;
        while let Some(parent) = self.parent(cur) {
            if self.which_child(parent, cur) == !dir {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }

    pub(crate) fn predecessor(&self, node: NodeId) -> Link {
        self.neighbour(node, Dir::Left)
    }

    pub(crate) fn successor(&self, node: NodeId) -> Link {
        self.neighbour(node, Dir::Right)
    }

    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.links(parent).left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(self.links(parent).right(), Some(child));
            Dir::Right
        }
    }

    pub(crate) fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self.links_mut(node).set_parent(parent);
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent pointer is not updated.
    pub(crate) fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: Link) {
        let dir = self.which_child(parent, old_child);

        if let Some(new_child) = new_child {
            debug_assert_ne!(
                self.child(parent, !dir),
                Some(new_child),
                "`new_child` must not be a child of `parent`"
            );
        }

        self.links_mut(parent).set_child(dir, new_child);
    }

    #[inline]
    pub(crate) fn replace_child_or_set_root(
        &mut self,
        parent: Link,
        old_child: NodeId,
        new_child: Link,
    ) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => self.root = new_child,
        }
    }

    /// Exchanges the tree positions of `a` and `b`.
    ///
    /// Each node keeps its key, value and balance; only parent and child links move, and every
    /// neighbour pointing at one of them is redirected to the other. Works for adjacent nodes.
    pub(crate) fn swap_positions(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }

        let mut neighbours: Vec<NodeId> = Vec::with_capacity(6);
        for node in [a, b] {
            let links = self.links(node);
            for link in [links.parent(), links.left(), links.right()]
                .into_iter()
                .flatten()
            {
                if link != a && link != b && !neighbours.contains(&link) {
                    neighbours.push(link);
                }
            }
        }

        {
            let (na, nb) = self.arena.pair_mut(a, b);
            na.links.swap_position(&mut nb.links);
            na.links.remap(a, b);
            nb.links.remap(a, b);
        }

        for node in neighbours {
            self.links_mut(node).remap(a, b);
        }

        if self.root == Some(a) {
            self.root = Some(b);
        } else if self.root == Some(b) {
            self.root = Some(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    fn tree(keys: &[u32]) -> AvlTree<u32, ()> {
        keys.iter().map(|&k| (k, ())).collect()
    }

    #[test]
    fn neighbours_follow_key_order() {
        let tree = tree(&[50, 20, 80, 10, 30, 70, 90, 25]);

        let mut cur = tree.first_node();
        let mut forward = Vec::new();
        while let Some(node) = cur {
            forward.push(tree.arena[node].key);
            cur = tree.successor(node);
        }
        assert_eq!(forward, [10, 20, 25, 30, 50, 70, 80, 90]);

        let mut cur = tree.last_node();
        let mut backward = Vec::new();
        while let Some(node) = cur {
            backward.push(tree.arena[node].key);
            cur = tree.predecessor(node);
        }
        forward.reverse();
        assert_eq!(backward, forward);
    }

    #[test]
    fn swap_adjacent_positions() {
        // 20 is the root, 10 its left child.
        let mut tree = tree(&[20, 10, 30]);
        let root = tree.find(&20).unwrap();
        let left = tree.find(&10).unwrap();

        tree.swap_positions(root, left);

        assert_eq!(tree.root, Some(left));
        assert_eq!(tree.links(left).left(), Some(root));
        assert_eq!(tree.links(root).parent(), Some(left));
        assert_eq!(tree.links(root).left(), None);

        let right = tree.links(left).right().unwrap();
        assert_eq!(tree.arena[right].key, 30);
        assert_eq!(tree.parent(right), Some(left));

        tree.swap_positions(root, left);
        tree.assert_invariants();
    }

    #[test]
    fn swap_distant_positions() {
        let mut tree = tree(&[50, 20, 80, 10, 30, 70, 90]);
        let a = tree.find(&20).unwrap();
        let b = tree.find(&90).unwrap();

        tree.swap_positions(a, b);
        assert_eq!(tree.parent(a), tree.find(&80));
        assert_eq!(tree.parent(b), tree.root);
        assert_eq!(tree.links(b).left(), tree.find(&10));

        tree.swap_positions(a, b);
        tree.assert_invariants();
    }
}

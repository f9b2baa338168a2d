//! Slot storage for tree nodes.
//!
//! Every node lives in a single `Vec`. Vacant slots are threaded into a free list through their
//! `next_free` field so that removals never shift live nodes and handles stay stable.

use core::{
    mem,
    ops::{Index, IndexMut},
};

use crate::links::{Link, Links};

/// A stable handle to a node in an [`Arena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) links: Links,
    pub(crate) key: K,
    pub(crate) value: V,
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Link },
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Link,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Stores `node`, reusing a vacant slot if one exists.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.len += 1;

        match self.free {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
                match slot {
                    Slot::Vacant { next_free } => self.free = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                id
            }

            None => {
                let index = u32::try_from(self.slots.len()).expect("arena exceeds u32::MAX nodes");
                self.slots.push(Slot::Occupied(node));
                NodeId(index)
            }
        }
    }

    /// Vacates the slot at `id`, returning the node that lived there.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };

        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free = Some(id);
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => unreachable!("double free of {id:?}"),
        }
    }

    /// Returns mutable references to two distinct nodes.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
        assert_ne!(a, b, "`pair_mut` requires distinct nodes");

        let (lo, hi, flipped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };

        let (head, tail) = self.slots.split_at_mut(hi);
        let (first, second) = match (&mut head[lo], &mut tail[0]) {
            (Slot::Occupied(x), Slot::Occupied(y)) => (x, y),
            _ => unreachable!("`pair_mut` on a vacant slot"),
        };

        if flipped {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Drops every node and releases the backing storage.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.len = 0;
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node handle {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node handle {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: u32) -> Node<u32, ()> {
        Node {
            links: Links::new(None),
            key,
            value: (),
        }
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();

        let a = arena.alloc(node(1));
        let b = arena.alloc(node(2));
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.free(a).key, 1);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(node(3));
        assert_eq!(c, a);
        assert_eq!(arena[c].key, 3);
        assert_eq!(arena[b].key, 2);
    }

    #[test]
    fn pair_mut_preserves_order() {
        let mut arena = Arena::new();

        let a = arena.alloc(node(1));
        let b = arena.alloc(node(2));

        let (x, y) = arena.pair_mut(b, a);
        assert_eq!((x.key, y.key), (2, 1));

        let (x, y) = arena.pair_mut(a, b);
        assert_eq!((x.key, y.key), (1, 2));
    }

    #[test]
    #[should_panic]
    fn dangling_handle_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(node(1));
        arena.free(a);

        let _ = &arena[a];
    }
}

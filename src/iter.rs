use core::iter::FusedIterator;

use crate::{links::Link, AvlTree};

/// An iterator over the entries of an [`AvlTree`], in ascending key order.
pub struct Iter<'tree, K, V> {
    tree: &'tree AvlTree<K, V>,

    front: Link,
    back: Link,

    len: usize,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(crate) fn new(tree: &'tree AvlTree<K, V>) -> Self {
        Iter {
            tree,

            front: tree.first_node(),
            back: tree.last_node(),
            len: tree.len(),
        }
    }
}

impl<'tree, K, V> Clone for Iter<'tree, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        // `len` counts the nodes between `front` and `back` inclusive, so once it reaches zero the
        // two ends have crossed.
        if self.len == 0 {
            return None;
        }

        let cur = self.front?;
        self.front = self.tree.successor(cur);
        self.len -= 1;

        let node = &self.tree.arena[cur];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'tree, K, V> DoubleEndedIterator for Iter<'tree, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.back?;
        self.back = self.tree.predecessor(cur);
        self.len -= 1;

        let node = &self.tree.arena[cur];
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of an [`AvlTree`], in ascending order.
pub struct Keys<'tree, K, V> {
    inner: Iter<'tree, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'tree, K, V> Iterator for Keys<'tree, K, V> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of an [`AvlTree`], ordered by key.
pub struct Values<'tree, K, V> {
    inner: Iter<'tree, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'tree, K, V> Iterator for Values<'tree, K, V> {
    type Item = &'tree V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of an [`AvlTree`], in ascending key order.
pub struct IntoIter<K, V> {
    tree: AvlTree<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> AvlTree<K, V> {
    /// Returns an iterator over the entries of the tree, in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns an iterator over the keys of the tree, in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the tree, ordered by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K, V> IntoIterator for AvlTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

impl<'tree, K, V> IntoIterator for &'tree AvlTree<K, V> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn iterates_both_ends() {
        let tree: AvlTree<u32, char> = [(3, 'c'), (1, 'a'), (4, 'd'), (2, 'b')]
            .into_iter()
            .collect();

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some((&1, &'a')));
        assert_eq!(iter.next_back(), Some((&4, &'d')));
        assert_eq!(iter.next(), Some((&2, &'b')));
        assert_eq!(iter.next_back(), Some((&3, &'c')));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        assert_eq!(tree.keys().rev().copied().collect::<Vec<_>>(), [4, 3, 2, 1]);
        assert_eq!(tree.values().collect::<String>(), "abcd");
    }

    #[test]
    fn into_iter_drains_in_order() {
        let tree: AvlTree<u32, u32> = (0..100).rev().map(|k| (k, k * 2)).collect();

        let drained: Vec<_> = tree.into_iter().collect();
        assert_eq!(drained, (0..100).map(|k| (k, k * 2)).collect::<Vec<_>>());
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: AvlTree<u32, ()> = AvlTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
    }
}

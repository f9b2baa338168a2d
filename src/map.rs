use core::{borrow::Borrow, fmt, ops::Index};

use crate::AvlTree;

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, Q> Index<&Q> for AvlTree<K, V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the tree.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTree<K, V> {
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTree<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

// Two trees are equal when they hold the same entries, whatever their shapes.
impl<K: PartialEq, V: PartialEq> PartialEq for AvlTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTree<K, V> {}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn debug_lists_entries_in_order() {
        let tree = AvlTree::from([(2, "two"), (1, "one")]);
        assert_eq!(format!("{tree:?}"), r#"{1: "one", 2: "two"}"#);
    }

    #[test]
    fn index_by_borrowed_key() {
        let tree = AvlTree::from([(String::from("a"), 1), (String::from("b"), 2)]);
        assert_eq!(tree["b"], 2);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_missing_key_panics() {
        let tree = AvlTree::from([(1, 1)]);
        let _ = tree[&2];
    }

    #[test]
    fn equality_ignores_shape() {
        let ascending: AvlTree<u32, ()> = (0..16).map(|k| (k, ())).collect();
        let descending: AvlTree<u32, ()> = (0..16).rev().map(|k| (k, ())).collect();

        assert_eq!(ascending, descending);
    }
}

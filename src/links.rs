use core::{mem, ops::Not};

use crate::arena::NodeId;

pub(crate) type Link = Option<NodeId>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    /// The balance contribution of a subtree growing on this side.
    #[inline]
    pub(crate) const fn sign(self) -> i8 {
        match self {
            Dir::Left => -1,
            Dir::Right => 1,
        }
    }
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Structural state of a single node.
///
/// `parent` is a back-reference used for upward traversal only; the arena owns every node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Links {
    parent: Link,
    children: [Link; 2],
    balance: i8,
}

impl Links {
    #[must_use]
    pub(crate) const fn new(parent: Link) -> Self {
        Self {
            parent,
            children: [None; 2],
            balance: 0,
        }
    }

    #[inline]
    pub(crate) fn balance(&self) -> i8 {
        self.balance
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }

    #[inline]
    pub(crate) fn set_balance(&mut self, balance: i8) {
        debug_assert!((-2..=2).contains(&balance), "balance out of range: {balance}");
        self.balance = balance;
    }

    pub(crate) fn swap_balance(&mut self, other: &mut Links) {
        mem::swap(&mut self.balance, &mut other.balance);
    }

    /// Rewrites every link equal to `a` into `b` and vice versa.
    pub(crate) fn remap(&mut self, a: NodeId, b: NodeId) {
        let swap = |link: Link| match link {
            Some(x) if x == a => Some(b),
            Some(x) if x == b => Some(a),
            other => other,
        };

        self.parent = swap(self.parent);
        self.children = self.children.map(swap);
    }

    /// Exchanges positional links (parent and children) with `other`, leaving balances in place.
    pub(crate) fn swap_position(&mut self, other: &mut Links) {
        mem::swap(&mut self.parent, &mut other.parent);
        mem::swap(&mut self.children, &mut other.children);
    }
}

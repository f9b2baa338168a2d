// Balance factors are `h(right) - h(left)`. A stable tree only holds -1, 0 and +1; +-2 exists
// transiently while a fixup is deciding which rotation to perform.
//
// Both fixups share the same double rotation shape. Name the three nodes involved:
//
// - `top`:    the node whose balance reached +-2,
// - `mid`:    its child on the heavy side,
// - `bottom`: `mid`'s child on the side opposite the heavy side.
//
// After rotating `mid` away from the heavy side and then `top` toward it, `bottom` is the new
// subtree root and always ends up balanced. The other two depend only on how `bottom` leaned
// beforehand.

use crate::links::Dir;

/// Balances assigned after a double rotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DoubleRotation {
    pub(crate) top: i8,
    pub(crate) mid: i8,
    pub(crate) bottom: i8,
}

/// Looks up the post-rotation balances for a double rotation on the `heavy` side, given the
/// balance `bottom` held before either rotation.
pub(crate) fn double_rotation(heavy: Dir, bottom: i8) -> DoubleRotation {
    let s = heavy.sign();

    let (top, mid) = match bottom {
        // `bottom` leaned the same way as the imbalance: its outer subtree moves under `top`.
        b if b == s => (-s, 0),
        0 => (0, 0),
        // `bottom` leaned away from the imbalance: its inner subtree moves under `mid`.
        b if b == -s => (0, s),
        b => unreachable!("unstable balance {b} below a double rotation"),
    };

    DoubleRotation {
        top,
        mid,
        bottom: 0,
    }
}

/// The side whose subtree is taller, for a balance of magnitude 2.
pub(crate) fn heavy_side(balance: i8) -> Dir {
    debug_assert_eq!(balance.abs(), 2);

    if balance < 0 {
        Dir::Left
    } else {
        Dir::Right
    }
}

/// Returns `true` if `balance` is permitted in a stable tree.
#[inline]
pub(crate) fn is_stable(balance: i8) -> bool {
    (-1..=1).contains(&balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_heavy_table() {
        // Left-right case: `bottom` is the right child of a left child.
        assert_eq!(
            double_rotation(Dir::Left, -1),
            DoubleRotation {
                top: 1,
                mid: 0,
                bottom: 0
            }
        );
        assert_eq!(
            double_rotation(Dir::Left, 0),
            DoubleRotation {
                top: 0,
                mid: 0,
                bottom: 0
            }
        );
        assert_eq!(
            double_rotation(Dir::Left, 1),
            DoubleRotation {
                top: 0,
                mid: -1,
                bottom: 0
            }
        );
    }

    #[test]
    fn right_heavy_table() {
        assert_eq!(
            double_rotation(Dir::Right, 1),
            DoubleRotation {
                top: -1,
                mid: 0,
                bottom: 0
            }
        );
        assert_eq!(
            double_rotation(Dir::Right, 0),
            DoubleRotation {
                top: 0,
                mid: 0,
                bottom: 0
            }
        );
        assert_eq!(
            double_rotation(Dir::Right, -1),
            DoubleRotation {
                top: 0,
                mid: 1,
                bottom: 0
            }
        );
    }

    #[test]
    fn heavy_side_of_imbalance() {
        assert_eq!(heavy_side(-2), Dir::Left);
        assert_eq!(heavy_side(2), Dir::Right);
    }

    #[test]
    fn stable_range() {
        assert!([-1, 0, 1].into_iter().all(is_stable));
        assert!(![-2, 2].into_iter().any(is_stable));
    }
}

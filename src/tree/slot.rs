//! Array-layout slot indices
//!
//! Slot i (0-based) has children 2i+1 (left) and 2i+2 (right).
//! Position n = i + 1 is the 1-based heap number used by the cost weights.
//!
//! Indices live in a u128 so that a chain of up to 128 keys stays
//! addressable; any child whose position would not fit is reported as absent.

use std::fmt;

/// Index of a slot in the implicit complete-binary-tree layout
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u128);

impl SlotIndex {
    /// Slot 0, always holding the first-placed key
    pub const ROOT: SlotIndex = SlotIndex(0);

    /// Wrap a raw 0-based index.
    ///
    /// Panics on `u128::MAX`, whose position is unrepresentable.
    pub fn new(index: u128) -> Self {
        assert!(index < u128::MAX, "slot index {index} has no 1-based position");
        Self(index)
    }

    /// Raw 0-based index
    #[inline]
    pub fn get(self) -> u128 {
        self.0
    }

    /// 1-based position n = i + 1
    #[inline]
    pub fn position(self) -> u128 {
        self.0 + 1
    }

    /// Check if this is slot 0
    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Left child 2i+1, if addressable
    pub fn left_child(self) -> Option<SlotIndex> {
        self.child(1)
    }

    /// Right child 2i+2, if addressable
    pub fn right_child(self) -> Option<SlotIndex> {
        self.child(2)
    }

    fn child(self, offset: u128) -> Option<SlotIndex> {
        self.0
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(offset))
            .filter(|index| *index < u128::MAX)
            .map(SlotIndex)
    }

    /// Parent ⌊(i-1)/2⌋, `None` for the root
    pub fn parent(self) -> Option<SlotIndex> {
        if self.is_root() {
            None
        } else {
            Some(SlotIndex((self.0 - 1) / 2))
        }
    }

    /// Level of the slot, root = 0 (⌊log2 n⌋)
    #[inline]
    pub fn level(self) -> u32 {
        u128::BITS - 1 - self.position().leading_zeros()
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

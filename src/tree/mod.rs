//! Greedy weighted binary search tree
//!
//! Keys are laid out by slot index in an implicit complete-binary-tree array.
//! Only occupied slots are stored: a greedy build can produce a chain, and a
//! chain of N keys reaches index 2^N, far beyond any dense allocation.
//!
//! Iteration is always in increasing slot order, which is level order.

mod builder;
mod slot;

pub use builder::{first_fit, RootRank, TreeBuilder};
pub use slot::SlotIndex;

use std::collections::BTreeMap;

use crate::selector::{Rank, Selection};

/// Largest key count a tree can address.
///
/// N keys reach at most level N-1; level 127 is the deepest whose
/// positions fit in a u128.
pub const MAX_KEYS: usize = 128;

/// Key stored in an occupied slot
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    /// Rank used for left/right comparisons
    pub rank: Rank,

    /// Access probability
    pub probability: f64,
}

impl Key {
    /// Create a key
    pub fn new(rank: Rank, probability: f64) -> Self {
        Self { rank, probability }
    }
}

impl From<Selection> for Key {
    fn from(selection: Selection) -> Self {
        Self::new(selection.rank, selection.probability)
    }
}

/// Tree produced by one greedy build
///
/// Filled once by [`TreeBuilder`], then read-only.
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Default)]
pub struct GreedyTree {
    /// Occupied slots, keyed (and therefore ordered) by index
    slots: BTreeMap<SlotIndex, Key>,

    /// Slots in the order keys were placed
    order: Vec<SlotIndex>,

    /// Ranks the build never managed to place
    unplaced: Vec<Rank>,

    /// Length of the probability sequence the tree was built from
    input_len: usize,
}

impl GreedyTree {
    /// Empty tree for an input of `input_len` probabilities
    pub(crate) fn with_input_len(input_len: usize) -> Self {
        Self {
            input_len,
            ..Self::default()
        }
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing was placed
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Length of the input sequence
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Key at the root slot
    pub fn root(&self) -> Option<&Key> {
        self.get(SlotIndex::ROOT)
    }

    /// Key at `slot`, if occupied
    pub fn get(&self, slot: SlotIndex) -> Option<&Key> {
        self.slots.get(&slot)
    }

    /// Whether `slot` holds a key
    pub fn is_occupied(&self, slot: SlotIndex) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Whether the left child of `slot` is occupied.
    ///
    /// An unaddressable child counts as occupied so nothing is placed there.
    pub fn has_left_child(&self, slot: SlotIndex) -> bool {
        slot.left_child()
            .map_or(true, |child| self.is_occupied(child))
    }

    /// Whether the right child of `slot` is occupied (see [`Self::has_left_child`]).
    pub fn has_right_child(&self, slot: SlotIndex) -> bool {
        slot.right_child()
            .map_or(true, |child| self.is_occupied(child))
    }

    /// Occupied slots in increasing index (level) order
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &Key)> + '_ {
        self.slots.iter().map(|(slot, key)| (*slot, key))
    }

    /// Occupied slots in placement order
    pub fn placements(&self) -> impl Iterator<Item = (SlotIndex, &Key)> + '_ {
        self.order
            .iter()
            .filter_map(|slot| self.slots.get(slot).map(|key| (*slot, key)))
    }

    /// Ranks that were never placed, ascending
    pub fn unplaced(&self) -> &[Rank] {
        &self.unplaced
    }

    /// True when every input rank landed in a slot
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty() && self.len() == self.input_len
    }

    /// Number of levels in use (0 for an empty tree)
    pub fn height(&self) -> u32 {
        self.slots
            .keys()
            .next_back()
            .map_or(0, |slot| slot.level() + 1)
    }

    /// Write `key` into a vacant slot whose parent is occupied.
    pub(crate) fn place(&mut self, slot: SlotIndex, key: Key) {
        debug_assert!(!self.is_occupied(slot), "slot {slot} already occupied");
        debug_assert!(
            slot.parent().map_or(true, |parent| self.is_occupied(parent)),
            "slot {slot} would be an orphan"
        );
        self.slots.insert(slot, key);
        self.order.push(slot);
    }

    pub(crate) fn set_unplaced(&mut self, unplaced: Vec<Rank>) {
        self.unplaced = unplaced;
    }
}

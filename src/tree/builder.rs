//! Greedy level-order first-fit insertion
//!
//! Ranks are placed in descending probability order. Each rank goes to the
//! first occupied slot (in index order) that accepts it:
//!   rank < slot rank and the left child is vacant  → left child
//!   rank > slot rank and the right child is vacant → right child
//!
//! This is not a root-to-leaf BST descent; the scan is over the whole
//! array, so high-probability keys settle near the top.

use tracing::{debug, warn};

use super::{GreedyTree, Key, SlotIndex, MAX_KEYS};
use crate::selector::{ProbabilityTable, Rank, Selection};
use crate::GreedyBstError;

/// How the root's comparison rank is derived from its selection
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootRank {
    /// Root uses its 1-based rank, like every other key
    #[default]
    OneBased,

    /// Root uses its 0-based input position while other keys use 1-based
    /// ranks. Only the root's comparison rank changes; the root is still
    /// an occupied slot and still counts toward the cost.
    ZeroBased,
}

impl RootRank {
    /// Rank the root is compared by
    pub fn rank_of(self, selection: Selection) -> Rank {
        match self {
            RootRank::OneBased => selection.rank,
            RootRank::ZeroBased => selection.position(),
        }
    }
}

/// First slot (in level order) that can take `rank` as a child.
///
/// `None` means no occupied slot has a matching vacant child.
pub fn first_fit(tree: &GreedyTree, rank: Rank) -> Option<SlotIndex> {
    for (slot, key) in tree.slots() {
        if rank < key.rank && !tree.has_left_child(slot) {
            return slot.left_child();
        }
        if rank > key.rank && !tree.has_right_child(slot) {
            return slot.right_child();
        }
    }
    None
}

/// Builds a [`GreedyTree`] from a probability sequence
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root_rank: RootRank,
    max_keys: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(RootRank::default())
    }
}

impl TreeBuilder {
    /// Builder with the given root policy and the full key capacity
    pub fn new(root_rank: RootRank) -> Self {
        Self {
            root_rank,
            max_keys: MAX_KEYS,
        }
    }

    /// Lower the accepted key count (clamped to [`MAX_KEYS`])
    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys.min(MAX_KEYS);
        self
    }

    /// Root policy in effect
    pub fn root_rank(&self) -> RootRank {
        self.root_rank
    }

    /// Largest accepted input length
    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// Run the greedy build.
    ///
    /// Index i of `probabilities` is the probability of rank i + 1. Values
    /// are assumed finite and non-negative.
    ///
    /// Every remaining rank is taken in descending probability order. A rank
    /// with no eligible slot is dropped and the build moves on to the next
    /// one; dropped ranks are reported through [`GreedyTree::unplaced`].
    pub fn build(&self, probabilities: &[f64]) -> Result<GreedyTree, GreedyBstError> {
        if probabilities.len() > self.max_keys {
            return Err(GreedyBstError::CapacityExceeded {
                keys: probabilities.len(),
                max: self.max_keys,
            });
        }

        let mut table = ProbabilityTable::new(probabilities);
        let mut tree = GreedyTree::with_input_len(probabilities.len());

        let Some(root) = table.take_max() else {
            return Ok(tree);
        };
        let root_key = Key::new(self.root_rank.rank_of(root), root.probability);
        debug!(rank = root_key.rank, probability = root_key.probability, "placed root");
        tree.place(SlotIndex::ROOT, root_key);

        let mut unplaced: Vec<Rank> = Vec::new();

        for _ in 1..probabilities.len() {
            let Some(next) = table.take_max() else {
                break;
            };

            match first_fit(&tree, next.rank) {
                Some(slot) => {
                    debug!(rank = next.rank, probability = next.probability, %slot, "placed key");
                    tree.place(slot, Key::from(next));
                }
                None => {
                    debug!(rank = next.rank, "no eligible slot, dropping key");
                    unplaced.push(next.rank);
                }
            }
        }

        unplaced.extend(table.remaining_ranks());
        unplaced.sort_unstable();
        if !unplaced.is_empty() {
            warn!(
                placed = tree.len(),
                total = probabilities.len(),
                ?unplaced,
                "greedy build left keys unplaced"
            );
        }
        tree.set_unplaced(unplaced);

        Ok(tree)
    }
}

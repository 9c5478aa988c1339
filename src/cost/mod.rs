//! Expected search cost of a greedy tree
//!
//! cost = Σ probability(slot) × weight(slot) over occupied slots.
//!
//! The legacy weight for 1-based position n is
//!   n = 1 → 1, n = 2 → 2, otherwise ⌈log2 n⌉
//! which under-reports true depth (⌊log2 n⌋ + 1) by one level whenever
//! n is a power of two greater than 2.

use crate::tree::{GreedyTree, Key, SlotIndex};

/// ⌈log2 n⌉ for n ≥ 1, computed exactly on integers
#[inline]
fn ceil_log2(n: u128) -> u32 {
    if n <= 1 {
        0
    } else {
        u128::BITS - (n - 1).leading_zeros()
    }
}

/// Legacy depth weight for 1-based position `n`
pub fn depth_weight(n: u128) -> u32 {
    match n {
        1 => 1,
        2 => 2,
        _ => ceil_log2(n),
    }
}

/// True depth of 1-based position `n` in array layout, root = 1
pub fn exact_depth(n: u128) -> u32 {
    debug_assert!(n >= 1, "positions are 1-based");
    u128::BITS - n.leading_zeros()
}

/// Depth weighting applied per slot
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightFormula {
    /// [`depth_weight`], the historical output of the tool
    #[default]
    Legacy,

    /// [`exact_depth`]
    Exact,
}

impl WeightFormula {
    /// Weight of `slot`
    #[inline]
    pub fn weight(self, slot: SlotIndex) -> u32 {
        match self {
            WeightFormula::Legacy => depth_weight(slot.position()),
            WeightFormula::Exact => exact_depth(slot.position()),
        }
    }
}

/// Computes the probability-weighted cost of a tree
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEvaluator {
    formula: WeightFormula,
}

impl CostEvaluator {
    /// Evaluator using `formula`
    pub fn new(formula: WeightFormula) -> Self {
        Self { formula }
    }

    /// Formula in effect
    pub fn formula(&self) -> WeightFormula {
        self.formula
    }

    /// Expected cost of a built tree
    pub fn expected_cost(&self, tree: &GreedyTree) -> f64 {
        self.weighted_cost(tree.slots().map(|(slot, key)| (slot, Some(key))))
    }

    /// Cost over an arbitrary slot stream; empty slots contribute nothing.
    pub fn weighted_cost<'a, I>(&self, slots: I) -> f64
    where
        I: IntoIterator<Item = (SlotIndex, Option<&'a Key>)>,
    {
        slots
            .into_iter()
            .filter_map(|(slot, key)| key.map(|key| (slot, key)))
            .map(|(slot, key)| key.probability * f64::from(self.formula.weight(slot)))
            .sum()
    }
}

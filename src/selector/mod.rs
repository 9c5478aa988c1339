//! Destructive maximum selection over a probability table
//!
//! Ranks are handed out in descending probability order.
//! Ties resolve to the lowest rank (first occurrence in scan order).
//! Consumed entries are masked out, never overwritten.

use bitvec::prelude::*;

/// 1-based identifier of a key, derived from its position in the input.
pub type Rank = usize;

/// One selection result: a rank and the probability it carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// 1-based rank of the selected entry
    pub rank: Rank,

    /// Probability stored for that rank
    pub probability: f64,
}

impl Selection {
    /// 0-based position of the selected entry in the input sequence
    #[inline]
    pub fn position(&self) -> usize {
        self.rank - 1
    }
}

/// Rank → probability table with a consumed mask
///
/// Owned by a single build; there is no shared consumption state.
#[derive(Debug, Clone)]
pub struct ProbabilityTable {
    probabilities: Vec<f64>,

    /// One bit per rank, set once the entry has been taken
    consumed: BitVec,
}

impl ProbabilityTable {
    /// Create a table where index `i` holds the probability of rank `i + 1`.
    pub fn new(probabilities: &[f64]) -> Self {
        Self {
            probabilities: probabilities.to_vec(),
            consumed: bitvec![0; probabilities.len()],
        }
    }

    /// Number of ranks in the table (consumed or not).
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// True when the table was built from an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Number of entries still available for selection.
    pub fn remaining(&self) -> usize {
        self.consumed.count_zeros()
    }

    /// True once every entry has been taken.
    pub fn is_exhausted(&self) -> bool {
        self.consumed.all()
    }

    /// Whether `rank` has already been taken.
    pub fn is_consumed(&self, rank: Rank) -> bool {
        rank >= 1 && self.consumed.get(rank - 1).map(|bit| *bit).unwrap_or(false)
    }

    /// Ranks not yet taken, ascending
    pub fn remaining_ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.consumed.iter_zeros().map(|position| position + 1)
    }

    /// Current maximum without mutating state; `None` when exhausted.
    pub fn peek(&self) -> Option<Selection> {
        let mut best: Option<Selection> = None;

        for position in self.consumed.iter_zeros() {
            let probability = self.probabilities[position];
            // Strict comparison keeps the first occurrence on ties.
            let better = match best {
                Some(current) => probability > current.probability,
                None => true,
            };
            if better {
                best = Some(Selection {
                    rank: position + 1,
                    probability,
                });
            }
        }

        best
    }

    /// Largest unconsumed probability.
    pub fn peek_max(&self) -> Option<f64> {
        self.peek().map(|selection| selection.probability)
    }

    /// Rank holding the largest unconsumed probability.
    pub fn peek_max_rank(&self) -> Option<Rank> {
        self.peek().map(|selection| selection.rank)
    }

    /// Select the current maximum and mark it consumed.
    ///
    /// A subsequent call yields the next-highest remaining entry.
    pub fn take_max(&mut self) -> Option<Selection> {
        let selection = self.peek()?;
        self.consumed.set(selection.position(), true);
        Some(selection)
    }
}

impl Iterator for ProbabilityTable {
    type Item = Selection;

    fn next(&mut self) -> Option<Self::Item> {
        self.take_max()
    }
}

//! # Greedy Weighted Binary Search Trees
//!
//! Approximates a weighted binary search tree over ranks 1..N from their
//! access probabilities, then scores it by expected search cost.
//!
//! ## Core Algorithm
//!
//! 1. **Selection**: consume probabilities in descending order (ties → lowest rank)
//! 2. **Greedy insertion**: each rank lands in the first rank-compatible vacant
//!    child slot found scanning the array layout in level order
//! 3. **Cost**: Σ probability × depth weight, weight = ⌈log2 n⌉ for position n
//!    (with n = 1 → 1 and n = 2 → 2)
//!
//! This is a heuristic, not an optimal-BST solver.
//!
//! ## Usage Example
//!
//! ```
//! use greedy_bst::{BuildConfig, GreedyBst};
//!
//! let pipeline = GreedyBst::new(BuildConfig::default());
//! let result = pipeline.evaluate(&[0.1, 0.2, 0.4, 0.3])?;
//! assert!((result.cost - 1.6).abs() < 1e-9);
//! # Ok::<(), greedy_bst::GreedyBstError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod cost;       // Expected-cost evaluation
pub mod dataset;    // Data file records
pub mod report;     // Text rendering of costs and layouts
pub mod selector;   // Descending-probability selection
pub mod tree;       // Array-layout tree and greedy builder

// Re-exports for convenience
pub use cost::{depth_weight, exact_depth, CostEvaluator, WeightFormula};
pub use dataset::{DatasetError, DatasetReader, DatasetRecord};
pub use selector::{ProbabilityTable, Rank, Selection};
pub use tree::{GreedyTree, Key, RootRank, SlotIndex, TreeBuilder, MAX_KEYS};

use thiserror::Error;
use tracing::{debug, info_span};

/// Configuration parameters for a build/evaluate run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Rank the root is compared by
    pub root_rank: RootRank,

    /// Depth weighting used by the cost
    pub weights: WeightFormula,

    /// Largest accepted record length (at most [`MAX_KEYS`])
    pub max_keys: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_rank: RootRank::OneBased,
            weights: WeightFormula::Legacy,
            max_keys: MAX_KEYS,
        }
    }
}

impl BuildConfig {
    /// Default settings with the root compared by its 0-based position
    ///
    /// Only the root's comparison rank differs; the build and cost rules
    /// are otherwise unchanged.
    pub fn zero_based_root() -> Self {
        Self {
            root_rank: RootRank::ZeroBased,
            ..Self::default()
        }
    }
}

/// Result of one record
#[derive(Debug, Clone)]
pub struct RecordResult {
    /// Tree built for the record
    pub tree: GreedyTree,

    /// Expected search cost
    pub cost: f64,
}

/// Errors that can occur while building or evaluating
#[derive(Error, Debug)]
pub enum GreedyBstError {
    /// More keys than the tree can address
    #[error("{keys} keys exceed tree capacity of {max}")]
    CapacityExceeded {
        /// Keys in the record
        keys: usize,
        /// Configured maximum
        max: usize,
    },

    /// Probability that is negative or not finite
    #[error("invalid probability {value} for rank {rank}")]
    InvalidProbability {
        /// Rank carrying the value
        rank: Rank,
        /// Offending value
        value: f64,
    },

    /// Data file could not be read or parsed
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Build/evaluate pipeline
///
/// Records are independent; one pipeline can process any number of them.
#[derive(Debug, Clone)]
pub struct GreedyBst {
    builder: TreeBuilder,
    evaluator: CostEvaluator,
}

impl GreedyBst {
    /// Create a pipeline from `config`
    pub fn new(config: BuildConfig) -> Self {
        Self {
            builder: TreeBuilder::new(config.root_rank).with_max_keys(config.max_keys),
            evaluator: CostEvaluator::new(config.weights),
        }
    }

    /// Builder in use
    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    /// Evaluator in use
    pub fn evaluator(&self) -> &CostEvaluator {
        &self.evaluator
    }

    /// Build the greedy tree for one probability sequence and score it.
    pub fn evaluate(&self, probabilities: &[f64]) -> Result<RecordResult, GreedyBstError> {
        if let Some((position, value)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(GreedyBstError::InvalidProbability {
                rank: position + 1,
                value: *value,
            });
        }

        let tree = self.builder.build(probabilities)?;
        let cost = self.evaluator.expected_cost(&tree);
        debug!(keys = tree.len(), height = tree.height(), cost, "evaluated record");

        Ok(RecordResult { tree, cost })
    }

    /// Evaluate every record from a reader, in order.
    ///
    /// Stops at the first read or build error.
    pub fn evaluate_records<I>(&self, records: I) -> Result<Vec<RecordResult>, GreedyBstError>
    where
        I: IntoIterator<Item = Result<DatasetRecord, DatasetError>>,
    {
        let mut results = Vec::new();

        for record in records {
            let record = record?;
            let span = info_span!("record", line = record.line, label = %record.label);
            let _enter = span.enter();
            results.push(self.evaluate(&record.probabilities)?);
        }

        Ok(results)
    }
}

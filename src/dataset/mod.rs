//! Dataset records
//!
//! A data file is a sequence of two-line records:
//!
//! ```text
//! 4
//! 0.1 0.2 0.4 0.3
//! ```
//!
//! The first line is a header (usually the key count) and is kept only as a
//! label. The second line holds whitespace-separated probabilities, where
//! the i-th value belongs to rank i. Blank lines between records are skipped.

mod reader;

pub use reader::{parse_probabilities, DatasetReader};

use thiserror::Error;

/// One parsed record
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    /// Header line, trimmed
    pub label: String,

    /// 1-based line number of the header
    pub line: usize,

    /// Probabilities in rank order
    pub probabilities: Vec<f64>,
}

impl DatasetRecord {
    /// Key count announced by the header, if it is an integer
    pub fn declared_len(&self) -> Option<usize> {
        self.label.parse().ok()
    }
}

/// Errors raised while reading a data file
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Underlying read failed
    #[error("failed to read data: {0}")]
    Io(#[from] std::io::Error),

    /// Header line with nothing after it
    #[error("record header on line {line} has no probability line")]
    MissingProbabilities {
        /// Line of the dangling header
        line: usize,
    },

    /// Probability line without any values
    #[error("probability line {line} is empty")]
    EmptyRecord {
        /// Offending line
        line: usize,
    },

    /// Token that is not a number
    #[error("invalid probability '{token}' on line {line}")]
    InvalidProbability {
        /// Offending line
        line: usize,
        /// Token as written
        token: String,
    },

    /// Value below zero
    #[error("negative probability {value} on line {line}")]
    NegativeProbability {
        /// Offending line
        line: usize,
        /// Parsed value
        value: f64,
    },

    /// NaN or infinity
    #[error("non-finite probability '{token}' on line {line}")]
    NonFiniteProbability {
        /// Offending line
        line: usize,
        /// Token as written
        token: String,
    },
}

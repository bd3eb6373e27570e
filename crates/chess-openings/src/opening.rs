//! Opening book entry types.

use serde::{Deserialize, Serialize};

/// A single move from an opening book with associated metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningMove {
    /// The move in UCI notation (e.g., "e2e4").
    pub uci: String,
    /// Weight/frequency of this move (higher = more common).
    pub weight: u32,
}

impl OpeningMove {
    /// Creates a new opening move with the given UCI notation and weight.
    #[must_use]
    pub fn new(uci: impl Into<String>, weight: u32) -> Self {
        Self {
            uci: uci.into(),
            weight,
        }
    }
}

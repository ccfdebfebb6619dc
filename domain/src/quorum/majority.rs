//! Majority quorum for a fixed acceptor pool

use serde::{Deserialize, Serialize};

/// Minimum number of affirmative responses needed out of a pool of `n`
///
/// # Example
///
/// ```
/// use paxos_domain::quorum::majority;
///
/// assert_eq!(majority(1), 1);
/// assert_eq!(majority(4), 3);
/// assert_eq!(majority(5), 3);
/// ```
pub fn majority(pool_size: usize) -> usize {
    pool_size / 2 + 1
}

/// Affirmative count achieved in a phase versus the count required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumProgress {
    pub achieved: usize,
    pub required: usize,
}

impl QuorumProgress {
    /// Measure `achieved` against the majority of `pool_size`
    pub fn new(achieved: usize, pool_size: usize) -> Self {
        Self {
            achieved,
            required: majority(pool_size),
        }
    }

    pub fn is_reached(&self) -> bool {
        self.achieved >= self.required
    }
}

impl std::fmt::Display for QuorumProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.achieved, self.required)
    }
}

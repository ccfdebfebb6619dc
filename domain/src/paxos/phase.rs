//! Protocol phases

use serde::{Deserialize, Serialize};

/// Request/response phase of a proposal round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Phase 1: ask acceptors to promise and report prior accepted state
    Prepare,
    /// Phase 2: ask promised acceptors to accept the chosen value
    Accept,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Prepare => "prepare",
            Phase::Accept => "accept",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Prepare => "Phase 1: Prepare",
            Phase::Accept => "Phase 2: Accept",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Proposer state machine
//!
//! ```text
//! Init → Preparing → EarlyDecided
//!                  → NoPromises
//!                  → Accepting → Decided
//!                              → NoConsensus
//! ```
//!
//! There is no way back to `Preparing`: one run makes at most one attempt.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposerState {
    Init,
    Preparing,
    EarlyDecided,
    NoPromises,
    Accepting,
    Decided,
    NoConsensus,
}

impl ProposerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposerState::Init => "init",
            ProposerState::Preparing => "preparing",
            ProposerState::EarlyDecided => "early_decided",
            ProposerState::NoPromises => "no_promises",
            ProposerState::Accepting => "accepting",
            ProposerState::Decided => "decided",
            ProposerState::NoConsensus => "no_consensus",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposerState::EarlyDecided
                | ProposerState::NoPromises
                | ProposerState::Decided
                | ProposerState::NoConsensus
        )
    }

    /// Move to `next`, rejecting any transition outside the diagram above
    pub fn advance(self, next: ProposerState) -> Result<ProposerState, DomainError> {
        use ProposerState::*;

        let allowed = matches!(
            (self, next),
            (Init, Preparing)
                | (Preparing, EarlyDecided)
                | (Preparing, NoPromises)
                | (Preparing, Accepting)
                | (Accepting, Decided)
                | (Accepting, NoConsensus)
        );

        if allowed {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl std::fmt::Display for ProposerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

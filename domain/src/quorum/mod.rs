//! Quorum calculation
//!
//! Quorum is always measured against the full acceptor pool, never against
//! the number of peers that were contacted or that answered:
//!
//! ```text
//! pool size n │ 1 2 3 4 5 6 7
//! ────────────┼──────────────
//! majority    │ 1 2 2 3 3 4 4
//! ```
//!
//! Any two sets that each reach `majority(n)` share at least one acceptor,
//! which is what makes a value chosen by one quorum visible to the next.

pub mod majority;

pub use majority::{QuorumProgress, majority};

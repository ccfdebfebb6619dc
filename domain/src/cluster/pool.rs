//! Acceptor pool value object
//!
//! The pool is the fixed set of acceptors `1..=n`. It owns the quorum size and
//! validates which peers a proposal may contact.

use crate::core::error::DomainError;
use crate::core::ids::PeerId;
use crate::quorum::majority;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed pool of acceptors identified by `1..=size`
///
/// # Example
///
/// ```
/// use paxos_domain::{PeerId, PeerPool};
///
/// let pool = PeerPool::new(5).unwrap();
/// assert_eq!(pool.majority(), 3);
/// assert!(pool.contains(PeerId::new(5)));
/// assert!(!pool.contains(PeerId::new(6)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPool {
    size: usize,
}

impl PeerPool {
    pub fn new(size: usize) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::EmptyPool);
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Quorum size for this pool
    pub fn majority(&self) -> usize {
        majority(self.size)
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        (1..=self.size).contains(&peer.value())
    }

    /// All peers in ascending order
    pub fn peers(&self) -> impl Iterator<Item = PeerId> {
        (1..=self.size).map(PeerId::new)
    }

    /// Resolve a contact plan into a sorted list of distinct peers
    ///
    /// Fails before any request is sent when the plan does not fit the pool.
    pub fn select<R: Rng + ?Sized>(
        &self,
        plan: &ContactPlan,
        rng: &mut R,
    ) -> Result<Vec<PeerId>, DomainError> {
        match plan {
            ContactPlan::All => Ok(self.peers().collect()),
            ContactPlan::Random(count) => {
                if *count == 0 {
                    return Err(DomainError::NoPeersToContact);
                }
                if *count > self.size {
                    return Err(DomainError::ContactCountExceedsPool {
                        requested: *count,
                        pool_size: self.size,
                    });
                }
                let all: Vec<PeerId> = self.peers().collect();
                let mut chosen: Vec<PeerId> =
                    all.choose_multiple(rng, *count).copied().collect();
                chosen.sort();
                Ok(chosen)
            }
            ContactPlan::Explicit(peers) => self.validate_explicit(peers),
        }
    }

    fn validate_explicit(&self, peers: &[PeerId]) -> Result<Vec<PeerId>, DomainError> {
        if peers.is_empty() {
            return Err(DomainError::NoPeersToContact);
        }
        if peers.len() > self.size {
            return Err(DomainError::ContactCountExceedsPool {
                requested: peers.len(),
                pool_size: self.size,
            });
        }

        let mut seen = BTreeSet::new();
        for peer in peers {
            if !self.contains(*peer) {
                return Err(DomainError::PeerOutOfRange {
                    peer: *peer,
                    pool_size: self.size,
                });
            }
            if !seen.insert(*peer) {
                return Err(DomainError::DuplicatePeer(*peer));
            }
        }
        Ok(seen.into_iter().collect())
    }
}

/// Which peers a proposal contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPlan {
    /// Every peer in the pool
    All,
    /// A uniformly random subset of this many distinct peers
    Random(usize),
    /// Exactly these peers
    Explicit(Vec<PeerId>),
}

impl ContactPlan {
    /// Contact `count` peers, or the whole pool when `count` covers it
    pub fn from_count(count: usize, pool: &PeerPool) -> Self {
        if count == pool.size() {
            ContactPlan::All
        } else {
            ContactPlan::Random(count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn peers(ids: &[usize]) -> Vec<PeerId> {
        ids.iter().copied().map(PeerId::new).collect()
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert_eq!(PeerPool::new(0), Err(DomainError::EmptyPool));
    }

    #[test]
    fn test_select_all() {
        let pool = PeerPool::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            pool.select(&ContactPlan::All, &mut rng).unwrap(),
            peers(&[1, 2, 3])
        );
    }

    #[test]
    fn test_select_random_subset_is_distinct_and_in_range() {
        let pool = PeerPool::new(7).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let chosen = pool.select(&ContactPlan::Random(4), &mut rng).unwrap();
            assert_eq!(chosen.len(), 4);
            assert!(chosen.iter().all(|p| pool.contains(*p)));
            assert!(chosen.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_select_random_exceeding_pool() {
        let pool = PeerPool::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            pool.select(&ContactPlan::Random(4), &mut rng),
            Err(DomainError::ContactCountExceedsPool {
                requested: 4,
                pool_size: 3
            })
        );
        assert_eq!(
            pool.select(&ContactPlan::Random(0), &mut rng),
            Err(DomainError::NoPeersToContact)
        );
    }

    #[test]
    fn test_select_explicit_validation() {
        let pool = PeerPool::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            pool.select(&ContactPlan::Explicit(peers(&[4, 2])), &mut rng)
                .unwrap(),
            peers(&[2, 4])
        );
        assert_eq!(
            pool.select(&ContactPlan::Explicit(peers(&[6])), &mut rng),
            Err(DomainError::PeerOutOfRange {
                peer: PeerId::new(6),
                pool_size: 5
            })
        );
        assert_eq!(
            pool.select(&ContactPlan::Explicit(peers(&[0])), &mut rng),
            Err(DomainError::PeerOutOfRange {
                peer: PeerId::new(0),
                pool_size: 5
            })
        );
        assert_eq!(
            pool.select(&ContactPlan::Explicit(peers(&[2, 2])), &mut rng),
            Err(DomainError::DuplicatePeer(PeerId::new(2)))
        );
        assert_eq!(
            pool.select(&ContactPlan::Explicit(vec![]), &mut rng),
            Err(DomainError::NoPeersToContact)
        );
    }

    #[test]
    fn test_plan_from_count() {
        let pool = PeerPool::new(5).unwrap();
        assert_eq!(ContactPlan::from_count(5, &pool), ContactPlan::All);
        assert_eq!(ContactPlan::from_count(3, &pool), ContactPlan::Random(3));
    }
}

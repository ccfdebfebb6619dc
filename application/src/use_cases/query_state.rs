//! Query State use case
//!
//! Reads the promised/accepted state of each acceptor.

use crate::config::BehaviorConfig;
use crate::ports::acceptor_gateway::AcceptorGateway;
use crate::use_cases::shared::fan_out;
use paxos_domain::{PeerPool, StateReport};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for inspecting acceptor state across the pool
pub struct QueryStateUseCase<G: AcceptorGateway + 'static> {
    gateway: Arc<G>,
    behavior: BehaviorConfig,
}

impl<G: AcceptorGateway + 'static> QueryStateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Query every peer of `pool`; unreachable peers are recorded as `None`
    pub async fn execute(&self, pool: PeerPool) -> StateReport {
        let peers: Vec<_> = pool.peers().collect();
        info!("Querying state of {} acceptor(s)", peers.len());

        let results = fan_out(
            &self.gateway,
            &peers,
            self.behavior.request_timeout,
            |gateway, peer| async move { gateway.state(peer).await },
            |peer, result| match result {
                Ok(state) => debug!("[state] peer {}: {:?}", peer, state),
                Err(e) => warn!("[state] peer {}: no response ({})", peer, e),
            },
        )
        .await;

        StateReport {
            pool_size: pool.size(),
            states: results
                .into_iter()
                .map(|(peer, result)| (peer, result.ok()))
                .collect(),
        }
    }
}

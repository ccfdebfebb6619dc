//! Shared utilities for use cases.
//!
//! Contains the per-peer fan-out used by every phase: one independent task
//! per peer, each bounded by the request timeout, merged into a map keyed by
//! peer once all tasks finish.

use crate::ports::acceptor_gateway::{AcceptorGateway, GatewayError};
use paxos_domain::PeerId;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::warn;

/// Issue one request per peer concurrently and collect every outcome.
///
/// Every peer in `peers` has an entry in the returned map. Timeouts and
/// failed tasks are reported as errors for that peer; `on_result` sees each
/// outcome as it arrives.
pub(crate) async fn fan_out<G, T, F, Fut>(
    gateway: &Arc<G>,
    peers: &[PeerId],
    timeout: Duration,
    request: F,
    mut on_result: impl FnMut(PeerId, &Result<T, GatewayError>),
) -> BTreeMap<PeerId, Result<T, GatewayError>>
where
    G: AcceptorGateway + 'static,
    T: Send + 'static,
    F: Fn(Arc<G>, PeerId) -> Fut,
    Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
{
    let mut join_set = JoinSet::new();

    for &peer in peers {
        let pending = request(Arc::clone(gateway), peer);
        join_set.spawn(async move {
            let result = match tokio::time::timeout(timeout, pending).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            };
            (peer, result)
        });
    }

    let mut results = BTreeMap::new();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((peer, result)) => {
                on_result(peer, &result);
                results.insert(peer, result);
            }
            Err(e) => {
                warn!("Request task join error: {}", e);
            }
        }
    }

    for &peer in peers {
        if !results.contains_key(&peer) {
            let result = Err(GatewayError::Other("request task failed".to_string()));
            on_result(peer, &result);
            results.insert(peer, result);
        }
    }

    results
}

//! HTTP implementation of the acceptor gateway

use super::endpoint::{ACCEPT_PATH, PREPARE_PATH, PeerAddressing, STATE_PATH};
use super::error::{HttpError, Result};
use super::wire::{self, AcceptBody, PromiseBody, StateBody};
use async_trait::async_trait;
use paxos_application::{AcceptorGateway, GatewayError};
use paxos_domain::{AcceptResponse, AcceptorState, PeerId, PrepareResponse, ProposalId};
use std::time::Duration;
use tracing::{debug, info};

/// Acceptor gateway speaking the acceptors' JSON REST interface
pub struct HttpAcceptorGateway {
    client: reqwest::Client,
    addressing: PeerAddressing,
}

impl HttpAcceptorGateway {
    /// Create a gateway whose requests are bounded by `timeout`
    pub fn new(addressing: PeerAddressing, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        info!(
            "HttpAcceptorGateway initialized (peer 1 at {})",
            addressing.base_url(PeerId::new(1)).unwrap_or_default()
        );

        Ok(Self { client, addressing })
    }

    /// Create a gateway with an existing client
    pub fn with_client(client: reqwest::Client, addressing: PeerAddressing) -> Self {
        Self { client, addressing }
    }

    fn url(&self, peer: PeerId, path: &str) -> std::result::Result<reqwest::Url, GatewayError> {
        self.addressing.url(peer, path).map_err(|e| {
            debug!("{}", e);
            GatewayError::UnknownPeer(peer)
        })
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl AcceptorGateway for HttpAcceptorGateway {
    async fn prepare(
        &self,
        peer: PeerId,
        proposal_id: ProposalId,
    ) -> std::result::Result<PrepareResponse, GatewayError> {
        let url = self.url(peer, PREPARE_PATH)?;
        debug!("POST {} id={}", url, proposal_id);

        let response = self
            .client
            .post(url)
            .query(&[("id", proposal_id.value())])
            .send()
            .await
            .map_err(HttpError::from)?;
        let raw = Self::read_body(response).await?;

        let body: PromiseBody = wire::decode(&raw)?;
        Ok(PrepareResponse::from(body))
    }

    async fn accept(
        &self,
        peer: PeerId,
        proposal_id: ProposalId,
        value: &str,
    ) -> std::result::Result<AcceptResponse, GatewayError> {
        let url = self.url(peer, ACCEPT_PATH)?;
        debug!("POST {} id={} value={}", url, proposal_id, value);

        let id = proposal_id.value().to_string();
        let response = self
            .client
            .post(url)
            .query(&[("id", id.as_str()), ("value", value)])
            .send()
            .await
            .map_err(HttpError::from)?;
        let raw = Self::read_body(response).await?;

        let body: AcceptBody = wire::decode(&raw)?;
        Ok(AcceptResponse::from(body))
    }

    async fn state(&self, peer: PeerId) -> std::result::Result<AcceptorState, GatewayError> {
        let url = self.url(peer, STATE_PATH)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(HttpError::from)?;
        let raw = Self::read_body(response).await?;

        let body: StateBody = wire::decode(&raw)?;
        Ok(AcceptorState::from(body))
    }
}

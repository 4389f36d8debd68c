use std::sync::Arc;

use ethers::{
    abi::Token,
    types::{Address, TxHash, U256},
};

use crate::{
    contracts::{self, reputation::REPUTATION_REGISTRY},
    error::{Erc8004Error, Result},
    models::{ChainConfig, ReputationScore},
    services::transport::ChainTransport,
};

pub const MAX_SCORE: u64 = 100;

/// Client for the ERC-8004 ReputationRegistry.
pub struct ReputationRegistry {
    transport: Arc<dyn ChainTransport>,
    address: Address,
}

impl ReputationRegistry {
    /// Fails with [`Erc8004Error::RegistryNotDeployed`] when the chain has no
    /// reputation registry.
    pub fn new(transport: Arc<dyn ChainTransport>, chain: &ChainConfig) -> Result<Self> {
        let address = chain
            .reputation_registry
            .ok_or_else(|| Erc8004Error::RegistryNotDeployed {
                registry: "Reputation",
                chain: chain.name.clone(),
            })?;

        tracing::debug!("ReputationRegistry at {:#x} on {}", address, chain.name);

        Ok(Self { transport, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Submits a 0-100 score for an agent in `domain` (e.g. "accuracy").
    pub async fn submit_score(
        &self,
        agent_id: U256,
        domain: &str,
        score: u64,
        evidence: Option<&str>,
    ) -> Result<TxHash> {
        if score > MAX_SCORE {
            return Err(Erc8004Error::ScoreOutOfRange(score));
        }

        let data = REPUTATION_REGISTRY.encode(
            "submitScore",
            &[
                Token::Uint(agent_id),
                Token::String(domain.to_string()),
                Token::Uint(U256::from(score)),
                Token::String(evidence.unwrap_or_default().to_string()),
            ],
        )?;

        let receipt = self.transport.send_transaction(self.address, data).await?;

        tracing::info!(
            "Score {} submitted for agent #{} in '{}' (tx: {:#x})",
            score,
            agent_id,
            domain,
            receipt.transaction_hash
        );

        Ok(receipt.transaction_hash)
    }

    pub async fn get_score(&self, agent_id: U256, domain: &str) -> Result<ReputationScore> {
        let tokens = self
            .read(
                "getScore",
                &[Token::Uint(agent_id), Token::String(domain.to_string())],
            )
            .await?;
        score_pair("getScore", tokens)
    }

    /// Score across all domains; `count` is the total number of reviews.
    pub async fn get_aggregate_score(&self, agent_id: U256) -> Result<ReputationScore> {
        let tokens = self.read("getAggregateScore", &[Token::Uint(agent_id)]).await?;
        score_pair("getAggregateScore", tokens)
    }

    pub async fn get_version(&self) -> Result<String> {
        let tokens = self.read("getVersion", &[]).await?;
        contracts::expect_string("getVersion", tokens)
    }

    async fn read(&self, function: &'static str, args: &[Token]) -> Result<Vec<Token>> {
        let data = REPUTATION_REGISTRY.encode(function, args)?;
        let output = self.transport.call(self.address, data).await?;
        REPUTATION_REGISTRY.decode(function, &output)
    }
}

fn score_pair(function: &'static str, tokens: Vec<Token>) -> Result<ReputationScore> {
    let mut values = tokens.into_iter().map(Token::into_uint);
    match (values.next().flatten(), values.next().flatten()) {
        (Some(score), Some(count)) => Ok(ReputationScore { score, count }),
        _ => Err(contracts::mismatch(function)),
    }
}

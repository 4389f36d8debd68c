//! High-level client combining the three registries.

mod new_agent;

pub use new_agent::NewAgent;

use std::sync::Arc;

use ethers::types::U256;
use tokio::sync::OnceCell;

use crate::{
    chains,
    config::Config,
    error::{Erc8004Error, Result},
    models::{AgentMetadata, ChainConfig, MetadataEntry, RegisteredAgent},
    services::{
        ChainTransport, EthersTransport, IdentityRegistry, ReputationRegistry, ValidationRegistry,
    },
};

/// Entry point for ERC-8004 registry operations on one chain.
///
/// ```no_run
/// # async fn demo() -> erc8004::Result<()> {
/// use erc8004::{AgentService, Config, Erc8004Client, NewAgent};
///
/// let config = Config::new("bsc-testnet").with_private_key("0x...");
/// let client = Erc8004Client::from_config(&config)?;
/// let agent_id = client
///     .register(
///         NewAgent::new("My Agent", "An AI agent on BNB Chain")
///             .service(AgentService::new("A2A", "https://agent.example.com/a2a")),
///     )
///     .await?;
/// println!("Agent #{} registered!", agent_id);
/// # Ok(())
/// # }
/// ```
///
/// The reputation and validation clients are created on first use, so a
/// chain without those registries only fails when they are asked for.
pub struct Erc8004Client {
    chain: ChainConfig,
    transport: Arc<dyn ChainTransport>,
    identity: IdentityRegistry,
    reputation: OnceCell<ReputationRegistry>,
    validation: OnceCell<ValidationRegistry>,
}

impl Erc8004Client {
    /// Validates `config`, resolves the configured chain and connects over
    /// HTTP JSON-RPC.
    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Erc8004Error::Config(format!("{:#}", e)))?;
        let chain = chains::get_chain(config.chain.clone())?;
        Self::with_chain_config(chain, config)
    }

    /// Uses a custom chain configuration instead of the built-in directory.
    pub fn with_chain_config(chain: ChainConfig, config: &Config) -> Result<Self> {
        let rpc_url = config.rpc_url.as_deref().unwrap_or(&chain.rpc_url);
        let mut transport =
            EthersTransport::new(rpc_url, config.private_key.as_deref(), chain.chain_id)?;
        if let Some(interval) = config.poll_interval {
            transport = transport.with_poll_interval(interval);
        }

        tracing::info!("ERC-8004 client for {} via {}", chain.name, rpc_url);

        Ok(Self::with_transport(chain, Arc::new(transport)))
    }

    pub fn with_transport(chain: ChainConfig, transport: Arc<dyn ChainTransport>) -> Self {
        let identity = IdentityRegistry::new(transport.clone(), &chain);
        Self {
            chain,
            transport,
            identity,
            reputation: OnceCell::new(),
            validation: OnceCell::new(),
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn transport(&self) -> &Arc<dyn ChainTransport> {
        &self.transport
    }

    pub fn identity(&self) -> &IdentityRegistry {
        &self.identity
    }

    pub async fn reputation(&self) -> Result<&ReputationRegistry> {
        self.reputation
            .get_or_try_init(|| async {
                ReputationRegistry::new(self.transport.clone(), &self.chain)
            })
            .await
    }

    pub async fn validation(&self) -> Result<&ValidationRegistry> {
        self.validation
            .get_or_try_init(|| async {
                ValidationRegistry::new(self.transport.clone(), &self.chain)
            })
            .await
    }

    /// Builds metadata from `agent`, registers it and returns the new agent ID.
    pub async fn register(&self, agent: NewAgent) -> Result<U256> {
        let (metadata, entries) = agent.into_metadata()?;
        let registered = self
            .identity
            .register_with_metadata(metadata, &entries)
            .await?;
        Ok(registered.agent_id)
    }

    /// Registers complete metadata and returns the full registration record.
    pub async fn register_full(
        &self,
        metadata: AgentMetadata,
        metadata_entries: &[MetadataEntry],
    ) -> Result<RegisteredAgent> {
        self.identity
            .register_with_metadata(metadata, metadata_entries)
            .await
    }

    /// See [`IdentityRegistry::get_agent`].
    pub async fn get_agent(&self, agent_id: U256) -> Result<RegisteredAgent> {
        self.identity.get_agent(agent_id).await
    }

    /// IdentityRegistry contract version.
    pub async fn get_version(&self) -> Result<String> {
        self.identity.get_version().await
    }

    pub async fn is_connected(&self) -> bool {
        match self.transport.block_number().await {
            Ok(block) => {
                tracing::debug!("{} reachable at block {}", self.chain.name, block);
                true
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", self.chain.name, e);
                false
            }
        }
    }
}

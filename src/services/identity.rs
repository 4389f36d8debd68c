use std::sync::Arc;

use ethers::{
    abi::Token,
    types::{Address, Bytes, TransactionReceipt, TxHash, U256},
};

use crate::{
    codec::{encode_agent_uri, parse_agent_metadata},
    contracts::{
        self, first_match,
        identity::{AGENT_ID_RULES, IDENTITY_REGISTRY},
    },
    error::{Erc8004Error, Result},
    models::{AgentMetadata, ChainConfig, MetadataEntry, RegisteredAgent},
    services::transport::ChainTransport,
};

/// Client for the ERC-8004 IdentityRegistry.
pub struct IdentityRegistry {
    transport: Arc<dyn ChainTransport>,
    address: Address,
    chain_id: u64,
}

impl IdentityRegistry {
    pub fn new(transport: Arc<dyn ChainTransport>, chain: &ChainConfig) -> Self {
        Self {
            transport,
            address: chain.identity_registry,
            chain_id: chain.chain_id,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Registers a new agent and returns its token ID.
    ///
    /// The call form depends on the inputs: no URI uses `register()`, a URI
    /// alone uses `register(string)`, and a URI with entries also stores the
    /// entries on-chain. The ID is read back from the receipt, since the
    /// contract's return value is not observable from a transaction.
    pub async fn register(
        &self,
        agent_uri: Option<&str>,
        metadata_entries: &[MetadataEntry],
    ) -> Result<U256> {
        let (_, agent_id) = self.submit_registration(agent_uri, metadata_entries).await?;
        Ok(agent_id)
    }

    /// Encodes `metadata` into a data URI, registers it and returns the full
    /// registration record.
    pub async fn register_with_metadata(
        &self,
        metadata: AgentMetadata,
        extra_entries: &[MetadataEntry],
    ) -> Result<RegisteredAgent> {
        let uri = encode_agent_uri(&metadata);
        let (receipt, agent_id) = self.submit_registration(Some(&uri), extra_entries).await?;

        Ok(RegisteredAgent {
            agent_id,
            owner: receipt.from,
            chain_id: self.chain_id,
            tx_hash: format!("{:#x}", receipt.transaction_hash),
            block_number: receipt.block_number.unwrap_or_default().as_u64(),
            agent_uri: Some(uri),
            metadata: Some(metadata),
        })
    }

    async fn submit_registration(
        &self,
        agent_uri: Option<&str>,
        entries: &[MetadataEntry],
    ) -> Result<(TransactionReceipt, U256)> {
        let args = match agent_uri {
            Some(uri) if !entries.is_empty() => {
                vec![Token::String(uri.to_string()), encode_entries(entries)]
            }
            Some(uri) => vec![Token::String(uri.to_string())],
            None => {
                if !entries.is_empty() {
                    tracing::warn!(
                        "register() without a URI cannot store metadata entries; dropping {} entries",
                        entries.len()
                    );
                }
                Vec::new()
            }
        };
        let data = IDENTITY_REGISTRY.encode("register", &args)?;

        tracing::info!(
            "Registering agent on chain {} (uri: {}, entries: {})",
            self.chain_id,
            agent_uri.is_some(),
            entries.len()
        );

        let receipt = self.transport.send_transaction(self.address, data).await?;
        let agent_id = self.parse_agent_id(&receipt)?;

        tracing::info!(
            "Agent #{} registered in tx {:#x}",
            agent_id,
            receipt.transaction_hash
        );

        Ok((receipt, agent_id))
    }

    fn parse_agent_id(&self, receipt: &TransactionReceipt) -> Result<U256> {
        first_match(&IDENTITY_REGISTRY, self.address, &receipt.logs, AGENT_ID_RULES)?.ok_or_else(
            || {
                tracing::warn!(
                    "Neither Registered nor mint Transfer found in {:#x}",
                    receipt.transaction_hash
                );
                Erc8004Error::AgentIdUnresolvable {
                    tx_hash: receipt.transaction_hash,
                    registry: self.address,
                }
            },
        )
    }

    /// Points an agent at a new metadata URI. Returns the transaction hash.
    pub async fn set_agent_uri(&self, agent_id: U256, new_uri: &str) -> Result<TxHash> {
        let data = IDENTITY_REGISTRY.encode(
            "setAgentURI",
            &[Token::Uint(agent_id), Token::String(new_uri.to_string())],
        )?;
        self.transact(data).await
    }

    /// Stores a single on-chain metadata entry. Returns the transaction hash.
    pub async fn set_metadata(&self, agent_id: U256, key: &str, value: &str) -> Result<TxHash> {
        let data = IDENTITY_REGISTRY.encode(
            "setMetadata",
            &[
                Token::Uint(agent_id),
                Token::String(key.to_string()),
                Token::Bytes(value.as_bytes().to_vec()),
            ],
        )?;
        self.transact(data).await
    }

    pub async fn get_metadata(&self, agent_id: U256, key: &str) -> Result<String> {
        let tokens = self
            .read(
                "getMetadata",
                &[Token::Uint(agent_id), Token::String(key.to_string())],
            )
            .await?;
        let raw = contracts::expect_bytes("getMetadata", tokens)?;
        Ok(String::from_utf8(raw)?)
    }

    /// Wallet address bound to an agent.
    pub async fn get_agent_wallet(&self, agent_id: U256) -> Result<Address> {
        let tokens = self.read("getAgentWallet", &[Token::Uint(agent_id)]).await?;
        contracts::expect_address("getAgentWallet", tokens)
    }

    pub async fn token_uri(&self, agent_id: U256) -> Result<String> {
        let tokens = self.read("tokenURI", &[Token::Uint(agent_id)]).await?;
        contracts::expect_string("tokenURI", tokens)
    }

    pub async fn owner_of(&self, agent_id: U256) -> Result<Address> {
        let tokens = self.read("ownerOf", &[Token::Uint(agent_id)]).await?;
        contracts::expect_address("ownerOf", tokens)
    }

    /// Number of agents owned by `owner`.
    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        let tokens = self.read("balanceOf", &[Token::Address(owner)]).await?;
        contracts::expect_uint("balanceOf", tokens)
    }

    pub async fn get_version(&self) -> Result<String> {
        let tokens = self.read("getVersion", &[]).await?;
        contracts::expect_string("getVersion", tokens)
    }

    pub async fn name(&self) -> Result<String> {
        let tokens = self.read("name", &[]).await?;
        contracts::expect_string("name", tokens)
    }

    pub async fn symbol(&self) -> Result<String> {
        let tokens = self.read("symbol", &[]).await?;
        contracts::expect_string("symbol", tokens)
    }

    /// Looks up an agent by ID.
    ///
    /// Metadata is best effort: when the stored URI cannot be decoded or does
    /// not match the agent schema the record comes back with
    /// `metadata: None`. Transport failures still propagate.
    pub async fn get_agent(&self, agent_id: U256) -> Result<RegisteredAgent> {
        let (owner, uri) = tokio::try_join!(self.owner_of(agent_id), self.token_uri(agent_id))?;

        let metadata = match parse_agent_metadata(&uri) {
            Ok(metadata) => Some(metadata),
            Err(e) if e.is_metadata_error() => {
                tracing::debug!("Agent #{} metadata unavailable: {}", agent_id, e);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(RegisteredAgent {
            agent_id,
            owner,
            chain_id: self.chain_id,
            tx_hash: String::new(),
            block_number: 0,
            agent_uri: (!uri.is_empty()).then_some(uri),
            metadata,
        })
    }

    async fn read(&self, function: &'static str, args: &[Token]) -> Result<Vec<Token>> {
        let data = IDENTITY_REGISTRY.encode(function, args)?;
        tracing::debug!("IdentityRegistry.{} on chain {}", function, self.chain_id);
        let output = self.transport.call(self.address, data).await?;
        IDENTITY_REGISTRY.decode(function, &output)
    }

    async fn transact(&self, data: Bytes) -> Result<TxHash> {
        let receipt = self.transport.send_transaction(self.address, data).await?;
        Ok(receipt.transaction_hash)
    }
}

fn encode_entries(entries: &[MetadataEntry]) -> Token {
    Token::Array(
        entries
            .iter()
            .map(|e| {
                Token::Tuple(vec![
                    Token::String(e.key.clone()),
                    Token::Bytes(e.value.as_bytes().to_vec()),
                ])
            })
            .collect(),
    )
}

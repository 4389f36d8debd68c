use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Network parameters and registry deployments for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer: String,
    pub currency_name: String,
    pub currency_symbol: String,
    #[serde(default = "default_decimals")]
    pub currency_decimals: u8,
    pub identity_registry: Address,
    pub reputation_registry: Option<Address>,
    pub validation_registry: Option<Address>,
    pub agent_registry_caip10: Option<String>,
    #[serde(default)]
    pub testnet: bool,
}

impl ChainConfig {
    /// Block explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer.trim_end_matches('/'), tx_hash)
    }

    /// Block explorer link for an address.
    pub fn address_url(&self, address: Address) -> String {
        format!("{}/address/{:#x}", self.explorer.trim_end_matches('/'), address)
    }
}

fn default_decimals() -> u8 {
    18
}

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use super::AgentMetadata;

/// An agent as known to the identity registry.
///
/// `tx_hash` and `block_number` are only meaningful for fresh registrations;
/// lookups leave them empty and zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAgent {
    pub agent_id: U256,
    pub owner: Address,
    pub chain_id: u64,
    pub tx_hash: String,
    pub block_number: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AgentMetadata>,
}

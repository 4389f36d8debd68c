use ethers::types::{Address, TxHash};
use thiserror::Error;

use crate::services::transport::TransportError;

pub type Result<T> = std::result::Result<T, Erc8004Error>;

#[derive(Error, Debug)]
pub enum Erc8004Error {
    #[error("Unknown chain '{name}'. Supported: {}", supported.join(", "))]
    UnknownChain { name: String, supported: Vec<String> },

    #[error("Unknown chain ID {chain_id}. Supported: {}", join_ids(supported))]
    UnknownChainId { chain_id: u64, supported: Vec<u64> },

    #[error("No {registry} registry deployed on {chain}")]
    RegistryNotDeployed { registry: &'static str, chain: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Score must be 0-100, got {0}")]
    ScoreOutOfRange(u64),

    #[error("Unsupported URI format: {preview}...")]
    UnsupportedUriFormat { preview: String },

    #[error("Metadata does not match the agent schema: {0}")]
    MetadataSchemaInvalid(String),

    #[error("Invalid agent metadata: {0}")]
    InvalidMetadata(String),

    #[error("Could not parse agent ID from receipt of {tx_hash:#x} (registry {registry:#x})")]
    AgentIdUnresolvable { tx_hash: TxHash, registry: Address },

    #[error("Could not parse validation ID from receipt of {tx_hash:#x}")]
    ValidationIdUnresolvable { tx_hash: TxHash },

    #[error("Malformed {function} output: {source}")]
    Abi {
        function: &'static str,
        #[source]
        source: ethers::abi::Error,
    },

    #[error("Metadata value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Erc8004Error {
    /// Metadata decode failures that a lookup may tolerate.
    pub fn is_metadata_error(&self) -> bool {
        matches!(
            self,
            Erc8004Error::UnsupportedUriFormat { .. } | Erc8004Error::MetadataSchemaInvalid(_)
        )
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

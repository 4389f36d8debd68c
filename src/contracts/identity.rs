use std::sync::LazyLock;

use ethers::{
    abi,
    types::{Address, U256},
};

use super::{param, ContractAbi, EventRule};

// ERC-8004 IdentityRegistry: registration, metadata and ERC-721 views
pub static IDENTITY_REGISTRY: LazyLock<ContractAbi> = LazyLock::new(|| {
    ContractAbi::parse(&[
        "struct MetadataEntry { string metadataKey; bytes metadataValue; }",
        "function register() returns (uint256 agentId)",
        "function register(string agentURI) returns (uint256 agentId)",
        "function register(string agentURI, MetadataEntry[] metadata) returns (uint256 agentId)",
        "function setAgentURI(uint256 agentId, string newURI)",
        "function setMetadata(uint256 agentId, string metadataKey, bytes metadataValue)",
        "function getMetadata(uint256 agentId, string metadataKey) view returns (bytes)",
        "function getAgentWallet(uint256 agentId) view returns (address)",
        "function tokenURI(uint256 tokenId) view returns (string)",
        "function ownerOf(uint256 tokenId) view returns (address)",
        "function balanceOf(address owner) view returns (uint256)",
        "function getVersion() view returns (string)",
        "function name() view returns (string)",
        "function symbol() view returns (string)",
        "event Registered(uint256 indexed agentId, string agentURI, address indexed owner)",
        "event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)",
    ])
});

/// Where a new agent ID can be read from, highest priority first.
pub const AGENT_ID_RULES: &[EventRule] = &[
    EventRule {
        event: "Registered",
        extract: registered_agent_id,
    },
    EventRule {
        event: "Transfer",
        extract: minted_token_id,
    },
];

fn registered_agent_id(log: &abi::Log) -> Option<U256> {
    param(log, "agentId")?.clone().into_uint()
}

/// ERC-721 mint: a transfer out of the zero address.
fn minted_token_id(log: &abi::Log) -> Option<U256> {
    let from = param(log, "from")?.clone().into_address()?;
    if from != Address::zero() {
        return None;
    }
    param(log, "tokenId")?.clone().into_uint()
}

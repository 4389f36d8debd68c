//! Supported networks and their registry deployments.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Erc8004Error, Result},
    models::ChainConfig,
    utils::caip10_address,
};

// Deterministic CREATE2 addresses, identical on every testnet
pub const TESTNET_IDENTITY: &str = "0x8004A818BFB912233c491871b3d84c89A494BD9e";
pub const TESTNET_REPUTATION: &str = "0x8004B663056A597Dffe9eCcC1965A193B7388713";
pub const TESTNET_VALIDATION: &str = "0x8004Cb1BF31DAf7788923b405b754f57acEB4272";

pub const MAINNET_IDENTITY: &str = "0x8004A169FB4a3325136EB29fA0ceB6D2e539a432";
pub const MAINNET_REPUTATION: &str = "0x8004BAa17C55a88189AE136b182e5fdA19dE9b63";

pub const DEFAULT_CHAIN: &str = "bsc-testnet";

/// A chain given either by directory key or by numeric chain ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainSelector {
    Id(u64),
    Name(String),
}

impl From<&str> for ChainSelector {
    fn from(name: &str) -> Self {
        ChainSelector::Name(name.to_string())
    }
}

impl From<String> for ChainSelector {
    fn from(name: String) -> Self {
        ChainSelector::Name(name)
    }
}

impl From<u64> for ChainSelector {
    fn from(chain_id: u64) -> Self {
        ChainSelector::Id(chain_id)
    }
}

impl FromStr for ChainSelector {
    type Err = std::convert::Infallible;

    /// All-digit strings are chain IDs; anything else is a chain name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = s.parse() {
                return Ok(ChainSelector::Id(id));
            }
        }
        Ok(ChainSelector::Name(s.to_string()))
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainSelector::Id(id) => write!(f, "{}", id),
            ChainSelector::Name(name) => f.write_str(name),
        }
    }
}

struct Deployment {
    identity: &'static str,
    reputation: Option<&'static str>,
    validation: Option<&'static str>,
}

const TESTNET: Deployment = Deployment {
    identity: TESTNET_IDENTITY,
    reputation: Some(TESTNET_REPUTATION),
    validation: Some(TESTNET_VALIDATION),
};

const MAINNET: Deployment = Deployment {
    identity: MAINNET_IDENTITY,
    reputation: Some(MAINNET_REPUTATION),
    validation: None,
};

static CHAINS: LazyLock<Vec<(&'static str, ChainConfig)>> = LazyLock::new(|| {
    vec![
        (
            "bsc-testnet",
            chain(
                "BSC Testnet",
                97,
                "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
                "https://testnet.bscscan.com",
                ("tBNB", "tBNB"),
                TESTNET,
                true,
            ),
        ),
        (
            "bsc",
            chain(
                "BSC Mainnet",
                56,
                "https://bsc-dataseed.bnbchain.org",
                "https://bscscan.com",
                ("BNB", "BNB"),
                // BSC shares the deterministic validation deployment
                Deployment {
                    validation: Some(TESTNET_VALIDATION),
                    ..MAINNET
                },
                false,
            ),
        ),
        (
            "ethereum",
            chain(
                "Ethereum Mainnet",
                1,
                "https://eth.llamarpc.com",
                "https://etherscan.io",
                ("ETH", "ETH"),
                MAINNET,
                false,
            ),
        ),
        (
            "sepolia",
            chain(
                "Ethereum Sepolia",
                11155111,
                "https://rpc.sepolia.org",
                "https://sepolia.etherscan.io",
                ("SepoliaETH", "ETH"),
                Deployment {
                    validation: None,
                    ..TESTNET
                },
                true,
            ),
        ),
        (
            "opbnb-testnet",
            chain(
                "opBNB Testnet",
                5611,
                "https://opbnb-testnet-rpc.bnbchain.org",
                "https://testnet.opbnbscan.com",
                ("tBNB", "tBNB"),
                TESTNET,
                true,
            ),
        ),
        (
            "opbnb",
            chain(
                "opBNB",
                204,
                "https://opbnb-mainnet-rpc.bnbchain.org",
                "https://opbnbscan.com",
                ("BNB", "BNB"),
                MAINNET,
                false,
            ),
        ),
        (
            "base-sepolia",
            chain(
                "Base Sepolia",
                84532,
                "https://sepolia.base.org",
                "https://sepolia.basescan.org",
                ("ETH", "ETH"),
                TESTNET,
                true,
            ),
        ),
        (
            "arbitrum-sepolia",
            chain(
                "Arbitrum Sepolia",
                421614,
                "https://sepolia-rollup.arbitrum.io/rpc",
                "https://sepolia.arbiscan.io",
                ("ETH", "ETH"),
                TESTNET,
                true,
            ),
        ),
        (
            "optimism-sepolia",
            chain(
                "Optimism Sepolia",
                11155420,
                "https://sepolia.optimism.io",
                "https://sepolia-optimistic.etherscan.io",
                ("ETH", "ETH"),
                TESTNET,
                true,
            ),
        ),
        (
            "polygon-amoy",
            chain(
                "Polygon Amoy",
                80002,
                "https://rpc-amoy.polygon.technology",
                "https://amoy.polygonscan.com",
                ("POL", "POL"),
                TESTNET,
                true,
            ),
        ),
    ]
});

fn chain(
    name: &str,
    chain_id: u64,
    rpc_url: &str,
    explorer: &str,
    (currency_name, currency_symbol): (&str, &str),
    deployment: Deployment,
    testnet: bool,
) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        chain_id,
        rpc_url: rpc_url.to_string(),
        explorer: explorer.to_string(),
        currency_name: currency_name.to_string(),
        currency_symbol: currency_symbol.to_string(),
        currency_decimals: 18,
        identity_registry: static_address(deployment.identity),
        reputation_registry: deployment.reputation.map(static_address),
        validation_registry: deployment.validation.map(static_address),
        agent_registry_caip10: Some(caip10_address(chain_id, deployment.identity)),
        testnet,
    }
}

fn static_address(s: &str) -> Address {
    s.parse().expect("static registry address is valid hex")
}

/// Resolves a chain by directory key (e.g. `"bsc-testnet"`) or chain ID.
pub fn get_chain(selector: impl Into<ChainSelector>) -> Result<ChainConfig> {
    match selector.into() {
        ChainSelector::Name(name) => CHAINS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, config)| config.clone())
            .ok_or_else(|| Erc8004Error::UnknownChain {
                name,
                supported: chain_keys().iter().map(|k| k.to_string()).collect(),
            }),
        ChainSelector::Id(chain_id) => CHAINS
            .iter()
            .find(|(_, config)| config.chain_id == chain_id)
            .map(|(_, config)| config.clone())
            .ok_or_else(|| Erc8004Error::UnknownChainId {
                chain_id,
                supported: supported_chain_ids(),
            }),
    }
}

/// All directory entries, in a stable order.
pub fn supported_chains() -> impl Iterator<Item = (&'static str, &'static ChainConfig)> {
    CHAINS.iter().map(|(key, config)| (*key, config))
}

pub fn chain_keys() -> Vec<&'static str> {
    CHAINS.iter().map(|(key, _)| *key).collect()
}

pub fn supported_chain_ids() -> Vec<u64> {
    CHAINS.iter().map(|(_, config)| config.chain_id).collect()
}

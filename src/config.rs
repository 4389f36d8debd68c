use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::chains::{ChainSelector, DEFAULT_CHAIN};

/// Client settings, usually read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain: ChainSelector,

    // Overrides the chain directory's RPC endpoint
    pub rpc_url: Option<String>,

    // Required for write operations only
    pub private_key: Option<String>,

    // Receipt polling interval; ethers' default when unset
    pub poll_interval: Option<Duration>,
}

impl Config {
    pub fn new(chain: impl Into<ChainSelector>) -> Self {
        Self {
            chain: chain.into(),
            rpc_url: None,
            private_key: None,
            poll_interval: None,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Reads `ERC8004_CHAIN`, `ERC8004_RPC_URL`, `ERC8004_PRIVATE_KEY` and
    /// `ERC8004_POLL_INTERVAL_MS`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let chain = std::env::var("ERC8004_CHAIN")
            .unwrap_or_else(|_| DEFAULT_CHAIN.to_string())
            .parse::<ChainSelector>()
            .context("Invalid ERC8004_CHAIN")?;

        let poll_interval = non_empty_var("ERC8004_POLL_INTERVAL_MS")
            .map(|ms| ms.trim().parse::<u64>().map(Duration::from_millis))
            .transpose()
            .context("ERC8004_POLL_INTERVAL_MS must be a whole number of milliseconds")?;

        let config = Self {
            chain,
            rpc_url: non_empty_var("ERC8004_RPC_URL"),
            private_key: non_empty_var("ERC8004_PRIVATE_KEY"),
            poll_interval,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.rpc_url {
            if !url.starts_with("http") {
                bail!("ERC8004_RPC_URL must be HTTP(S) URL, got {}", url);
            }
        }

        if let Some(key) = &self.private_key {
            if !key.starts_with("0x") {
                bail!("ERC8004_PRIVATE_KEY must start with 0x");
            }
        }

        if self.poll_interval == Some(Duration::ZERO) {
            bail!("ERC8004_POLL_INTERVAL_MS must be greater than zero");
        }

        tracing::debug!(
            "Configuration validated for chain {} (signer: {})",
            self.chain,
            self.private_key.is_some()
        );

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

//! Client SDK for the ERC-8004 agent registries (identity, reputation and
//! validation) on EVM chains.

pub mod chains;
pub mod client;
pub mod codec;
pub mod config;
pub mod contracts;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use chains::{get_chain, ChainSelector};
pub use client::{Erc8004Client, NewAgent};
pub use codec::{decode_agent_uri, encode_agent_uri, parse_agent_metadata};
pub use config::Config;
pub use error::{Erc8004Error, Result};
pub use models::*;
pub use services::{
    ChainTransport, EthersTransport, IdentityRegistry, ReputationRegistry, TransportError,
    ValidationRegistry,
};
pub use utils::{caip10_address, truncate_address};

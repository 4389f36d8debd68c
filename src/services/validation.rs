use std::sync::Arc;

use ethers::{
    abi::Token,
    types::{Address, U256},
};

use crate::{
    contracts::{
        self, first_match,
        validation::{VALIDATION_ID_RULES, VALIDATION_REGISTRY},
    },
    error::{Erc8004Error, Result},
    models::{ChainConfig, ValidationRecord},
    services::transport::ChainTransport,
};

/// Client for the ERC-8004 ValidationRegistry.
pub struct ValidationRegistry {
    transport: Arc<dyn ChainTransport>,
    address: Address,
}

impl ValidationRegistry {
    /// Fails with [`Erc8004Error::RegistryNotDeployed`] when the chain has no
    /// validation registry.
    pub fn new(transport: Arc<dyn ChainTransport>, chain: &ChainConfig) -> Result<Self> {
        let address = chain
            .validation_registry
            .ok_or_else(|| Erc8004Error::RegistryNotDeployed {
                registry: "Validation",
                chain: chain.name.clone(),
            })?;

        tracing::debug!("ValidationRegistry at {:#x} on {}", address, chain.name);

        Ok(Self { transport, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Records a validation of `validation_type` (e.g. "identity") and returns
    /// the new validation ID from the `Validated` event.
    pub async fn validate(
        &self,
        agent_id: U256,
        validation_type: &str,
        evidence: &[u8],
    ) -> Result<U256> {
        let data = VALIDATION_REGISTRY.encode(
            "validate",
            &[
                Token::Uint(agent_id),
                Token::String(validation_type.to_string()),
                Token::Bytes(evidence.to_vec()),
            ],
        )?;

        let receipt = self.transport.send_transaction(self.address, data).await?;

        let validation_id =
            first_match(&VALIDATION_REGISTRY, self.address, &receipt.logs, VALIDATION_ID_RULES)?
                .ok_or_else(|| {
                    tracing::warn!("No Validated event in {:#x}", receipt.transaction_hash);
                    Erc8004Error::ValidationIdUnresolvable {
                        tx_hash: receipt.transaction_hash,
                    }
                })?;

        tracing::info!(
            "Validation #{} ({}) recorded for agent #{}",
            validation_id,
            validation_type,
            agent_id
        );

        Ok(validation_id)
    }

    pub async fn is_valid(&self, agent_id: U256, validation_type: &str) -> Result<bool> {
        let tokens = self
            .read(
                "isValid",
                &[Token::Uint(agent_id), Token::String(validation_type.to_string())],
            )
            .await?;
        contracts::expect_bool("isValid", tokens)
    }

    pub async fn get_validation(&self, validation_id: U256) -> Result<ValidationRecord> {
        let tokens = self
            .read("getValidation", &[Token::Uint(validation_id)])
            .await?;

        match <[Token; 4]>::try_from(tokens) {
            Ok([agent_id, validation_type, validator, timestamp]) => Ok(ValidationRecord {
                validation_id,
                agent_id: agent_id.into_uint().ok_or_else(|| contracts::mismatch("getValidation"))?,
                validation_type: validation_type
                    .into_string()
                    .ok_or_else(|| contracts::mismatch("getValidation"))?,
                validator: validator
                    .into_address()
                    .ok_or_else(|| contracts::mismatch("getValidation"))?,
                timestamp: timestamp
                    .into_uint()
                    .ok_or_else(|| contracts::mismatch("getValidation"))?,
            }),
            Err(_) => Err(contracts::mismatch("getValidation")),
        }
    }

    pub async fn get_version(&self) -> Result<String> {
        let tokens = self.read("getVersion", &[]).await?;
        contracts::expect_string("getVersion", tokens)
    }

    async fn read(&self, function: &'static str, args: &[Token]) -> Result<Vec<Token>> {
        let data = VALIDATION_REGISTRY.encode(function, args)?;
        let output = self.transport.call(self.address, data).await?;
        VALIDATION_REGISTRY.decode(function, &output)
    }
}

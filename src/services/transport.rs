use std::time::Duration;

use async_trait::async_trait;
use ethers::{
    middleware::signer::SignerMiddlewareError,
    prelude::*,
    providers::{Http, Provider},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionReceipt, TxHash},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("RPC error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid RPC URL {url}: {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("No signing key configured; write operations need a private key")]
    MissingSigner,

    #[error("Transaction {0:#x} was dropped from the mempool")]
    Dropped(TxHash),

    #[error("Transaction {0:#x} reverted")]
    Reverted(TxHash),
}

/// The blockchain client the registries talk through.
///
/// Implementations submit raw calldata to a contract and hand back either
/// the call result or the mined receipt. No retries happen at this layer or
/// above it.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Executes a read-only call against `to`.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError>;

    /// Signs and submits a transaction to `to`, then waits until it is mined.
    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, TransportError>;

    async fn block_number(&self) -> Result<u64, TransportError>;

    /// Account that signs transactions, if any.
    fn sender(&self) -> Option<Address>;
}

/// JSON-RPC transport over HTTP, optionally holding a local signing key.
pub struct EthersTransport {
    provider: Provider<Http>,
    signer: Option<SignerMiddleware<Provider<Http>, LocalWallet>>,
}

impl EthersTransport {
    pub fn new(
        rpc_url: &str,
        private_key: Option<&str>,
        chain_id: u64,
    ) -> Result<Self, TransportError> {
        let provider =
            Provider::<Http>::try_from(rpc_url).map_err(|e| TransportError::InvalidRpcUrl {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?;

        let signer = match private_key {
            Some(key) => {
                let wallet = key
                    .trim_start_matches("0x")
                    .parse::<LocalWallet>()
                    .map_err(|e| TransportError::Signer(e.to_string()))?
                    .with_chain_id(chain_id);
                tracing::info!("Signing transactions as {:#x}", wallet.address());
                Some(SignerMiddleware::new(provider.clone(), wallet))
            }
            None => None,
        };

        Ok(Self { provider, signer })
    }

    /// How often pending transactions are polled for a receipt. ethers
    /// defaults to 7s, which is slow for local dev chains.
    pub fn with_poll_interval(self, interval: Duration) -> Self {
        let provider = self.provider.interval(interval);
        let signer = self
            .signer
            .map(|s| SignerMiddleware::new(provider.clone(), s.signer().clone()));
        Self { provider, signer }
    }
}

#[async_trait]
impl ChainTransport for EthersTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError> {
        let mut request = TransactionRequest::new().to(to).data(data);
        if let Some(from) = self.sender() {
            request = request.from(from);
        }
        let tx: TypedTransaction = request.into();
        Ok(self.provider.call(&tx, None).await?)
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, TransportError> {
        let signer = self.signer.as_ref().ok_or(TransportError::MissingSigner)?;

        let tx = TransactionRequest::new().to(to).data(data);
        let pending = signer.send_transaction(tx, None).await.map_err(|e| match e {
            // Node errors (including reverts during gas estimation) keep their JSON-RPC payload
            SignerMiddlewareError::MiddlewareError(e) => TransportError::Provider(e),
            other => TransportError::Signer(other.to_string()),
        })?;
        let tx_hash = *pending;

        tracing::info!("Transaction {:#x} sent, waiting for confirmation...", tx_hash);

        let receipt = pending.await?.ok_or(TransportError::Dropped(tx_hash))?;

        if receipt.status != Some(1.into()) {
            return Err(TransportError::Reverted(tx_hash));
        }

        tracing::info!(
            "Transaction {:#x} confirmed in block {}",
            tx_hash,
            receipt.block_number.unwrap_or_default()
        );

        Ok(receipt)
    }

    async fn block_number(&self) -> Result<u64, TransportError> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    fn sender(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardhat/Anvil default account #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn sender_derives_from_key() {
        let transport = EthersTransport::new("http://localhost:8545", Some(TEST_KEY), 97).unwrap();
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(transport.sender(), Some(expected));
    }

    #[test]
    fn read_only_without_key() {
        let transport = EthersTransport::new("http://localhost:8545", None, 97).unwrap();
        assert!(transport.sender().is_none());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            EthersTransport::new("not a url", None, 97),
            Err(TransportError::InvalidRpcUrl { .. })
        ));
        assert!(matches!(
            EthersTransport::new("http://localhost:8545", Some("0xzz"), 97),
            Err(TransportError::Signer(_))
        ));
    }

    #[test]
    fn poll_interval_keeps_the_signer() {
        let transport = EthersTransport::new("http://localhost:8545", Some(TEST_KEY), 97)
            .unwrap()
            .with_poll_interval(Duration::from_millis(10));
        assert_eq!(transport.provider.get_interval(), Duration::from_millis(10));
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(transport.sender(), Some(expected));
    }

    #[tokio::test]
    async fn writes_need_a_signer() {
        let transport = EthersTransport::new("http://localhost:8545", None, 97).unwrap();
        let err = transport
            .send_transaction(Address::zero(), Bytes::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::MissingSigner));
    }
}

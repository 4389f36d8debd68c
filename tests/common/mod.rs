#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use erc8004::{ChainTransport, TransportError};
use ethers::{
    abi::{self, Token},
    providers::ProviderError,
    types::{Address, Bytes, Log, TransactionReceipt, H256, U256, U64},
    utils::{id, keccak256},
};

pub const SENDER: Address = Address::repeat_byte(0xAA);

/// In-memory transport: canned call results keyed by function signature,
/// queued receipts for transactions, and a counter of every request made.
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<HashMap<[u8; 4], Bytes>>,
    reverts: Mutex<HashMap<[u8; 4], String>>,
    receipts: Mutex<VecDeque<TransactionReceipt>>,
    sent: Mutex<Vec<(Address, Bytes)>>,
    requests: AtomicUsize,
    offline: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Answers calls to `signature` (e.g. `"ownerOf(uint256)"`) with the
    /// ABI encoding of `output`.
    pub fn respond(&self, signature: &str, output: &[Token]) {
        self.calls
            .lock()
            .unwrap()
            .insert(id(signature), abi::encode(output).into());
    }

    pub fn revert(&self, signature: &str, reason: &str) {
        self.reverts
            .lock()
            .unwrap()
            .insert(id(signature), reason.to_string());
    }

    pub fn push_receipt(&self, receipt: TransactionReceipt) {
        self.receipts.lock().unwrap().push_back(receipt);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(Address, Bytes)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainTransport for MockTransport {
    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);

        if let Some(reason) = self.reverts.lock().unwrap().get(&selector) {
            return Err(ProviderError::CustomError(reason.clone()).into());
        }
        self.calls
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| ProviderError::CustomError("execution reverted".to_string()).into())
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((to, data));
        self.receipts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(TransportError::MissingSigner)
    }

    async fn block_number(&self) -> Result<u64, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(ProviderError::CustomError("connection refused".to_string()).into());
        }
        Ok(1234)
    }

    fn sender(&self) -> Option<Address> {
        Some(SENDER)
    }
}

pub fn receipt(logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: H256::repeat_byte(0x01),
        block_number: Some(U64::from(4242)),
        from: SENDER,
        status: Some(U64::from(1)),
        logs,
        ..Default::default()
    }
}

fn word(bytes: &[u8]) -> H256 {
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    H256::from(out)
}

fn uint_topic(value: u64) -> H256 {
    let mut out = [0u8; 32];
    U256::from(value).to_big_endian(&mut out);
    H256::from(out)
}

pub fn registered_log(emitter: Address, agent_id: u64, uri: &str) -> Log {
    Log {
        address: emitter,
        topics: vec![
            H256::from(keccak256("Registered(uint256,string,address)")),
            uint_topic(agent_id),
            word(SENDER.as_bytes()),
        ],
        data: abi::encode(&[Token::String(uri.to_string())]).into(),
        ..Default::default()
    }
}

pub fn transfer_log(emitter: Address, from: Address, token_id: u64) -> Log {
    Log {
        address: emitter,
        topics: vec![
            H256::from(keccak256("Transfer(address,address,uint256)")),
            word(from.as_bytes()),
            word(SENDER.as_bytes()),
            uint_topic(token_id),
        ],
        ..Default::default()
    }
}

pub fn validated_log(emitter: Address, agent_id: u64, kind: &str, validation_id: u64) -> Log {
    Log {
        address: emitter,
        topics: vec![
            H256::from(keccak256("Validated(uint256,string,address,uint256)")),
            uint_topic(agent_id),
            word(SENDER.as_bytes()),
        ],
        data: abi::encode(&[
            Token::String(kind.to_string()),
            Token::Uint(U256::from(validation_id)),
        ])
        .into(),
        ..Default::default()
    }
}

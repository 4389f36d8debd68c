mod common;

use std::sync::Arc;

use common::{receipt, validated_log, MockTransport, SENDER};
use erc8004::{get_chain, Erc8004Error, ReputationRegistry, ValidationRegistry};
use ethers::{
    abi::{self, ParamType, Token},
    types::{Address, H256, U256},
    utils::id,
};

#[tokio::test]
async fn out_of_range_score_never_reaches_the_chain() {
    let chain = get_chain("bsc-testnet").unwrap();
    let transport = Arc::new(MockTransport::new());
    let reputation = ReputationRegistry::new(transport.clone(), &chain).unwrap();

    let err = reputation
        .submit_score(U256::one(), "accuracy", 150, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Erc8004Error::ScoreOutOfRange(150)));
    assert_eq!(transport.requests(), 0);
}

#[tokio::test]
async fn submit_score_encodes_empty_evidence() {
    let chain = get_chain("bsc-testnet").unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.push_receipt(receipt(vec![]));
    let reputation = ReputationRegistry::new(transport.clone(), &chain).unwrap();

    let tx = reputation
        .submit_score(U256::from(9), "accuracy", 100, None)
        .await
        .unwrap();
    assert_eq!(tx, H256::repeat_byte(0x01));

    let (to, data) = transport.sent().remove(0);
    assert_eq!(Some(to), chain.reputation_registry);
    assert_eq!(&data[..4], &id("submitScore(uint256,string,uint256,string)"));
    let args = abi::decode(
        &[
            ParamType::Uint(256),
            ParamType::String,
            ParamType::Uint(256),
            ParamType::String,
        ],
        &data[4..],
    )
    .unwrap();
    assert_eq!(args[2], Token::Uint(U256::from(100)));
    assert_eq!(args[3], Token::String(String::new()));
}

#[tokio::test]
async fn scores_decode_as_pairs() {
    let chain = get_chain("bsc-testnet").unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.respond(
        "getScore(uint256,string)",
        &[Token::Uint(U256::from(87)), Token::Uint(U256::from(4))],
    );
    transport.respond(
        "getAggregateScore(uint256)",
        &[Token::Uint(U256::from(91)), Token::Uint(U256::from(12))],
    );
    let reputation = ReputationRegistry::new(transport, &chain).unwrap();

    let score = reputation.get_score(U256::one(), "accuracy").await.unwrap();
    assert_eq!(score.score, U256::from(87));
    assert_eq!(score.count, U256::from(4));

    let aggregate = reputation.get_aggregate_score(U256::one()).await.unwrap();
    assert_eq!(aggregate.score, U256::from(91));
    assert_eq!(aggregate.count, U256::from(12));
}

#[tokio::test]
async fn validate_returns_event_id() {
    let chain = get_chain("bsc-testnet").unwrap();
    let registry = chain.validation_registry.unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.push_receipt(receipt(vec![
        // Same event from an unrelated contract is ignored
        validated_log(Address::repeat_byte(0x55), 1, "identity", 999),
        validated_log(registry, 1, "identity", 31),
    ]));
    let validation = ValidationRegistry::new(transport.clone(), &chain).unwrap();

    let validation_id = validation
        .validate(U256::one(), "identity", b"proof")
        .await
        .unwrap();
    assert_eq!(validation_id, U256::from(31));
    assert_eq!(&transport.sent()[0].1[..4], &id("validate(uint256,string,bytes)"));
}

#[tokio::test]
async fn validate_without_event_is_unresolvable() {
    let chain = get_chain("bsc-testnet").unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.push_receipt(receipt(vec![]));
    let validation = ValidationRegistry::new(transport, &chain).unwrap();

    let err = validation
        .validate(U256::one(), "identity", &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Erc8004Error::ValidationIdUnresolvable { tx_hash } if tx_hash == H256::repeat_byte(0x01)
    ));
}

#[tokio::test]
async fn validation_reads() {
    let chain = get_chain("bsc-testnet").unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.respond("isValid(uint256,string)", &[Token::Bool(true)]);
    transport.respond(
        "getValidation(uint256)",
        &[
            Token::Uint(U256::from(7)),
            Token::String("identity".into()),
            Token::Address(SENDER),
            Token::Uint(U256::from(1_700_000_000u64)),
        ],
    );
    let validation = ValidationRegistry::new(transport, &chain).unwrap();

    assert!(validation.is_valid(U256::from(7), "identity").await.unwrap());

    let record = validation.get_validation(U256::from(31)).await.unwrap();
    assert_eq!(record.validation_id, U256::from(31));
    assert_eq!(record.agent_id, U256::from(7));
    assert_eq!(record.validation_type, "identity");
    assert_eq!(record.validator, SENDER);
    assert_eq!(record.validated_at().unwrap().timestamp(), 1_700_000_000);
}

#[test]
fn missing_registries_fail_at_construction() {
    let ethereum = get_chain("ethereum").unwrap();
    let transport = Arc::new(MockTransport::new());

    assert!(ReputationRegistry::new(transport.clone(), &ethereum).is_ok());
    let err = ValidationRegistry::new(transport, &ethereum).err().unwrap();
    match err {
        Erc8004Error::RegistryNotDeployed { registry, chain } => {
            assert_eq!(registry, "Validation");
            assert_eq!(chain, "Ethereum Mainnet");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

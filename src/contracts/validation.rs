use std::sync::LazyLock;

use ethers::{abi, types::U256};

use super::{param, ContractAbi, EventRule};

// ERC-8004 ValidationRegistry (core functions)
pub static VALIDATION_REGISTRY: LazyLock<ContractAbi> = LazyLock::new(|| {
    ContractAbi::parse(&[
        "function validate(uint256 agentId, string validationType, bytes evidence) returns (uint256 validationId)",
        "function isValid(uint256 agentId, string validationType) view returns (bool)",
        "function getValidation(uint256 validationId) view returns (uint256 agentId, string validationType, address validator, uint256 timestamp)",
        "function getVersion() view returns (string)",
        "event Validated(uint256 indexed agentId, string validationType, address indexed validator, uint256 validationId)",
    ])
});

pub const VALIDATION_ID_RULES: &[EventRule] = &[EventRule {
    event: "Validated",
    extract: validation_id,
}];

fn validation_id(log: &abi::Log) -> Option<U256> {
    param(log, "validationId")?.clone().into_uint()
}

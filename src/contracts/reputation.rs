use std::sync::LazyLock;

use super::ContractAbi;

// ERC-8004 ReputationRegistry (core functions)
pub static REPUTATION_REGISTRY: LazyLock<ContractAbi> = LazyLock::new(|| {
    ContractAbi::parse(&[
        "function submitScore(uint256 agentId, string domain, uint256 score, string evidence)",
        "function getScore(uint256 agentId, string domain) view returns (uint256 score, uint256 count)",
        "function getAggregateScore(uint256 agentId) view returns (uint256 score, uint256 totalReviews)",
        "function getVersion() view returns (string)",
        "event ScoreSubmitted(uint256 indexed agentId, string domain, uint256 score, address indexed reviewer)",
    ])
});

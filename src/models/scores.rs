use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Reputation score and the number of reviews behind it.
///
/// For aggregate scores `count` is the total number of reviews across all
/// domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationScore {
    pub score: U256,
    pub count: U256,
}

/// A validation attestation recorded in the validation registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub validation_id: U256,
    pub agent_id: U256,
    pub validation_type: String,
    pub validator: Address,
    pub timestamp: U256,
}

impl ValidationRecord {
    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp > U256::from(i64::MAX as u64) {
            return None;
        }
        DateTime::from_timestamp(self.timestamp.as_u64() as i64, 0)
    }
}

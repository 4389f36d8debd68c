use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Erc8004Error, Result};

pub const DEFAULT_AGENT_TYPE: &str = "AI Agent";

/// Protocol labels commonly used for [`AgentService::name`].
pub mod service_type {
    pub const A2A: &str = "A2A";
    pub const MCP: &str = "MCP";
    pub const REST: &str = "REST";
    pub const GRAPHQL: &str = "GraphQL";
    pub const WEBSOCKET: &str = "WebSocket";
    pub const CUSTOM: &str = "Custom";
}

/// A service endpoint exposed by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentService {
    pub name: String,
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl AgentService {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            description: None,
            version: None,
        }
    }
}

/// Service entry as handed to the high-level register call: either already
/// typed, or a raw field map such as `{"name": "A2A", "endpoint": "..."}`.
#[derive(Debug, Clone)]
pub enum ServiceInput {
    Typed(AgentService),
    Raw(HashMap<String, String>),
}

impl From<AgentService> for ServiceInput {
    fn from(service: AgentService) -> Self {
        ServiceInput::Typed(service)
    }
}

impl From<HashMap<String, String>> for ServiceInput {
    fn from(fields: HashMap<String, String>) -> Self {
        ServiceInput::Raw(fields)
    }
}

impl TryFrom<ServiceInput> for AgentService {
    type Error = Erc8004Error;

    fn try_from(input: ServiceInput) -> Result<Self> {
        match input {
            ServiceInput::Typed(service) => Ok(service),
            ServiceInput::Raw(mut fields) => {
                let name = fields.remove("name").ok_or_else(|| {
                    Erc8004Error::InvalidMetadata("service entry is missing 'name'".to_string())
                })?;
                let endpoint = fields.remove("endpoint").ok_or_else(|| {
                    Erc8004Error::InvalidMetadata(format!(
                        "service '{}' is missing 'endpoint'",
                        name
                    ))
                })?;
                Ok(AgentService {
                    name,
                    endpoint,
                    description: fields.remove("description"),
                    version: fields.remove("version"),
                })
            }
        }
    }
}

/// Trust mechanism advertised by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(rename = "type")]
    pub trust_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

/// x402 payment support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tokens")]
    pub tokens: Vec<String>,

    #[serde(
        default,
        rename = "minAmount",
        alias = "min_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_amount: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tokens: default_tokens(),
            min_amount: None,
            receiver: None,
        }
    }
}

/// Agent registration document, stored on-chain as the agent URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    #[serde(rename = "type", default = "default_agent_type")]
    pub agent_type: String,

    pub name: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub services: Vec<AgentService>,

    #[serde(
        default,
        rename = "x402Support",
        alias = "paymentConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment: Option<PaymentConfig>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub registrations: Vec<Map<String, Value>>,

    #[serde(default, rename = "supportedTrust")]
    pub supported_trust: Vec<TrustConfig>,
}

impl AgentMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            agent_type: default_agent_type(),
            name: name.into(),
            description: description.into(),
            image: None,
            services: Vec::new(),
            payment: None,
            active: true,
            registrations: Vec::new(),
            supported_trust: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: AgentService) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_payment(mut self, payment: PaymentConfig) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Checks the invariants serde cannot express: name and description
    /// must be non-empty.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        Ok(())
    }
}

/// A key/value pair stored directly in the identity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_agent_type() -> String {
    DEFAULT_AGENT_TYPE.to_string()
}

fn default_tokens() -> Vec<String> {
    ["USDC", "USDT", "BNB"].iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_metadata_defaults() {
        let meta = AgentMetadata::new("Test Agent", "A test agent");
        assert_eq!(meta.agent_type, "AI Agent");
        assert!(meta.active);
        assert!(meta.services.is_empty());
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let meta = AgentMetadata::new("Test", "Test")
            .with_service(AgentService::new("A2A", "https://example.com/a2a"));
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "AI Agent",
                "name": "Test",
                "description": "Test",
                "services": [{"name": "A2A", "endpoint": "https://example.com/a2a"}],
                "active": true,
                "registrations": [],
                "supportedTrust": []
            })
        );
    }

    #[test]
    fn payment_config_uses_x402_key() {
        let meta = AgentMetadata::new("Pay", "Paid agent").with_payment(PaymentConfig {
            min_amount: Some("0.01".to_string()),
            ..PaymentConfig::default()
        });
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["x402Support"]["enabled"], true);
        assert_eq!(value["x402Support"]["tokens"], json!(["USDC", "USDT", "BNB"]));
        assert_eq!(value["x402Support"]["minAmount"], "0.01");
        assert!(value["x402Support"].get("receiver").is_none());
    }

    #[test]
    fn decodes_aliases_and_defaults() {
        let meta: AgentMetadata = serde_json::from_value(json!({
            "name": "Alias",
            "description": "Uses aliases",
            "paymentConfig": {"min_amount": "5"}
        }))
        .unwrap();

        assert_eq!(meta.agent_type, DEFAULT_AGENT_TYPE);
        let payment = meta.payment.unwrap();
        assert!(payment.enabled);
        assert_eq!(payment.min_amount.as_deref(), Some("5"));
        assert_eq!(payment.tokens.len(), 3);
    }

    #[test]
    fn empty_name_fails_validation() {
        let meta = AgentMetadata::new("  ", "desc");
        assert!(meta.validate().is_err());
        let meta = AgentMetadata::new("name", "");
        assert!(meta.validate().is_err());
    }

    #[test]
    fn raw_service_normalizes() {
        let raw: HashMap<String, String> = [
            ("name".to_string(), "MCP".to_string()),
            ("endpoint".to_string(), "https://example.com/mcp".to_string()),
            ("version".to_string(), "2025-06-18".to_string()),
        ]
        .into_iter()
        .collect();

        let service = AgentService::try_from(ServiceInput::from(raw)).unwrap();
        assert_eq!(service.name, service_type::MCP);
        assert_eq!(service.version.as_deref(), Some("2025-06-18"));
        assert!(service.description.is_none());
    }

    #[test]
    fn raw_service_without_endpoint_is_rejected() {
        let raw: HashMap<String, String> =
            [("name".to_string(), "A2A".to_string())].into_iter().collect();

        let err = AgentService::try_from(ServiceInput::Raw(raw)).unwrap_err();
        assert!(matches!(err, Erc8004Error::InvalidMetadata(_)));
    }
}

use serde_json::{Map, Value};

use crate::{
    error::{Erc8004Error, Result},
    models::{
        AgentMetadata, AgentService, MetadataEntry, PaymentConfig, ServiceInput, TrustConfig,
    },
};

/// Loose registration input for [`Erc8004Client::register`].
///
/// Unset optional fields fall back to the [`AgentMetadata`] defaults.
///
/// [`Erc8004Client::register`]: super::Erc8004Client::register
#[derive(Debug, Clone, Default)]
pub struct NewAgent {
    pub name: String,
    pub description: String,
    pub services: Vec<ServiceInput>,
    pub image: Option<String>,
    pub agent_type: Option<String>,
    pub payment: Option<PaymentConfig>,
    pub active: Option<bool>,
    pub registrations: Vec<Map<String, Value>>,
    pub supported_trust: Vec<TrustConfig>,

    /// Stored on-chain next to the URI rather than inside it.
    pub metadata_entries: Vec<MetadataEntry>,
}

impl NewAgent {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn service(mut self, service: impl Into<ServiceInput>) -> Self {
        self.services.push(service.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn payment(mut self, payment: PaymentConfig) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn trust(mut self, trust: TrustConfig) -> Self {
        self.supported_trust.push(trust);
        self
    }

    pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata_entries.push(MetadataEntry::new(key, value));
        self
    }

    /// Normalizes the input into typed metadata plus on-chain entries.
    pub fn into_metadata(self) -> Result<(AgentMetadata, Vec<MetadataEntry>)> {
        let services = self
            .services
            .into_iter()
            .map(AgentService::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut metadata = AgentMetadata::new(self.name, self.description);
        if let Some(agent_type) = self.agent_type {
            metadata.agent_type = agent_type;
        }
        metadata.image = self.image;
        metadata.services = services;
        metadata.payment = self.payment;
        metadata.active = self.active.unwrap_or(true);
        metadata.registrations = self.registrations;
        metadata.supported_trust = self.supported_trust;

        metadata.validate().map_err(Erc8004Error::InvalidMetadata)?;

        Ok((metadata, self.metadata_entries))
    }
}

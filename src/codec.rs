//! Agent metadata <-> agent URI conversion.
//!
//! Metadata is stored on-chain inline as
//! `data:application/json;base64,<base64 of the UTF-8 JSON document>`.
//! Bare JSON objects are also accepted when reading, since some registrants
//! store the document without the data-URI wrapper.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

use crate::{
    error::{Erc8004Error, Result},
    models::AgentMetadata,
};

pub const DATA_URI_PREFIX: &str = "data:application/json;base64,";

const PREVIEW_CHARS: usize = 80;

/// Encodes metadata as a compact base64 data URI.
pub fn encode_agent_uri(metadata: &AgentMetadata) -> String {
    let json = serde_json::to_string(metadata).expect("agent metadata serialization cannot fail");
    format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(json.as_bytes()))
}

/// Decodes an agent URI into its JSON object without checking the agent
/// schema.
pub fn decode_agent_uri(uri: &str) -> Result<Map<String, Value>> {
    let json = if let Some(payload) = uri.strip_prefix(DATA_URI_PREFIX) {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| unsupported(uri))?;
        String::from_utf8(bytes).map_err(|_| unsupported(uri))?
    } else if uri.starts_with('{') {
        uri.to_string()
    } else {
        return Err(unsupported(uri));
    };

    match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(unsupported(uri)),
    }
}

/// Decodes an agent URI and validates it against the [`AgentMetadata`]
/// schema.
pub fn parse_agent_metadata(uri: &str) -> Result<AgentMetadata> {
    let document = decode_agent_uri(uri)?;
    let metadata: AgentMetadata = serde_json::from_value(Value::Object(document))
        .map_err(|e| Erc8004Error::MetadataSchemaInvalid(e.to_string()))?;
    metadata
        .validate()
        .map_err(Erc8004Error::MetadataSchemaInvalid)?;
    Ok(metadata)
}

fn unsupported(uri: &str) -> Erc8004Error {
    Erc8004Error::UnsupportedUriFormat {
        preview: uri.chars().take(PREVIEW_CHARS).collect(),
    }
}

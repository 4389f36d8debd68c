//! Registry ABIs and the helpers that encode calls and read events with them.

pub mod identity;
pub mod reputation;
pub mod validation;

use ethers::{
    abi::{self, Abi, Event, RawLog, Token},
    types::{Address, Bytes, Log, U256},
};

use crate::error::{Erc8004Error, Result};

/// A parsed contract interface.
pub struct ContractAbi {
    abi: Abi,
}

impl ContractAbi {
    /// Parses a human-readable ABI. Only used with the static tables in this
    /// module.
    fn parse(signatures: &[&str]) -> Self {
        let abi = abi::parse_abi(signatures).expect("static registry ABI is valid");
        Self { abi }
    }

    /// Encodes a call to `name`, picking the overload whose arity matches
    /// `args`.
    pub fn encode(&self, name: &'static str, args: &[Token]) -> Result<Bytes> {
        let function = self
            .abi
            .functions_by_name(name)
            .map_err(|source| Erc8004Error::Abi { function: name, source })?
            .iter()
            .find(|f| f.inputs.len() == args.len())
            .ok_or_else(|| Erc8004Error::Abi {
                function: name,
                source: abi::Error::InvalidName(format!("{}/{}", name, args.len())),
            })?;

        function
            .encode_input(args)
            .map(Bytes::from)
            .map_err(|source| Erc8004Error::Abi { function: name, source })
    }

    /// Decodes the return data of `name`.
    pub fn decode(&self, name: &'static str, data: &[u8]) -> Result<Vec<Token>> {
        self.abi
            .function(name)
            .and_then(|f| f.decode_output(data))
            .map_err(|source| Erc8004Error::Abi { function: name, source })
    }

    pub fn event(&self, name: &'static str) -> Result<&Event> {
        self.abi
            .event(name)
            .map_err(|source| Erc8004Error::Abi { function: name, source })
    }
}

/// One way of reading a protocol value out of a receipt: an event name and
/// an extractor over its decoded parameters.
pub struct EventRule {
    pub event: &'static str,
    pub extract: fn(&abi::Log) -> Option<U256>,
}

/// Evaluates `rules` in priority order against the logs `emitter` produced.
/// The first rule with a matching log wins; logs that do not decode against
/// the rule's event are skipped.
pub fn first_match(
    contract: &ContractAbi,
    emitter: Address,
    logs: &[Log],
    rules: &[EventRule],
) -> Result<Option<U256>> {
    for rule in rules {
        let event = contract.event(rule.event)?;
        let signature = event.signature();

        let found = logs
            .iter()
            .filter(|log| log.address == emitter && log.topics.first() == Some(&signature))
            .filter_map(|log| {
                event
                    .parse_log(RawLog {
                        topics: log.topics.clone(),
                        data: log.data.to_vec(),
                    })
                    .ok()
            })
            .find_map(|decoded| (rule.extract)(&decoded));

        if found.is_some() {
            tracing::debug!("Resolved value from {} event", rule.event);
            return Ok(found);
        }
    }
    Ok(None)
}

/// Looks up a decoded event parameter by name.
pub fn param<'a>(log: &'a abi::Log, name: &str) -> Option<&'a Token> {
    log.params.iter().find(|p| p.name == name).map(|p| &p.value)
}

pub(crate) fn expect_string(function: &'static str, tokens: Vec<Token>) -> Result<String> {
    single(function, tokens)?
        .into_string()
        .ok_or_else(|| mismatch(function))
}

pub(crate) fn expect_address(function: &'static str, tokens: Vec<Token>) -> Result<Address> {
    single(function, tokens)?
        .into_address()
        .ok_or_else(|| mismatch(function))
}

pub(crate) fn expect_uint(function: &'static str, tokens: Vec<Token>) -> Result<U256> {
    single(function, tokens)?
        .into_uint()
        .ok_or_else(|| mismatch(function))
}

pub(crate) fn expect_bool(function: &'static str, tokens: Vec<Token>) -> Result<bool> {
    single(function, tokens)?
        .into_bool()
        .ok_or_else(|| mismatch(function))
}

pub(crate) fn expect_bytes(function: &'static str, tokens: Vec<Token>) -> Result<Vec<u8>> {
    single(function, tokens)?
        .into_bytes()
        .ok_or_else(|| mismatch(function))
}

fn single(function: &'static str, tokens: Vec<Token>) -> Result<Token> {
    tokens.into_iter().next().ok_or_else(|| mismatch(function))
}

pub(crate) fn mismatch(function: &'static str) -> Erc8004Error {
    Erc8004Error::Abi {
        function,
        source: abi::Error::InvalidData,
    }
}

//! EIP-712 typed message handling
//!
//! - [`validate_typed_message`]: shape check of the JSON typed by the user
//! - [`TypedMessage`]: the standard `{domain, types, primaryType, message}` document
//! - [`TypedMessage::signing_payload`]: the `eth_signTypedData_v4` argument

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::{
    errors::ValidationError,
    types::placeholder_address_hex,
};

const DOMAIN_TYPE: &str = "EIP712Domain";

/// Keys every typed message document must carry
const REQUIRED_KEYS: [&str; 4] = ["domain", "message", "primaryType", "types"];

/// Validate and pretty-print a typed message
///
/// # Returns
/// * `(pretty, None)` - Well-formed typed message, re-serialized with 2-space indent
/// * `(pretty, Some(InvalidTypedMessage))` - Valid JSON missing a required key
/// * `(input, Some(UnknownError))` - Not JSON; the text is returned untouched
pub fn validate_typed_message(input: &str) -> (String, Option<ValidationError>) {
    let message: Value = match serde_json::from_str(input) {
        Ok(message) => message,
        Err(_) => return (input.to_string(), Some(ValidationError::UnknownError)),
    };
    let pretty = match serde_json::to_string_pretty(&message) {
        Ok(pretty) => pretty,
        Err(_) => return (input.to_string(), Some(ValidationError::UnknownError)),
    };

    let is_typed_message = message
        .as_object()
        .is_some_and(|object| REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)));
    if is_typed_message {
        (pretty, None)
    } else {
        (pretty, Some(ValidationError::InvalidTypedMessage))
    }
}

/// Member of a struct type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedMessageTypesEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypedMessageTypesEntry {
    fn new(name: &str, kind: &str) -> Self {
        Self { name: name.to_string(), kind: kind.to_string() }
    }
}

/// EIP-712 domain; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedMessageDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number or hex string, as wallets accept both
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl TypedMessageDomain {
    /// `EIP712Domain` members for the fields present, in canonical order
    pub fn type_entries(&self) -> Vec<TypedMessageTypesEntry> {
        let mut entries = Vec::new();
        if self.name.is_some() {
            entries.push(TypedMessageTypesEntry::new("name", "string"));
        }
        if self.version.is_some() {
            entries.push(TypedMessageTypesEntry::new("version", "string"));
        }
        if self.chain_id.is_some() {
            entries.push(TypedMessageTypesEntry::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            entries.push(TypedMessageTypesEntry::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            entries.push(TypedMessageTypesEntry::new("salt", "bytes32"));
        }
        entries
    }
}

/// A complete typed message document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedMessage {
    pub domain: TypedMessageDomain,
    pub types: BTreeMap<String, Vec<TypedMessageTypesEntry>>,
    pub primary_type: String,
    pub message: serde_json::Map<String, Value>,
}

impl TypedMessage {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Serialize for `eth_signTypedData_v4`
    ///
    /// The user's `EIP712Domain` definition is discarded and regenerated from
    /// the domain fields actually present.
    pub fn signing_payload(&self) -> Result<String, serde_json::Error> {
        let mut payload = self.clone();
        payload.types.remove(DOMAIN_TYPE);
        payload.types.insert(DOMAIN_TYPE.to_string(), self.domain.type_entries());
        serde_json::to_string(&payload)
    }
}

/// Starter message offered when the signer form opens
pub fn default_typed_message(chain_id: u64) -> String {
    let placeholder = placeholder_address_hex();
    let message = json!({
        "domain": {
            "verifyingContract": placeholder,
            "chainId": chain_id,
        },
        "primaryType": "Test",
        "message": { "owner": placeholder },
        "types": {
            "EIP712Domain": [
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            "Test": [{ "name": "owner", "type": "address" }],
        },
    });
    serde_json::to_string_pretty(&message).unwrap_or_default()
}

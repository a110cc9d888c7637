//! Core types for the clear signing tester
//!
//! This module defines the data structures shared across helpers and forms:
//! - Transaction drafts and fee snapshots
//! - Per-field form input state
//! - NFT classification
//! - Chain metadata and block explorer rows

use std::collections::HashMap;
pub use alloy::primitives::{Address, U256, Bytes, TxHash};
use serde::{Deserialize, Serialize};
use crate::errors::ValidationError;

/// Gas limit used before an estimate arrives, and when estimation fails
pub const MINIMAL_L1_GAS_LIMIT: u64 = 210_000;

/// Linea Sepolia, the network the tester offers to switch to
pub const LINEA_SEPOLIA_CHAIN_ID: u64 = 0xe705;

/// Recipient used to pre-fill `to`/`spender`/`operator` arguments
pub const PLACEHOLDER_ADDRESS: Address =
    alloy::primitives::address!("000000000000000000000000deadbeefdeadbeef");

/// [`PLACEHOLDER_ADDRESS`] as written into form fields (lowercase, `0x`-prefixed)
pub fn placeholder_address_hex() -> String {
    PLACEHOLDER_ADDRESS.to_string().to_lowercase()
}

/// Current fee parameters of the connected network
///
/// Replaced wholesale on every refresh; legacy and fee-market fields never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeeData {
    /// Flat gas price (pre EIP-1559 chains)
    Legacy {
        gas_price: u128,
    },
    /// Base fee plus priority fee pricing
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

impl FeeData {
    /// Transaction envelope type matching these fees (0 or 2)
    pub fn tx_type(&self) -> u8 {
        match self {
            FeeData::Legacy { .. } => 0,
            FeeData::Eip1559 { .. } => 2,
        }
    }

    /// Price per gas used for the displayed cost estimate
    pub fn price_per_gas(&self) -> u128 {
        match self {
            FeeData::Legacy { gas_price } => *gas_price,
            FeeData::Eip1559 { max_fee_per_gas, .. } => *max_fee_per_gas,
        }
    }
}

/// Transaction being assembled by a form
///
/// Mutated field by field as the user types and as estimates arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDraft {
    /// Recipient, `None` while the input is empty or invalid
    pub to: Option<Address>,
    /// Native value in wei
    pub value: U256,
    /// Call data
    pub data: Bytes,
    /// Gas limit, estimated or [`MINIMAL_L1_GAS_LIMIT`]
    pub gas_limit: u64,
    /// Target chain
    pub chain_id: u64,
    /// Latest fee snapshot applied to the draft
    pub fees: Option<FeeData>,
}

impl TxDraft {
    pub fn new(chain_id: u64) -> Self {
        Self {
            to: None,
            value: U256::ZERO,
            data: Bytes::new(),
            gas_limit: MINIMAL_L1_GAS_LIMIT,
            chain_id,
            fees: None,
        }
    }

    /// Overwrite the fee fields with a new snapshot
    pub fn apply_fee_data(&mut self, fees: FeeData) -> &mut Self {
        self.fees = Some(fees);
        self
    }

    pub fn gas_price(&self) -> Option<u128> {
        match self.fees {
            Some(FeeData::Legacy { gas_price }) => Some(gas_price),
            _ => None,
        }
    }

    pub fn max_fee_per_gas(&self) -> Option<u128> {
        match self.fees {
            Some(FeeData::Eip1559 { max_fee_per_gas, .. }) => Some(max_fee_per_gas),
            _ => None,
        }
    }

    pub fn max_priority_fee_per_gas(&self) -> Option<u128> {
        match self.fees {
            Some(FeeData::Eip1559 { max_priority_fee_per_gas, .. }) => Some(max_priority_fee_per_gas),
            _ => None,
        }
    }
}

/// Value and inline error of one form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInput {
    pub value: String,
    pub error: Option<ValidationError>,
}

impl FieldInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), error: None }
    }

    pub fn with_error(value: impl Into<String>, error: Option<ValidationError>) -> Self {
        Self { value: value.into(), error }
    }
}

/// Function argument values keyed by argument name
pub type FieldInputs = HashMap<String, FieldInput>;

/// Token standard of an NFT contract, as detected through ERC-165
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NftType {
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
}

impl std::fmt::Display for NftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NftType::Erc721 => write!(f, "ERC721"),
            NftType::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

/// ERC20 metadata shown next to the token form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    /// Token symbol (e.g., "USDC")
    pub symbol: String,
    /// Number of decimal places
    pub decimals: u8,
    /// Balance of the connected account
    pub balance: U256,
}

/// Block explorer entry of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainExplorer {
    /// Explorer root URL, with trailing slash
    pub url: String,
    pub hosted_by: String,
}

/// Display metadata of a chain, from the chain list service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub name: String,
    pub icon: String,
    /// Native currency symbol
    pub ticker: String,
    #[serde(default)]
    pub explorers: Vec<ChainExplorer>,
}

/// One row of an etherscan-style `txlist` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTransaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub nonce: String,
    pub block_hash: String,
    pub transaction_index: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas: String,
    pub gas_price: String,
    pub is_error: String,
    #[serde(rename = "txreceipt_status")]
    pub txreceipt_status: String,
    #[serde(default)]
    pub input: Option<String>,
    pub contract_address: String,
    pub cumulative_gas_used: String,
    pub gas_used: String,
    pub confirmations: String,
    #[serde(rename = "methodId")]
    pub method_id: String,
    pub function_name: String,
}

impl ExplorerTransaction {
    /// Check if the explorer flagged this transaction as failed
    pub fn is_failed(&self) -> bool {
        self.is_error == "1"
    }
}

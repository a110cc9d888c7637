//! Transaction draft helpers
//!
//! Fee display, gas estimation with a safe fallback, and the default argument
//! values pre-filled when a token function is selected.

use alloy::primitives::utils::{format_ether, format_units};
use crate::{
    contracts::FunctionInput,
    traits::ChainReader,
    types::{placeholder_address_hex, Address, FieldInput, FieldInputs, TxDraft, MINIMAL_L1_GAS_LIMIT, U256},
};

/// Upper bound of the fee the draft can cost, in wei
///
/// `gas_limit * (gas_price | max_fee_per_gas | 0)`
pub fn estimated_fee(draft: &TxDraft) -> U256 {
    let price = draft.fees.map_or(0, |fees| fees.price_per_gas());
    U256::from(draft.gas_limit) * U256::from(price)
}

/// Human readable fee estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSummary {
    /// Total in ether followed by the native ticker, e.g. `0.0042 ETH`
    pub estimated_price: String,
    /// Gas limit and per-gas prices in gwei, `|` separated
    pub breakdown: String,
}

/// Render the fee estimate shown under a transaction form
pub fn describe_fees(draft: &TxDraft, ticker: &str) -> FeeSummary {
    let estimated_price = format!("{} {ticker}", trim_fraction(&format_ether(estimated_fee(draft))));

    let mut parts = vec![format!("Gas Limit: {}", draft.gas_limit)];
    let gwei_fields = [
        ("Gas Price", draft.gas_price()),
        ("Max Priority Fee Per Gas", draft.max_priority_fee_per_gas()),
        ("Max Fee Per Gas", draft.max_fee_per_gas()),
    ];
    for (label, value) in gwei_fields {
        if let Some(value) = value.filter(|v| *v > 0) {
            parts.push(format!("{label}: {} gwei", format_gwei(value)));
        }
    }

    FeeSummary { estimated_price, breakdown: parts.join(" | ") }
}

fn format_gwei(wei: u128) -> String {
    match format_units(U256::from(wei), "gwei") {
        Ok(formatted) => trim_fraction(&formatted),
        Err(_) => wei.to_string(),
    }
}

/// Drop trailing fractional zeros, keeping at least one digit after the point
fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            let fraction = if fraction.is_empty() { "0" } else { fraction };
            format!("{integer}.{fraction}")
        }
        None => formatted.to_string(),
    }
}

/// Estimate gas for the draft, falling back to [`MINIMAL_L1_GAS_LIMIT`]
///
/// Estimation failures (reverts, unreachable node) are logged, never returned.
pub async fn estimate_gas_or_default<R>(reader: &R, from: Option<Address>, draft: &TxDraft) -> u64
where
    R: ChainReader + ?Sized,
{
    match reader.estimate_gas(from, draft).await {
        Ok(gas_limit) => gas_limit,
        Err(error) => {
            tracing::warn!(%error, to = ?draft.to, "gas estimation failed, using minimal gas limit");
            MINIMAL_L1_GAS_LIMIT
        }
    }
}

fn account_hex(account: Option<Address>) -> String {
    account.map(|a| a.to_string()).unwrap_or_default()
}

/// Pre-filled ERC20 arguments
///
/// | argument          | value                |
/// |-------------------|----------------------|
/// | `from`, `owner`   | connected account    |
/// | `to`, `spender`   | placeholder address  |
/// | anything else     | `"0"`                |
pub fn default_token_values(inputs: &[FunctionInput], account: Option<Address>) -> FieldInputs {
    inputs
        .iter()
        .map(|input| {
            let value = match input.name {
                "from" | "owner" => account_hex(account),
                "to" | "spender" => placeholder_address_hex(),
                _ => "0".to_string(),
            };
            (input.name.to_string(), FieldInput::new(value))
        })
        .collect()
}

/// Pre-filled ERC721 / ERC1155 arguments
///
/// Accounts and recipients follow [`default_token_values`] (plus `operator`);
/// ids take the selected token id, quantities default to one token and
/// `data` to empty bytes.
pub fn default_nft_values(
    inputs: &[FunctionInput],
    account: Option<Address>,
    token_id: Option<&str>,
) -> FieldInputs {
    let token_id = token_id.unwrap_or("0");
    inputs
        .iter()
        .map(|input| {
            let value = match input.name {
                "from" | "owner" => account_hex(account),
                "to" | "spender" | "operator" => placeholder_address_hex(),
                "tokenId" | "id" => token_id.to_string(),
                "ids" => format!("{token_id},{token_id}"),
                "amount" => "1".to_string(),
                "amounts" => "1,1".to_string(),
                "data" => "0x".to_string(),
                _ => "0".to_string(),
            };
            (input.name.to_string(), FieldInput::new(value))
        })
        .collect()
}

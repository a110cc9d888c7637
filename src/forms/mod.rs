//! Headless form controllers
//!
//! Each form owns the raw text of its inputs, the per-field
//! [`ValidationError`]s and the [`TxDraft`] that will be handed to the
//! wallet. A front end forwards user edits to the `set_*` methods, calls the
//! async `refresh_*` / `load_*` methods when their inputs changed, and reads
//! back values, errors and the draft.
//!
//! - [`NativeTransferForm`]: plain value transfer with optional call data
//! - [`TokenTransferForm`]: ERC20 `transfer` / `approve`
//! - [`NftTransferForm`]: ERC721 / ERC1155 transfers and approvals
//! - [`TypedMessageForm`]: EIP-712 message signing

mod native;
mod nft;
mod token;
mod typed_message;

pub use native::NativeTransferForm;
pub use nft::NftTransferForm;
pub use token::{common_tokens, TokenTransferForm};
pub use typed_message::{TypedMessageForm, TypedMessagePreset};

use std::str::FromStr;
use crate::{
    contracts::{FunctionInput, ParamKind, TokenFunction},
    errors::{SessionError, ValidationError},
    session::{WalletContext, WalletSession},
    traits::{ChainReader, WalletRpc},
    types::{Address, FieldInput, FieldInputs, TxDraft, TxHash, U256},
    utils::{
        input_validators::{validate_address, validate_uint256_balance},
        transaction_utils::{estimate_gas_or_default, estimated_fee},
    },
};

/// Balances a `uint256` argument is checked against
struct BalanceCheck {
    native_balance: Option<U256>,
    asset_balance: Option<U256>,
    decimals: Option<u8>,
}

/// Validate one function argument according to its ABI kind
///
/// Empty addresses carry no error; lists, flags and bytes are not validated.
fn validate_argument(input: &FunctionInput, raw: &str, draft: &TxDraft, check: BalanceCheck) -> FieldInput {
    match input.kind {
        ParamKind::Uint256 => {
            let result = validate_uint256_balance(
                raw,
                estimated_fee(draft),
                check.native_balance,
                check.asset_balance,
                check.decimals,
            );
            FieldInput::with_error(result.value, result.error)
        }
        ParamKind::Address if raw.is_empty() => FieldInput::new(raw),
        ParamKind::Address => FieldInput::with_error(raw, validate_address(raw)),
        _ => FieldInput::new(raw),
    }
}

fn first_error(inputs: &FieldInputs) -> Option<ValidationError> {
    inputs.values().find_map(|field| field.error)
}

/// Parse a contract address input; invalid text yields `None`
fn parse_address_input(raw: &str) -> Option<Address> {
    match validate_address(raw) {
        None | Some(ValidationError::Eip55IncorrectChecksum) => Address::from_str(raw).ok(),
        Some(_) => None,
    }
}

/// Re-encode the call and refresh the gas limit
///
/// Encoding failures leave the draft with empty data; gas estimation failures
/// fall back to the minimal limit.
async fn refresh_call<R>(
    reader: &R,
    context: &WalletContext,
    draft: &mut TxDraft,
    function: TokenFunction,
    inputs: &FieldInputs,
    decimals: u8,
) where
    R: ChainReader + ?Sized,
{
    draft.data = match function.encode(inputs, decimals) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(%error, function = function.name(), "calldata encoding failed");
            Default::default()
        }
    };
    draft.gas_limit = estimate_gas_or_default(reader, context.account, draft).await;
}

/// Submit a draft after the form's own checks passed
async fn submit_draft<W: WalletRpc>(
    session: &WalletSession<W>,
    draft: &TxDraft,
    pending_error: Option<ValidationError>,
) -> Result<TxHash, SessionError> {
    if let Some(error) = pending_error {
        return Err(SessionError::Invalid(error));
    }
    session.send_transaction(draft).await
}

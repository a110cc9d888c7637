//! ERC20 token utilities for querying token information and balances
//!
//! Backs the token form: the ticker and decimals shown next to the amount
//! input, and the balance the amount is validated against.

use crate::{
    contracts::{call_contract, IERC20},
    errors::TokenError,
    traits::ChainReader,
    types::{Address, TokenInfo, U256},
};

/// Query ERC20 token balance for a specific address
///
/// Executes the `balanceOf(address)` function on the specified token contract.
///
/// # Arguments
/// - `reader`: chain access for the call
/// - `token_address`: Address of the ERC20 token contract
/// - `owner`: Address to query balance for
///
/// # Returns
/// - `Ok(U256)`: Token balance in the token's smallest unit
/// - `Err(TokenError)`: If the contract call fails or returns invalid data
pub async fn query_erc20_balance<R>(
    reader: &R,
    token_address: Address,
    owner: Address,
) -> Result<U256, TokenError>
where
    R: ChainReader + ?Sized,
{
    call_contract(reader, token_address, IERC20::balanceOfCall { owner }).await
}

/// Query symbol, decimals and the owner's balance in one go
///
/// The three calls run concurrently; the first failure is returned.
pub async fn get_token_info<R>(
    reader: &R,
    token_address: Address,
    owner: Address,
) -> Result<TokenInfo, TokenError>
where
    R: ChainReader + ?Sized,
{
    let (symbol, decimals, balance) = tokio::try_join!(
        call_contract(reader, token_address, IERC20::symbolCall {}),
        call_contract(reader, token_address, IERC20::decimalsCall {}),
        query_erc20_balance(reader, token_address, owner),
    )?;

    Ok(TokenInfo { symbol, decimals, balance })
}

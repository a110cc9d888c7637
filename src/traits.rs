//! Node and wallet access traits
//!
//! Every network-backed helper in this crate is written against these traits
//! instead of a concrete provider:
//! - `ChainReader`: read-only node queries (fees, balances, calls, gas)
//! - `WalletRpc`: the injected-wallet requests (accounts, chain switch, signing)
//!
//! [`RpcBackend`](crate::backend::RpcBackend) implements both on top of an
//! alloy provider; tests implement them in memory.

use async_trait::async_trait;
use alloy::rpc::types::FeeHistory;
use crate::{
    errors::RpcError,
    types::{Address, Bytes, TxDraft, TxHash, U256},
};

/// Read-only chain access
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Base fee of the latest block, `None` on chains without EIP-1559
    async fn latest_base_fee(&self) -> Result<Option<u128>, RpcError>;

    /// `eth_feeHistory` ending at the latest block
    async fn fee_history(
        &self,
        block_count: u64,
        reward_percentiles: &[f64],
    ) -> Result<FeeHistory, RpcError>;

    /// Flat gas price (`eth_gasPrice`)
    async fn gas_price(&self) -> Result<u128, RpcError>;

    /// Native balance of `owner` at the latest block
    async fn balance(&self, owner: Address) -> Result<U256, RpcError>;

    /// `eth_call` against `to` with raw calldata
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError>;

    /// Gas estimate for the draft's recipient, value and data
    async fn estimate_gas(&self, from: Option<Address>, draft: &TxDraft) -> Result<u64, RpcError>;
}

/// Requests only an injected wallet can answer
#[async_trait]
pub trait WalletRpc: ChainReader {
    /// `eth_requestAccounts`
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// `wallet_switchEthereumChain`
    async fn switch_chain(&self, chain_id: u64) -> Result<(), RpcError>;

    /// Hand the full draft to the wallet for signing and broadcast
    async fn send_transaction(&self, from: Address, draft: &TxDraft) -> Result<TxHash, RpcError>;

    /// `eth_signTypedData_v4` with an already serialized payload
    async fn sign_typed_data(&self, signer: Address, payload: &str) -> Result<Bytes, RpcError>;
}

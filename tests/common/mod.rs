//! In-memory node and wallet used by the integration tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Mutex,
    },
};
use async_trait::async_trait;
use alloy::{
    primitives::{address, Address, Bytes, TxHash, U256},
    rpc::types::FeeHistory,
    sol_types::{SolCall, SolValue},
};
use clear_signing_tester::{
    errors::RpcError,
    traits::{ChainReader, WalletRpc},
    types::TxDraft,
};

pub const ACCOUNT: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

/// Scripted chain: every answer is configured up front
#[derive(Debug, Default)]
pub struct MockChain {
    /// Updated by `switch_chain`
    pub chain_id: AtomicU64,
    pub base_fee: Option<u128>,
    pub fee_history: FeeHistory,
    pub gas_price: u128,
    pub balances: HashMap<Address, U256>,
    /// `(contract, calldata)` to return data; missing entries revert
    pub calls: HashMap<(Address, Bytes), Bytes>,
    /// `None` makes estimation fail
    pub gas_estimate: Option<u64>,
    pub accounts: Vec<Address>,
    pub fee_queries: AtomicUsize,
    pub switched_to: Mutex<Vec<u64>>,
    pub sent: Mutex<Vec<(Address, TxDraft)>>,
    pub signed_payloads: Mutex<Vec<String>>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id: AtomicU64::new(chain_id), accounts: vec![ACCOUNT], ..Default::default() }
    }

    /// Legacy chain answering `gas_price`
    pub fn legacy(chain_id: u64, gas_price: u128) -> Self {
        Self { gas_price, ..Self::new(chain_id) }
    }

    /// Fee-market chain with a fee history sample
    pub fn eip1559(chain_id: u64, base_fees: &[u128], rewards: &[u128]) -> Self {
        let fee_history = FeeHistory {
            base_fee_per_gas: base_fees.to_vec(),
            reward: Some(rewards.iter().map(|reward| vec![*reward]).collect()),
            ..Default::default()
        };
        Self {
            base_fee: base_fees.first().copied(),
            fee_history,
            ..Self::new(chain_id)
        }
    }

    pub fn with_balance(mut self, owner: Address, balance: U256) -> Self {
        self.balances.insert(owner, balance);
        self
    }

    /// Answer `call` on `contract` with `ret`
    pub fn on_call<C: SolCall, V: SolValue>(mut self, contract: Address, call: C, ret: V) -> Self {
        self.calls.insert((contract, call.abi_encode().into()), ret.abi_encode().into());
        self
    }

    pub fn fee_queries(&self) -> usize {
        self.fee_queries.load(Ordering::SeqCst)
    }
}

fn reverted() -> RpcError {
    RpcError::Decode { method: "eth_call", reason: "execution reverted".to_string() }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>, RpcError> {
        self.fee_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.base_fee)
    }

    async fn fee_history(&self, _block_count: u64, _percentiles: &[f64]) -> Result<FeeHistory, RpcError> {
        Ok(self.fee_history.clone())
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        Ok(self.gas_price)
    }

    async fn balance(&self, owner: Address) -> Result<U256, RpcError> {
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        self.calls.get(&(to, data)).cloned().ok_or_else(reverted)
    }

    async fn estimate_gas(&self, _from: Option<Address>, _draft: &TxDraft) -> Result<u64, RpcError> {
        self.gas_estimate.ok_or_else(reverted)
    }
}

#[async_trait]
impl WalletRpc for MockChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        Ok(self.accounts.clone())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), RpcError> {
        self.switched_to.lock().unwrap().push(chain_id);
        self.chain_id.store(chain_id, Ordering::SeqCst);
        Ok(())
    }

    async fn send_transaction(&self, from: Address, draft: &TxDraft) -> Result<TxHash, RpcError> {
        self.sent.lock().unwrap().push((from, draft.clone()));
        Ok(TxHash::repeat_byte(0x11))
    }

    async fn sign_typed_data(&self, _signer: Address, payload: &str) -> Result<Bytes, RpcError> {
        self.signed_payloads.lock().unwrap().push(payload.to_string());
        Ok(Bytes::from_static(&[0x5e; 65]))
    }
}

//! alloy-backed implementation of [`ChainReader`] and [`WalletRpc`]

use async_trait::async_trait;
use alloy::{
    eips::BlockNumberOrTag,
    network::TransactionBuilder,
    providers::{Provider, ProviderBuilder, RootProvider, WsConnect},
    rpc::types::{FeeHistory, TransactionRequest},
};
use serde_json::json;
use crate::{
    errors::RpcError,
    traits::{ChainReader, WalletRpc},
    types::{Address, Bytes, FeeData, TxDraft, TxHash, U256},
};

/// Wraps any alloy provider pointing at a wallet-capable endpoint
#[derive(Debug, Clone)]
pub struct RpcBackend<P> {
    provider: P,
}

impl<P> RpcBackend<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Connect to an HTTP(S) or WebSocket endpoint
///
/// No fillers are installed: the draft reaches the wallet exactly as the form
/// built it.
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use clear_signing_tester::backend::connect;
/// let backend = connect("http://127.0.0.1:8545").await?;
/// # Ok(())
/// # }
/// ```
pub async fn connect(rpc_url: &str) -> Result<RpcBackend<RootProvider>, RpcError> {
    let provider = if rpc_url.starts_with("http") {
        let url = rpc_url.parse()
            .map_err(|_| RpcError::InvalidRpcUrl(rpc_url.to_string()))?;
        ProviderBuilder::default().connect_http(url)
    } else {
        let ws_connect = WsConnect::new(rpc_url);
        ProviderBuilder::default().connect_ws(ws_connect).await
            .map_err(|e| RpcError::WsConnection(e.to_string()))?
    };
    tracing::debug!(rpc_url, "connected provider");
    Ok(RpcBackend::new(provider))
}

/// Translate a draft into an alloy request
///
/// `full` adds gas limit and fee fields; estimation only needs recipient,
/// value and data.
fn transaction_request(from: Option<Address>, draft: &TxDraft, full: bool) -> TransactionRequest {
    let mut request = TransactionRequest::default()
        .with_value(draft.value)
        .with_input(draft.data.clone());
    if let Some(from) = from {
        request.set_from(from);
    }
    if let Some(to) = draft.to {
        request.set_to(to);
    }
    if !full {
        return request;
    }

    request.set_chain_id(draft.chain_id);
    request.set_gas_limit(draft.gas_limit);
    match draft.fees {
        Some(FeeData::Legacy { gas_price }) => {
            request.set_gas_price(gas_price);
            request.transaction_type = Some(0);
        }
        Some(FeeData::Eip1559 { max_fee_per_gas, max_priority_fee_per_gas }) => {
            request.set_max_fee_per_gas(max_fee_per_gas);
            request.set_max_priority_fee_per_gas(max_priority_fee_per_gas);
            request.transaction_type = Some(2);
        }
        None => {}
    }
    request
}

#[async_trait]
impl<P> ChainReader for RpcBackend<P>
where
    P: Provider + Send + Sync,
{
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>, RpcError> {
        let block = self.provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or(RpcError::NotFound("latest block"))?;
        Ok(block.header.base_fee_per_gas.map(u128::from))
    }

    async fn fee_history(
        &self,
        block_count: u64,
        reward_percentiles: &[f64],
    ) -> Result<FeeHistory, RpcError> {
        Ok(self.provider
            .get_fee_history(block_count, BlockNumberOrTag::Latest, reward_percentiles)
            .await?)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn balance(&self, owner: Address) -> Result<U256, RpcError> {
        Ok(self.provider.get_balance(owner).await?)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        let request = TransactionRequest::default()
            .with_to(to)
            .with_input(data);
        Ok(self.provider.call(request).await?)
    }

    async fn estimate_gas(&self, from: Option<Address>, draft: &TxDraft) -> Result<u64, RpcError> {
        let request = transaction_request(from, draft, false);
        Ok(self.provider.estimate_gas(request).await?)
    }
}

#[async_trait]
impl<P> WalletRpc for RpcBackend<P>
where
    P: Provider + Send + Sync,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        Ok(self.provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await?)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), RpcError> {
        let params = vec![json!({ "chainId": format!("{chain_id:#x}") })];
        self.provider
            .raw_request::<_, serde_json::Value>("wallet_switchEthereumChain".into(), params)
            .await?;
        Ok(())
    }

    async fn send_transaction(&self, from: Address, draft: &TxDraft) -> Result<TxHash, RpcError> {
        let request = transaction_request(Some(from), draft, true);
        let pending = self.provider.send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }

    async fn sign_typed_data(&self, signer: Address, payload: &str) -> Result<Bytes, RpcError> {
        Ok(self.provider
            .raw_request::<_, Bytes>("eth_signTypedData_v4".into(), (signer, payload))
            .await?)
    }
}

//! Chain metadata and block explorer clients
//!
//! - [`ChainRegistry`]: display name, icon, native ticker and explorers of a chain
//! - [`ExplorerClient`]: recent transactions of an account through the
//!   etherscan-compatible `txlist` endpoint

use serde_json::Value;
use crate::{
    errors::MetadataError,
    types::{Address, Chain, ChainExplorer, ExplorerTransaction},
};

/// Client of the chain list service
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    http_client: reqwest::Client,
    base_url: String,
}

impl ChainRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http_client, base_url: base_url.into() }
    }

    /// `<base><decimal chain id>`
    pub fn chain_url(&self, chain_id: u64) -> String {
        format!("{}{chain_id}", self.base_url)
    }

    /// Fetch the metadata of one chain
    pub async fn chain(&self, chain_id: u64) -> Result<Chain, MetadataError> {
        let url = self.chain_url(chain_id);
        let chain = self.http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Chain>()
            .await?;
        tracing::debug!(chain_id, name = %chain.name, "chain metadata loaded");
        Ok(chain)
    }
}

/// Client of etherscan-compatible explorer APIs
#[derive(Debug, Clone, Default)]
pub struct ExplorerClient {
    http_client: reqwest::Client,
}

impl ExplorerClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Newest-first transaction list URL of `address` on `explorer`
    pub fn txlist_url(explorer: &ChainExplorer, address: Address) -> String {
        format!(
            "{}api?module=account&action=txlist&address={address}&startblock=0&sort=desc",
            explorer.url
        )
    }

    /// Recent transactions of `address`, newest first
    ///
    /// Explorers answer "no transactions" and rate limits with a string in
    /// `result`; both come back as an empty list.
    pub async fn transactions(
        &self,
        explorer: &ChainExplorer,
        address: Address,
    ) -> Result<Vec<ExplorerTransaction>, MetadataError> {
        let url = Self::txlist_url(explorer, address);
        let body: Value = self.http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_txlist(&url, body)
    }
}

/// Extract the rows of a `txlist` response
pub fn parse_txlist(url: &str, mut body: Value) -> Result<Vec<ExplorerTransaction>, MetadataError> {
    match body.get_mut("result").map(Value::take) {
        Some(rows @ Value::Array(_)) => Ok(serde_json::from_value(rows)?),
        Some(other) => {
            tracing::warn!(url, result = %other, "explorer returned no transaction list");
            Ok(Vec::new())
        }
        None => Err(MetadataError::UnexpectedResponse {
            url: url.to_string(),
            reason: "missing `result`".to_string(),
        }),
    }
}

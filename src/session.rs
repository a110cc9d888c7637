//! Wallet session state
//!
//! [`WalletContext`] is the snapshot every form reads: connected account,
//! current chain and native balance. [`WalletSession`] owns the wallet backend
//! and keeps that snapshot up to date.

use std::sync::Arc;
use crate::{
    config::TesterConfig,
    errors::{MetadataError, SessionError, ValidationError},
    explorer::ChainRegistry,
    traits::WalletRpc,
    types::{Address, Bytes, Chain, TxDraft, TxHash, U256},
    utils::{fee_utils::FeeWatcher, typed_data::TypedMessage},
};

/// Ticker shown while chain metadata is unknown
pub const UNKNOWN_TICKER: &str = "???";

/// Connected wallet snapshot shared with the forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletContext {
    /// Accounts exposed by the wallet, in wallet order
    pub accounts: Vec<Address>,
    /// Selected account (the first exposed one)
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    /// Native balance of `account`
    pub balance: Option<U256>,
    /// Display metadata of `chain_id`, once loaded
    pub chain: Option<Chain>,
}

impl WalletContext {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Native currency symbol, or `???` until chain metadata arrives
    pub fn ticker(&self) -> &str {
        self.chain.as_ref().map_or(UNKNOWN_TICKER, |chain| chain.ticker.as_str())
    }

    /// Chain id forms build drafts for; 0 while disconnected
    pub fn chain_id_or_default(&self) -> u64 {
        self.chain_id.unwrap_or_default()
    }
}

/// A wallet connection and its [`WalletContext`]
#[derive(Debug)]
pub struct WalletSession<W> {
    wallet: Arc<W>,
    config: TesterConfig,
    registry: ChainRegistry,
    context: WalletContext,
}

impl<W: WalletRpc> WalletSession<W> {
    pub fn new(wallet: W, config: TesterConfig) -> Self {
        let registry = ChainRegistry::new(config.chain_registry_url.clone());
        Self {
            wallet: Arc::new(wallet),
            config,
            registry,
            context: WalletContext::default(),
        }
    }

    pub fn wallet(&self) -> &Arc<W> {
        &self.wallet
    }

    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    pub fn context(&self) -> &WalletContext {
        &self.context
    }

    /// Ask the wallet for its accounts, then read chain id and balance
    pub async fn connect(&mut self) -> Result<&WalletContext, SessionError> {
        let accounts = self.wallet.request_accounts().await.map_err(|error| {
            tracing::warn!(%error, "wallet connection failed");
            error
        })?;
        let account = *accounts.first().ok_or(SessionError::NoAccounts)?;
        let chain_id = self.wallet.chain_id().await?;
        let balance = self.wallet.balance(account).await?;
        tracing::info!(%account, chain_id, "wallet connected");

        self.context = WalletContext {
            accounts,
            account: Some(account),
            chain_id: Some(chain_id),
            balance: Some(balance),
            chain: None,
        };
        Ok(&self.context)
    }

    /// Forget the connection
    pub fn disconnect(&mut self) {
        self.context = WalletContext::default();
    }

    /// Ask the wallet to switch network
    ///
    /// `None` targets the configured default chain. The chain id is read back
    /// from the wallet afterwards, and balance and chain metadata are reset.
    pub async fn switch_chain(&mut self, chain_id: Option<u64>) -> Result<u64, SessionError> {
        let target = chain_id.unwrap_or(self.config.default_chain_id);
        self.wallet.switch_chain(target).await.map_err(|error| {
            tracing::warn!(%error, chain_id = target, "chain switch failed");
            error
        })?;

        let current = self.wallet.chain_id().await?;
        self.context.chain_id = Some(current);
        self.context.chain = None;
        if self.context.account.is_some() {
            self.refresh_balance().await?;
        }
        Ok(current)
    }

    /// Re-read the native balance of the connected account
    pub async fn refresh_balance(&mut self) -> Result<U256, SessionError> {
        let account = self.context.account.ok_or(SessionError::NotConnected)?;
        let balance = self.wallet.balance(account).await?;
        self.context.balance = Some(balance);
        Ok(balance)
    }

    /// Load display metadata of the current chain
    pub async fn refresh_chain(&mut self) -> Result<Option<&Chain>, MetadataError> {
        let Some(chain_id) = self.context.chain_id else {
            return Ok(None);
        };
        let chain = self.registry.chain(chain_id).await?;
        self.context.chain = Some(chain);
        Ok(self.context.chain.as_ref())
    }

    /// Hand a draft to the wallet for signing and broadcast
    pub async fn send_transaction(&self, draft: &TxDraft) -> Result<TxHash, SessionError> {
        let account = self.context.account.ok_or(SessionError::NotConnected)?;
        if draft.to.is_none() {
            return Err(SessionError::MissingRecipient);
        }
        let hash = self.wallet.send_transaction(account, draft).await?;
        tracing::info!(%hash, "transaction submitted");
        Ok(hash)
    }

    /// Request an EIP-712 signature from the connected account
    pub async fn sign_typed_data(&self, message: &TypedMessage) -> Result<Bytes, SessionError> {
        let account = self.context.account.ok_or(SessionError::NotConnected)?;
        let payload = message.signing_payload().map_err(|error| {
            tracing::warn!(%error, "typed message serialization failed");
            SessionError::Invalid(ValidationError::InvalidTypedMessage)
        })?;
        Ok(self.wallet.sign_typed_data(account, &payload).await?)
    }
}

impl<W: WalletRpc + 'static> WalletSession<W> {
    /// Start a fee refresher for the current wallet
    ///
    /// Spawn a new one after switching chain; dropping the old one stops it.
    pub fn fee_watcher(&self) -> FeeWatcher {
        FeeWatcher::spawn(Arc::clone(&self.wallet), self.config.fees.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let context = WalletContext::default();
        assert!(!context.is_connected());
        assert_eq!(context.ticker(), "???");
        assert_eq!(context.chain_id_or_default(), 0);

        let context = WalletContext {
            chain: Some(Chain {
                name: "Linea Sepolia".to_string(),
                icon: String::new(),
                ticker: "ETH".to_string(),
                explorers: Vec::new(),
            }),
            ..Default::default()
        };
        assert_eq!(context.ticker(), "ETH");
    }
}

//! Fee estimation
//!
//! Fee-market chains get a suggestion built from `eth_feeHistory`:
//! - priority fee: mean of the sampled reward percentile over the last blocks
//! - max fee: next base fee marked up by [`FeeConfig::base_fee_multiplier_percent`],
//!   plus the priority fee
//!
//! Chains whose latest block carries no base fee fall back to `eth_gasPrice`.
//! [`FeeWatcher`] keeps the estimate fresh in the background.

use std::{sync::Arc, time::Duration};
use alloy::rpc::types::FeeHistory;
use tokio::{sync::watch, task::JoinHandle};
use crate::{
    config::FeeConfig,
    errors::FeeError,
    traits::ChainReader,
    types::FeeData,
};

/// Derive fee-market parameters from a fee history sample
///
/// Only the first reward column is read, i.e. the first requested percentile.
/// The base fee used is the last entry of `base_fee_per_gas`, which
/// `eth_feeHistory` reports for the block after the newest one sampled.
///
/// # Errors
/// `FeeError::EmptyFeeHistory` when rewards or base fees are missing.
pub fn fee_data_from_history(history: &FeeHistory, config: &FeeConfig) -> Result<FeeData, FeeError> {
    let rewards: Vec<u128> = history
        .reward
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|block| block.first().copied())
        .collect();
    if rewards.is_empty() {
        return Err(FeeError::EmptyFeeHistory);
    }
    let next_base_fee = *history
        .base_fee_per_gas
        .last()
        .ok_or(FeeError::EmptyFeeHistory)?;

    let total: u128 = rewards.iter().fold(0u128, |acc, reward| acc.saturating_add(*reward));
    let max_priority_fee_per_gas = total / rewards.len() as u128;
    let max_fee_per_gas = next_base_fee
        .saturating_mul(config.base_fee_multiplier_percent)
        / 100
        + max_priority_fee_per_gas;

    Ok(FeeData::Eip1559 { max_fee_per_gas, max_priority_fee_per_gas })
}

/// Query the chain for a fresh fee snapshot
pub async fn fetch_fee_data<R>(reader: &R, config: &FeeConfig) -> Result<FeeData, FeeError>
where
    R: ChainReader + ?Sized,
{
    let supports_eip1559 = reader.latest_base_fee().await?.is_some();
    if supports_eip1559 {
        let history = reader
            .fee_history(config.history_blocks, &[config.reward_percentile])
            .await?;
        fee_data_from_history(&history, config)
    } else {
        let gas_price = reader.gas_price().await?;
        Ok(FeeData::Legacy { gas_price })
    }
}

/// Shortest period the refresher accepts
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Background fee refresher
///
/// Fetches once immediately, then every `refresh_interval`. Each successful
/// fetch replaces the published snapshot; failures keep the previous one.
/// The task stops when the watcher is stopped or dropped, so a form that
/// switches provider or chain simply replaces its watcher.
#[derive(Debug)]
pub struct FeeWatcher {
    receiver: watch::Receiver<Option<FeeData>>,
    handle: JoinHandle<()>,
}

impl FeeWatcher {
    /// Start refreshing on the current tokio runtime
    ///
    /// Intervals shorter than one second are raised to one second.
    pub fn spawn<R>(reader: Arc<R>, config: FeeConfig) -> Self
    where
        R: ChainReader + ?Sized + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let period = config.refresh_interval.max(MIN_REFRESH_INTERVAL);
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match fetch_fee_data(reader.as_ref(), &config).await {
                    Ok(fees) => {
                        tracing::debug!(?fees, "fee data refreshed");
                        sender.send_replace(Some(fees));
                    }
                    Err(error) => {
                        tracing::warn!(%error, "fee data refresh failed");
                    }
                }
                if sender.is_closed() {
                    break;
                }
            }
        });
        Self { receiver, handle }
    }

    /// Latest published snapshot
    pub fn current(&self) -> Option<FeeData> {
        *self.receiver.borrow()
    }

    /// Independent receiver for callers that want to await updates
    pub fn subscribe(&self) -> watch::Receiver<Option<FeeData>> {
        self.receiver.clone()
    }

    /// Wait for the next published snapshot
    pub async fn changed(&mut self) -> Option<FeeData> {
        self.receiver.changed().await.ok()?;
        *self.receiver.borrow_and_update()
    }

    /// Cancel the refresh task
    pub fn stop(self) {}
}

impl Drop for FeeWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

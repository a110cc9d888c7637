mod common;

use std::{sync::Arc, time::Duration};
use anyhow::Result;
use clear_signing_tester::{
    config::FeeConfig,
    types::FeeData,
    utils::fee_utils::{fetch_fee_data, FeeWatcher},
};
use common::MockChain;

#[tokio::test]
async fn test_legacy_chain_uses_gas_price() -> Result<()> {
    let chain = MockChain::legacy(56, 3_000_000_000);
    let fees = fetch_fee_data(&chain, &FeeConfig::default()).await?;

    assert_eq!(fees, FeeData::Legacy { gas_price: 3_000_000_000 });
    assert_eq!(fees.tx_type(), 0);
    Ok(())
}

#[tokio::test]
async fn test_fee_market_chain_uses_history() -> Result<()> {
    let chain = MockChain::eip1559(
        1,
        &[10_000_000_000, 10_500_000_000, 11_000_000_000, 10_800_000_000, 11_200_000_000, 11_000_000_000],
        &[1_000_000_000, 1_000_000_000, 2_000_000_000, 3_000_000_000, 1_000_000_000],
    );
    let fees = fetch_fee_data(&chain, &FeeConfig::default()).await?;

    println!("fee suggestion: {fees:?}");
    assert_eq!(
        fees,
        FeeData::Eip1559 {
            max_priority_fee_per_gas: 1_600_000_000,
            max_fee_per_gas: 11_000_000_000 * 127 / 100 + 1_600_000_000,
        }
    );
    assert_eq!(fees.tx_type(), 2);
    Ok(())
}

#[tokio::test]
async fn test_empty_fee_history_is_an_error() {
    let chain = MockChain::eip1559(1, &[], &[]);
    let chain = MockChain { base_fee: Some(1), ..chain };
    assert!(fetch_fee_data(&chain, &FeeConfig::default()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_watcher_refreshes_until_stopped() {
    let chain = Arc::new(MockChain::legacy(10, 42));
    let config = FeeConfig {
        refresh_interval: Duration::from_secs(30),
        ..Default::default()
    };

    let mut watcher = FeeWatcher::spawn(Arc::clone(&chain), config);
    assert_eq!(watcher.changed().await, Some(FeeData::Legacy { gas_price: 42 }));
    assert_eq!(chain.fee_queries(), 1);

    assert_eq!(watcher.changed().await, Some(FeeData::Legacy { gas_price: 42 }));
    assert_eq!(chain.fee_queries(), 2);
    assert_eq!(watcher.current(), Some(FeeData::Legacy { gas_price: 42 }));

    watcher.stop();
    tokio::time::advance(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;
    assert_eq!(chain.fee_queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_previous_snapshot() {
    // base fee present but no history: every refresh fails
    let chain = Arc::new(MockChain { base_fee: Some(1), ..MockChain::new(1) });
    let watcher = FeeWatcher::spawn(Arc::clone(&chain), FeeConfig::default());
    let updates = watcher.subscribe();

    tokio::time::sleep(Duration::from_secs(65)).await;
    assert!(chain.fee_queries() >= 2);
    assert_eq!(watcher.current(), None);
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_still_publishes() {
    let chain = Arc::new(MockChain::legacy(10, 7));
    let config = FeeConfig { refresh_interval: Duration::ZERO, ..Default::default() };

    let mut watcher = FeeWatcher::spawn(Arc::clone(&chain), config);
    assert_eq!(watcher.changed().await, Some(FeeData::Legacy { gas_price: 7 }));
    assert_eq!(watcher.changed().await, Some(FeeData::Legacy { gas_price: 7 }));
    assert_eq!(chain.fee_queries(), 2);
}

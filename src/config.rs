//! Tester configuration
//!
//! Every tunable lives here with its default:
//! - Fee refresh cadence and the fee-history heuristic
//! - Third-party service endpoints (chain list, IPFS gateway)
//! - The network offered by the "switch chain" action

use std::time::Duration;
use serde::Deserialize;
use crate::{
    errors::MetadataError,
    types::LINEA_SEPOLIA_CHAIN_ID,
};

/// Fee estimation parameters
///
/// Defaults: 127 % of the next base fee on top of the mean 50th-percentile
/// reward of the last 5 blocks, refreshed every 30 s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Delay between two fee refreshes, at least one second
    #[serde(with = "duration_secs")]
    pub refresh_interval: Duration,
    /// Number of blocks requested from `eth_feeHistory`
    pub history_blocks: u64,
    /// Reward percentile sampled in each block
    pub reward_percentile: f64,
    /// Markup applied to the next base fee, in percent
    pub base_fee_multiplier_percent: u128,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            history_blocks: 5,
            reward_percentile: 50.0,
            base_fee_multiplier_percent: 127,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TesterConfig {
    pub fees: FeeConfig,
    /// Chain list service, queried as `<url><decimal chain id>`
    pub chain_registry_url: String,
    /// Gateway substituted for `ipfs://` metadata URIs
    pub ipfs_gateway: String,
    /// Chain proposed by the switch action
    pub default_chain_id: u64,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            fees: FeeConfig::default(),
            chain_registry_url: "https://chainlist-nine.vercel.app/".to_string(),
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
            default_chain_id: LINEA_SEPOLIA_CHAIN_ID,
        }
    }
}

impl TesterConfig {
    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Whole seconds; zero is rejected since the refresher needs a period
mod duration_secs {
    use std::time::Duration;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u64::deserialize(deserializer)? {
            0 => Err(D::Error::custom("refresh interval must be at least 1 second")),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

//! Helpers shared by the transaction and message forms
//!
//! # Modules
//!
//! - [`input_validators`]: Form input validation
//!   - Address shape and EIP-55 checksum
//!   - Amount sanitization against native and asset balances
//!   - Free-form call data
//!
//! - [`typed_data`]: EIP-712 typed messages
//!   - Shape validation and pretty-printing
//!   - `eth_signTypedData_v4` payload assembly
//!
//! - [`fee_utils`]: Fee estimation and background refresh
//!
//! - [`nft_utils`]: NFT standard detection, name and balance lookup
//!
//! - [`erc20_utils`]: ERC20 symbol, decimals and balance
//!
//! - [`transaction_utils`]: Fee display, gas estimation fallback and
//!   default function arguments
//!
//! # Example
//!
//! ```no_run
//! use clear_signing_tester::{
//!     backend::connect,
//!     config::FeeConfig,
//!     utils::{fee_utils, input_validators},
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = connect("https://rpc.linea.build").await?;
//! let fees = fee_utils::fetch_fee_data(&backend, &FeeConfig::default()).await?;
//! println!("price per gas: {}", fees.price_per_gas());
//!
//! assert!(input_validators::validate_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_none());
//! # Ok(())
//! # }
//! ```

/// Form input validation
pub mod input_validators;

/// EIP-712 typed message utilities
pub mod typed_data;

/// Fee estimation utilities
pub mod fee_utils;

/// NFT interaction utilities
pub mod nft_utils;

/// ERC20 token interaction utilities
pub mod erc20_utils;

/// Transaction draft utilities
pub mod transaction_utils;

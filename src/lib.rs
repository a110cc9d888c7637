//! # Clear Signing Tester
//!
//! Logic layer of a wallet "clear signing" test bench: everything needed to
//! drive a wallet through native, ERC20 and NFT transactions and EIP-712
//! message signing, without any rendering.
//!
//! ## Core Features
//!
//! - **Input Validation**
//!   - Address shape and EIP-55 checksum
//!   - Amount sanitization against native and asset balances
//!   - Typed message shape checks
//!
//! - **Fee Estimation**
//!   - Fee-market suggestion from `eth_feeHistory`
//!   - Legacy gas price fallback
//!   - Cancellable background refresh
//!
//! - **Token Support**
//!   - ERC20 metadata and balances
//!   - ERC721 / ERC1155 detection through ERC-165
//!   - Default function arguments and calldata encoding
//!
//! - **Headless Forms**
//!   - Per-field values and errors
//!   - Transaction draft handed to the wallet
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!
//!   Usage example:
//!   ```toml
//!   [dependencies]
//!   clear-signing-tester = { version = "0.1", default-features = false, features = ["rustls-tls"] }
//!   ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clear_signing_tester::{
//!     backend::connect,
//!     forms::NativeTransferForm,
//!     TesterConfig, WalletSession,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = connect("http://127.0.0.1:8545").await?;
//! let mut session = WalletSession::new(backend, TesterConfig::default());
//! session.connect().await?;
//!
//! let mut fees = session.fee_watcher();
//! let mut form = NativeTransferForm::new(session.context());
//! form.set_recipient("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
//! form.set_value("0.01", session.context());
//! if let Some(snapshot) = fees.changed().await {
//!     form.apply_fee_data(snapshot);
//! }
//! form.refresh_gas(session.wallet().as_ref(), session.context()).await;
//!
//! if form.can_submit() {
//!     let hash = form.submit(&session).await?;
//!     println!("submitted {hash}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `types`: Core data structures and constants
//! - `errors`: Error types and handling
//! - `config`: Tunables and service endpoints
//! - `traits`: Node and wallet access traits
//! - `backend`: alloy provider implementation of the traits
//! - `contracts`: Token interfaces and function descriptors
//! - `utils`: Validators, fee estimation and token helpers
//! - `explorer`: Chain metadata and block explorer clients
//! - `session`: Wallet connection state
//! - `forms`: Headless form controllers

pub mod types;
pub mod errors;
pub mod config;
pub mod traits;
pub mod backend;
pub mod contracts;
pub mod utils;
pub mod explorer;
pub mod session;
pub mod forms;

// Re-export only the essential types and functions
pub use backend::{connect, RpcBackend};
pub use config::{FeeConfig, TesterConfig};
pub use errors::{TesterError, ValidationError};
pub use session::{WalletContext, WalletSession};
pub use traits::{ChainReader, WalletRpc};
pub use types::{FeeData, FieldInput, NftType, TxDraft};
pub use utils::fee_utils::FeeWatcher;

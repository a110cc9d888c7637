//! Error types for the clear signing tester
//!
//! Two families live here:
//! - [`ValidationError`]: the flat, user-facing set of field errors shown inline
//!   next to a form input. Validators return it as a value, never as `Err`.
//! - Operational errors ([`RpcError`], [`FeeError`], [`TokenError`], ...) raised
//!   by network-backed helpers, unified under [`TesterError`].

use thiserror::Error;

/// Inline field error surfaced to the user
///
/// Blocks the submit action of the owning form but never propagates past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// Not 40 hex digits (with optional `0x`)
    #[error("InvalidAddress")]
    InvalidAddress,

    /// Mixed-case address whose casing does not match EIP-55
    #[error("EIP55IncorrectChecksum")]
    Eip55IncorrectChecksum,

    /// Native balance cannot cover the estimated fee
    #[error("NotEnoughFunds")]
    NotEnoughFunds,

    /// Asset balance is below the requested amount
    #[error("NotEnoughAssets")]
    NotEnoughAssets,

    /// JSON is valid but lacks `domain`, `message`, `primaryType` or `types`
    #[error("InvalidTypedMessage")]
    InvalidTypedMessage,

    /// Anything that does not fit the named conditions
    #[error("UnknownError")]
    UnknownError,
}

/// Top-level error type for network-backed operations
#[derive(Debug, Error)]
pub enum TesterError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Fee estimation error: {0}")]
    Fee(#[from] FeeError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Failures talking to the node or the wallet
#[derive(Debug, Error)]
pub enum RpcError {
    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// WebSocket connection establishment errors
    #[error("WebSocket connection failed: {0}")]
    WsConnection(String),

    /// Transport-level failure or JSON-RPC error response
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),

    /// Response could not be decoded into the expected shape
    #[error("Failed to decode response of {method}: {reason}")]
    Decode {
        method: &'static str,
        reason: String,
    },

    /// Node answered without the requested object
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// Fee estimation errors
#[derive(Debug, Error)]
pub enum FeeError {
    /// `eth_feeHistory` came back without rewards or base fees
    #[error("Fee history is empty")]
    EmptyFeeHistory,

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Token contract query errors
///
/// Covers ERC20 metadata and NFT name/balance lookups.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Call succeeded but the return data did not decode
    ///
    /// # Fields
    /// * `address` - Token contract address
    /// * `function` - Called function name
    /// * `reason` - Detailed error message
    #[error("Failed to decode {function} for {address}: {reason}")]
    Decode {
        address: String,
        function: &'static str,
        reason: String,
    },

    /// General token query failures
    #[error("Failed to query token {address}: {source}")]
    QueryFailed {
        address: String,
        #[source]
        source: RpcError,
    },

    /// Contract is neither ERC721 nor ERC1155
    #[error("Contract {address} is not a recognised NFT")]
    UnknownNftType { address: String },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Calldata assembly errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Function argument has no value in the form
    #[error("Missing argument `{0}`")]
    MissingArgument(&'static str),

    /// Argument text cannot be converted to its ABI type
    #[error("Invalid value for `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

/// HTTP metadata service errors (chain list, explorer, NFT metadata)
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body missing an expected field
    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    /// Configuration did not parse
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Wallet session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Operation requires a connected account
    #[error("Wallet is not connected")]
    NotConnected,

    /// The wallet approved the connection but returned no account
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// Transaction draft has no recipient
    #[error("Transaction has no recipient")]
    MissingRecipient,

    /// A form field still carries a validation error
    #[error("Form has a pending validation error: {0}")]
    Invalid(ValidationError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

use crate::{
    errors::{SessionError, ValidationError},
    session::WalletSession,
    traits::WalletRpc,
    types::Bytes,
    utils::typed_data::{default_typed_message, validate_typed_message, TypedMessage},
};

/// A ready-made typed message for a given chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedMessagePreset {
    pub label: &'static str,
    pub chain_id: u64,
    pub document: &'static str,
}

const USDC_PERMIT: &str = r#"{
  "types": {
    "EIP712Domain": [
      { "name": "name", "type": "string" },
      { "name": "version", "type": "string" },
      { "name": "chainId", "type": "uint256" },
      { "name": "verifyingContract", "type": "address" }
    ],
    "Permit": [
      { "name": "owner", "type": "address" },
      { "name": "spender", "type": "address" },
      { "name": "value", "type": "uint256" },
      { "name": "nonce", "type": "uint256" },
      { "name": "deadline", "type": "uint256" }
    ]
  },
  "primaryType": "Permit",
  "domain": {
    "name": "USD Coin",
    "version": "2",
    "chainId": 1,
    "verifyingContract": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
  },
  "message": {
    "owner": "0x000000000000000000000000deadbeefdeadbeef",
    "spender": "0x000000000000000000000000deadbeefdeadbeef",
    "value": "1000000",
    "nonce": "0",
    "deadline": "1893456000"
  }
}"#;

const POLYGON_PERMIT2: &str = r#"{
  "types": {
    "EIP712Domain": [
      { "name": "name", "type": "string" },
      { "name": "chainId", "type": "uint256" },
      { "name": "verifyingContract", "type": "address" }
    ],
    "PermitSingle": [
      { "name": "details", "type": "PermitDetails" },
      { "name": "spender", "type": "address" },
      { "name": "sigDeadline", "type": "uint256" }
    ],
    "PermitDetails": [
      { "name": "token", "type": "address" },
      { "name": "amount", "type": "uint160" },
      { "name": "expiration", "type": "uint48" },
      { "name": "nonce", "type": "uint48" }
    ]
  },
  "primaryType": "PermitSingle",
  "domain": {
    "name": "Permit2",
    "chainId": 137,
    "verifyingContract": "0x000000000022d473030f116ddee9f6b43ac78ba3"
  },
  "message": {
    "details": {
      "token": "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359",
      "amount": "1461501637330902918203684832716283019655932542975",
      "expiration": "1893456000",
      "nonce": "0"
    },
    "spender": "0x000000000000000000000000deadbeefdeadbeef",
    "sigDeadline": "1893456000"
  }
}"#;

const POLYGON_ONEINCH_FUSION: &str = r#"{
  "types": {
    "EIP712Domain": [
      { "name": "name", "type": "string" },
      { "name": "version", "type": "string" },
      { "name": "chainId", "type": "uint256" },
      { "name": "verifyingContract", "type": "address" }
    ],
    "Order": [
      { "name": "salt", "type": "uint256" },
      { "name": "makerAsset", "type": "address" },
      { "name": "takerAsset", "type": "address" },
      { "name": "maker", "type": "address" },
      { "name": "receiver", "type": "address" },
      { "name": "allowedSender", "type": "address" },
      { "name": "makingAmount", "type": "uint256" },
      { "name": "takingAmount", "type": "uint256" },
      { "name": "offsets", "type": "uint256" },
      { "name": "interactions", "type": "bytes" }
    ]
  },
  "primaryType": "Order",
  "domain": {
    "name": "1inch Aggregation Router",
    "version": "5",
    "chainId": 137,
    "verifyingContract": "0x1111111254eeb25477b68fb85ed929f73a960582"
  },
  "message": {
    "salt": "45118768841948961586167738353692277076075522015101619148498725069326976558864",
    "makerAsset": "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359",
    "takerAsset": "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270",
    "maker": "0x000000000000000000000000deadbeefdeadbeef",
    "receiver": "0x0000000000000000000000000000000000000000",
    "allowedSender": "0x0000000000000000000000000000000000000000",
    "makingAmount": "1000000",
    "takingAmount": "1420000000000000000",
    "offsets": "0",
    "interactions": "0x"
  }
}"#;

const PRESETS: &[TypedMessagePreset] = &[
    TypedMessagePreset { label: "USDC Permit on mainnet", chain_id: 1, document: USDC_PERMIT },
    TypedMessagePreset { label: "Permit 2 on Polygon", chain_id: 137, document: POLYGON_PERMIT2 },
    TypedMessagePreset { label: "1Inch Fusion on Polygon", chain_id: 137, document: POLYGON_ONEINCH_FUSION },
];

/// EIP-712 signing
#[derive(Debug, Clone)]
pub struct TypedMessageForm {
    text: String,
    error: Option<ValidationError>,
}

impl TypedMessageForm {
    /// Start from the placeholder "Test" message for `chain_id`
    pub fn new(chain_id: u64) -> Self {
        Self { text: default_typed_message(chain_id), error: None }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    /// Editor change; valid JSON is written back pretty-printed
    pub fn set_text(&mut self, input: &str) {
        let (text, error) = validate_typed_message(input);
        self.text = text;
        self.error = error;
    }

    /// Presets meant for `chain_id`
    pub fn presets(chain_id: u64) -> Vec<TypedMessagePreset> {
        PRESETS.iter().copied().filter(|preset| preset.chain_id == chain_id).collect()
    }

    pub fn load_preset(&mut self, preset: &TypedMessagePreset) {
        self.set_text(preset.document);
    }

    pub fn can_submit(&self) -> bool {
        self.error.is_none()
    }

    /// Parse the current text and request the signature
    pub async fn sign<W: WalletRpc>(&self, session: &WalletSession<W>) -> Result<Bytes, SessionError> {
        if let Some(error) = self.error {
            return Err(SessionError::Invalid(error));
        }
        let message = TypedMessage::from_json(&self.text).map_err(|error| {
            tracing::warn!(%error, "typed message does not match the EIP-712 layout");
            SessionError::Invalid(ValidationError::InvalidTypedMessage)
        })?;
        session.sign_typed_data(&message).await
    }
}

use std::str::FromStr;
use crate::{
    errors::{SessionError, ValidationError},
    session::{WalletContext, WalletSession},
    traits::{ChainReader, WalletRpc},
    types::{placeholder_address_hex, Bytes, FeeData, FieldInput, TxDraft, TxHash},
    utils::{
        input_validators::{validate_address, validate_hex_data, validate_uint256_balance},
        transaction_utils::{estimate_gas_or_default, estimated_fee},
    },
};
use super::{parse_address_input, submit_draft};

const NATIVE_DECIMALS: u8 = 18;

/// Native currency transfer
///
/// Starts out sending 0 to the placeholder address with empty data.
#[derive(Debug, Clone)]
pub struct NativeTransferForm {
    draft: TxDraft,
    recipient: FieldInput,
    value: FieldInput,
    data: FieldInput,
}

impl NativeTransferForm {
    pub fn new(context: &WalletContext) -> Self {
        let recipient = placeholder_address_hex();
        let mut draft = TxDraft::new(context.chain_id_or_default());
        draft.to = parse_address_input(&recipient);
        Self {
            draft,
            recipient: FieldInput::new(recipient),
            value: FieldInput::new("0"),
            data: FieldInput::new("0x"),
        }
    }

    pub fn draft(&self) -> &TxDraft {
        &self.draft
    }

    pub fn recipient(&self) -> &FieldInput {
        &self.recipient
    }

    pub fn value(&self) -> &FieldInput {
        &self.value
    }

    pub fn data(&self) -> &FieldInput {
        &self.data
    }

    /// Recipient edit; the draft only keeps a recipient that parses
    pub fn set_recipient(&mut self, input: &str) {
        self.recipient = FieldInput::with_error(input, validate_address(input));
        self.draft.to = parse_address_input(input);
    }

    /// Value edit, in ether; both balance checks use the native balance
    pub fn set_value(&mut self, input: &str, context: &WalletContext) {
        let result = validate_uint256_balance(
            input,
            estimated_fee(&self.draft),
            context.balance,
            context.balance,
            Some(NATIVE_DECIMALS),
        );
        if result.error != Some(ValidationError::UnknownError) {
            self.draft.value = result.amount;
        }
        self.value = FieldInput::with_error(result.value, result.error);
    }

    /// Call data edit; empty input means `0x`
    pub fn set_data(&mut self, input: &str) {
        if input.is_empty() {
            self.data = FieldInput::new("");
            self.draft.data = Bytes::new();
            return;
        }
        let error = validate_hex_data(input);
        if error.is_none() {
            if let Ok(data) = Bytes::from_str(input) {
                self.draft.data = data;
            }
        }
        self.data = FieldInput::with_error(input, error);
    }

    pub fn apply_fee_data(&mut self, fees: FeeData) {
        self.draft.apply_fee_data(fees);
    }

    /// Re-estimate gas once recipient and value are valid
    ///
    /// Returns whether an estimate was attempted.
    pub async fn refresh_gas<R>(&mut self, reader: &R, context: &WalletContext) -> bool
    where
        R: ChainReader + ?Sized,
    {
        if self.recipient.error.is_some() || self.value.error.is_some() || self.draft.to.is_none() {
            return false;
        }
        self.draft.gas_limit = estimate_gas_or_default(reader, context.account, &self.draft).await;
        true
    }

    fn pending_error(&self) -> Option<ValidationError> {
        self.recipient.error.or(self.value.error).or(self.data.error)
    }

    pub fn can_submit(&self) -> bool {
        self.draft.to.is_some() && self.pending_error().is_none()
    }

    pub async fn submit<W: WalletRpc>(&self, session: &WalletSession<W>) -> Result<TxHash, SessionError> {
        submit_draft(session, &self.draft, self.pending_error()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, U256, MINIMAL_L1_GAS_LIMIT};

    fn context(balance: u64) -> WalletContext {
        WalletContext {
            account: Some(Address::repeat_byte(0xaa)),
            chain_id: Some(1),
            balance: Some(U256::from(balance)),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_with_placeholder_recipient() {
        let form = NativeTransferForm::new(&context(0));
        assert_eq!(form.recipient().value, "0x000000000000000000000000deadbeefdeadbeef");
        assert!(form.draft().to.is_some());
        assert_eq!(form.draft().gas_limit, MINIMAL_L1_GAS_LIMIT);
        assert_eq!(form.draft().chain_id, 1);
        assert!(form.can_submit());
    }

    #[test]
    fn test_invalid_recipient_blocks_submit() {
        let mut form = NativeTransferForm::new(&context(0));
        form.set_recipient("0x1234");
        assert_eq!(form.recipient().error, Some(ValidationError::InvalidAddress));
        assert_eq!(form.draft().to, None);
        assert!(!form.can_submit());
    }

    #[test]
    fn test_value_is_checked_against_fee_first() {
        let mut form = NativeTransferForm::new(&context(1_000));
        form.apply_fee_data(FeeData::Legacy { gas_price: 1 });
        form.set_value("0", &context(1_000));
        assert_eq!(form.value().error, Some(ValidationError::NotEnoughFunds));

        let rich = context(u64::MAX);
        form.set_value("0,5", &rich);
        assert_eq!(form.value().value, "0.5");
        assert_eq!(form.value().error, None);
        assert_eq!(form.draft().value, U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn test_data_edits() {
        let mut form = NativeTransferForm::new(&context(0));
        form.set_data("0xdeadbeef");
        assert_eq!(form.draft().data.to_vec(), vec![0xde, 0xad, 0xbe, 0xef]);

        form.set_data("0xzz");
        assert_eq!(form.data().error, Some(ValidationError::UnknownError));
        assert_eq!(form.draft().data.len(), 4);
        assert!(!form.can_submit());

        form.set_data("");
        assert_eq!(form.data().error, None);
        assert!(form.draft().data.is_empty());
    }
}

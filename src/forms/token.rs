use alloy::primitives::address;
use crate::{
    contracts::{Erc20Function, TokenFunction},
    errors::{SessionError, TokenError, ValidationError},
    session::{WalletContext, WalletSession},
    traits::{ChainReader, WalletRpc},
    types::{Address, FeeData, FieldInput, FieldInputs, TokenInfo, TxDraft, TxHash, U256},
    utils::{erc20_utils::get_token_info, transaction_utils::default_token_values},
};
use super::{first_error, parse_address_input, refresh_call, submit_draft, validate_argument, BalanceCheck};

const DEFAULT_DECIMALS: u8 = 18;
const UNKNOWN_SYMBOL: &str = "???";

/// Well known tokens offered as shortcuts on Ethereum mainnet
const MAINNET_TOKENS: &[(&str, Address)] = &[
    ("USDC", address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
    ("USDT", address!("dac17f958d2ee523a2206206994597c13d831ec7")),
    ("STETH", address!("ae7ab96520de3a18e5e111b5eaab095312d7fe84")),
];

/// Token shortcuts for a chain, as `(label, address)`
pub fn common_tokens(chain_id: u64) -> &'static [(&'static str, Address)] {
    match chain_id {
        1 => MAINNET_TOKENS,
        _ => &[],
    }
}

/// ERC20 `transfer` / `approve`
#[derive(Debug, Clone)]
pub struct TokenTransferForm {
    draft: TxDraft,
    token_address: String,
    function: Erc20Function,
    inputs: FieldInputs,
    info: Option<TokenInfo>,
}

impl TokenTransferForm {
    pub fn new(context: &WalletContext) -> Self {
        let function = Erc20Function::Transfer;
        Self {
            draft: TxDraft::new(context.chain_id_or_default()),
            token_address: String::new(),
            function,
            inputs: default_token_values(function.inputs(), context.account),
            info: None,
        }
    }

    pub fn draft(&self) -> &TxDraft {
        &self.draft
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    /// Parsed token contract, `None` while the address input is not valid
    pub fn token(&self) -> Option<Address> {
        self.draft.to
    }

    pub fn function(&self) -> Erc20Function {
        self.function
    }

    pub fn inputs(&self) -> &FieldInputs {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&FieldInput> {
        self.inputs.get(name)
    }

    pub fn symbol(&self) -> &str {
        self.info.as_ref().map_or(UNKNOWN_SYMBOL, |info| info.symbol.as_str())
    }

    pub fn decimals(&self) -> u8 {
        self.info.as_ref().map_or(DEFAULT_DECIMALS, |info| info.decimals)
    }

    pub fn token_balance(&self) -> U256 {
        self.info.as_ref().map_or(U256::ZERO, |info| info.balance)
    }

    /// Token address edit; token metadata is dropped until reloaded
    pub fn set_token_address(&mut self, input: &str) {
        self.token_address = input.to_string();
        self.draft.to = parse_address_input(input);
        self.info = None;
    }

    /// Switch function; arguments are reset to their defaults
    pub fn select_function(&mut self, function: Erc20Function, context: &WalletContext) {
        self.function = function;
        self.inputs = default_token_values(function.inputs(), context.account);
    }

    /// Fetch symbol, decimals and the account's balance of the token
    pub async fn load_token_info<R>(&mut self, reader: &R, context: &WalletContext) -> Result<(), TokenError>
    where
        R: ChainReader + ?Sized,
    {
        let (Some(token), Some(account)) = (self.token(), context.account) else {
            return Ok(());
        };
        self.info = Some(get_token_info(reader, token, account).await?);
        Ok(())
    }

    /// Argument edit
    ///
    /// Amounts are scaled by the token decimals and checked against the native
    /// balance (fee) and the token balance.
    pub fn set_input(&mut self, name: &str, raw: &str, context: &WalletContext) {
        let Some(input) = self.function.inputs().iter().find(|input| input.name == name) else {
            return;
        };
        let check = BalanceCheck {
            native_balance: context.balance,
            asset_balance: Some(self.token_balance()),
            decimals: Some(self.decimals()),
        };
        let field = validate_argument(input, raw, &self.draft, check);
        self.inputs.insert(name.to_string(), field);
    }

    pub fn apply_fee_data(&mut self, fees: FeeData) {
        self.draft.apply_fee_data(fees);
    }

    /// Re-encode the call data and re-estimate gas
    pub async fn refresh_calldata<R>(&mut self, reader: &R, context: &WalletContext)
    where
        R: ChainReader + ?Sized,
    {
        if self.token().is_none() {
            return;
        }
        let decimals = self.decimals();
        refresh_call(
            reader,
            context,
            &mut self.draft,
            TokenFunction::Erc20(self.function),
            &self.inputs,
            decimals,
        )
        .await;
    }

    pub fn can_submit(&self) -> bool {
        self.token().is_some() && !self.draft.data.is_empty() && first_error(&self.inputs).is_none()
    }

    pub async fn submit<W: WalletRpc>(&self, session: &WalletSession<W>) -> Result<TxHash, SessionError> {
        let pending = first_error(&self.inputs).or_else(|| {
            self.draft.data.is_empty().then_some(ValidationError::UnknownError)
        });
        submit_draft(session, &self.draft, pending).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> WalletContext {
        WalletContext {
            account: Some(Address::repeat_byte(0xaa)),
            chain_id: Some(1),
            balance: Some(U256::from(10u64).pow(U256::from(18))),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_follow_function() {
        let context = context();
        let mut form = TokenTransferForm::new(&context);
        assert_eq!(form.input("to").unwrap().value, "0x000000000000000000000000deadbeefdeadbeef");
        assert_eq!(form.input("amount").unwrap().value, "0");
        assert_eq!(form.symbol(), "???");
        assert_eq!(form.decimals(), 18);

        form.select_function(Erc20Function::Approve, &context);
        assert!(form.input("to").is_none());
        assert!(form.input("spender").is_some());
    }

    #[test]
    fn test_argument_validation() {
        let context = context();
        let mut form = TokenTransferForm::new(&context);

        form.set_input("to", "", &context);
        assert_eq!(form.input("to").unwrap().error, None);

        form.set_input("to", "0xD8dA6BF26964aF9D7eEd9e03E53415D37aA96045", &context);
        assert_eq!(form.input("to").unwrap().error, Some(ValidationError::Eip55IncorrectChecksum));

        // no token loaded: balance is zero
        form.set_input("amount", "1", &context);
        assert_eq!(form.input("amount").unwrap().error, Some(ValidationError::NotEnoughAssets));

        form.set_input("amount", "0", &context);
        assert_eq!(form.input("amount").unwrap().error, None);

        form.set_input("unknown", "1", &context);
        assert!(form.input("unknown").is_none());
    }

    #[test]
    fn test_token_address_and_shortcuts() {
        let mut form = TokenTransferForm::new(&context());
        assert!(!form.can_submit());

        let (label, usdc) = common_tokens(1)[0];
        assert_eq!(label, "USDC");
        form.set_token_address(&usdc.to_string());
        assert_eq!(form.token(), Some(usdc));

        form.set_token_address("not an address");
        assert_eq!(form.token(), None);
        assert!(common_tokens(59141).is_empty());
    }
}

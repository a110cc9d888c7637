use std::str::FromStr;
use crate::{
    config::TesterConfig,
    contracts::TokenFunction,
    errors::{SessionError, TokenError, ValidationError},
    session::{WalletContext, WalletSession},
    traits::{ChainReader, WalletRpc},
    types::{Address, FeeData, FieldInput, FieldInputs, NftType, TxDraft, TxHash, U256},
    utils::{
        nft_utils::{get_nft_name_and_balance, resolve_nft_type},
        transaction_utils::default_nft_values,
    },
};
use super::{first_error, parse_address_input, refresh_call, submit_draft, validate_argument, BalanceCheck};

const DEFAULT_FUNCTION: &str = "safeTransferFrom";
const UNKNOWN_NAME: &str = "???";

/// ERC721 / ERC1155 transfers and approvals
///
/// The token standard is detected once per contract address; the function list
/// and argument set follow the detected standard.
#[derive(Debug, Clone)]
pub struct NftTransferForm {
    draft: TxDraft,
    nft_address: String,
    token_id: FieldInput,
    nft_type: Option<NftType>,
    /// Contract the cached `nft_type` belongs to
    resolved_for: Option<Address>,
    function_name: String,
    inputs: FieldInputs,
    name: String,
    nft_balance: Option<U256>,
}

impl NftTransferForm {
    pub fn new(context: &WalletContext) -> Self {
        Self {
            draft: TxDraft::new(context.chain_id_or_default()),
            nft_address: String::new(),
            token_id: FieldInput::default(),
            nft_type: None,
            resolved_for: None,
            function_name: DEFAULT_FUNCTION.to_string(),
            inputs: FieldInputs::new(),
            name: UNKNOWN_NAME.to_string(),
            nft_balance: None,
        }
    }

    pub fn draft(&self) -> &TxDraft {
        &self.draft
    }

    pub fn nft_address(&self) -> &str {
        &self.nft_address
    }

    /// Parsed NFT contract, `None` while the address input is not valid
    pub fn nft(&self) -> Option<Address> {
        self.draft.to
    }

    /// Token id normalized to decimal, empty when unset
    pub fn token_id(&self) -> &FieldInput {
        &self.token_id
    }

    pub fn nft_type(&self) -> Option<NftType> {
        self.nft_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nft_balance(&self) -> Option<U256> {
        self.nft_balance
    }

    pub fn inputs(&self) -> &FieldInputs {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&FieldInput> {
        self.inputs.get(name)
    }

    /// Functions of the detected standard
    pub fn available_functions(&self) -> Vec<TokenFunction> {
        self.nft_type.map(TokenFunction::nft_functions).unwrap_or_default()
    }

    /// Selected function, if the detected standard has it
    pub fn function(&self) -> Option<TokenFunction> {
        self.nft_type
            .and_then(|nft_type| TokenFunction::nft_function(nft_type, &self.function_name))
    }

    fn parsed_token_id(&self) -> Option<U256> {
        if self.token_id.value.is_empty() || self.token_id.error.is_some() {
            return None;
        }
        U256::from_str(&self.token_id.value).ok()
    }

    fn reset_defaults(&mut self, context: &WalletContext) {
        self.inputs = match self.function() {
            Some(function) => {
                let token_id = self.parsed_token_id().map(|id| id.to_string());
                default_nft_values(function.inputs(), context.account, token_id.as_deref())
            }
            None => FieldInputs::new(),
        };
    }

    /// NFT address edit
    ///
    /// A different contract invalidates the detected standard, name and balance.
    pub fn set_nft_address(&mut self, input: &str) {
        self.nft_address = input.to_string();
        self.draft.to = parse_address_input(input);
        if self.resolved_for != self.draft.to {
            self.nft_type = None;
            self.resolved_for = None;
            self.name = UNKNOWN_NAME.to_string();
            self.nft_balance = None;
        }
    }

    /// Token id edit, decimal or `0x` hex; stored in decimal
    pub fn set_token_id(&mut self, input: &str, context: &WalletContext) {
        let input = input.trim();
        self.token_id = if input.is_empty() {
            FieldInput::default()
        } else {
            match U256::from_str(input) {
                Ok(id) => FieldInput::new(id.to_string()),
                Err(_) => FieldInput::with_error(input, Some(ValidationError::UnknownError)),
            }
        };
        self.nft_balance = None;
        self.reset_defaults(context);
    }

    /// Detect the token standard of the current contract
    ///
    /// Cached until the contract address changes.
    pub async fn resolve_type<R>(&mut self, reader: &R, context: &WalletContext) -> Option<NftType>
    where
        R: ChainReader + ?Sized,
    {
        let nft = self.nft()?;
        if self.resolved_for == Some(nft) {
            return self.nft_type;
        }
        self.nft_type = resolve_nft_type(reader, nft).await;
        self.resolved_for = Some(nft);
        if self.nft_type.is_none() {
            tracing::info!(%nft, "contract is neither ERC721 nor ERC1155");
        }
        self.reset_defaults(context);
        self.nft_type
    }

    /// Fetch the display name and the account's balance of the selected token
    pub async fn load_name_and_balance<R>(
        &mut self,
        reader: &R,
        http_client: &reqwest::Client,
        config: &TesterConfig,
        context: &WalletContext,
    ) -> Result<(), TokenError>
    where
        R: ChainReader + ?Sized,
    {
        let (Some(nft), Some(nft_type), Some(token_id), Some(account)) =
            (self.nft(), self.nft_type, self.parsed_token_id(), context.account)
        else {
            return Ok(());
        };
        let (name, balance) = get_nft_name_and_balance(
            reader,
            http_client,
            &config.ipfs_gateway,
            nft,
            nft_type,
            account,
            token_id,
        )
        .await?;
        self.name = name;
        self.nft_balance = Some(balance);
        Ok(())
    }

    /// Switch function by ABI name; arguments are reset to their defaults
    pub fn select_function(&mut self, name: &str, context: &WalletContext) {
        self.function_name = name.to_string();
        self.reset_defaults(context);
    }

    /// Argument edit; quantities are checked against the NFT balance
    pub fn set_input(&mut self, name: &str, raw: &str, context: &WalletContext) {
        let Some(function) = self.function() else {
            return;
        };
        let Some(input) = function.inputs().iter().find(|input| input.name == name) else {
            return;
        };
        let check = BalanceCheck {
            native_balance: context.balance,
            asset_balance: self.nft_balance,
            decimals: None,
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
        let (Some(_), Some(function)) = (self.nft(), self.function()) else {
            return;
        };
        refresh_call(reader, context, &mut self.draft, function, &self.inputs, 0).await;
    }

    fn pending_error(&self) -> Option<ValidationError> {
        self.token_id.error
            .or_else(|| first_error(&self.inputs))
            .or_else(|| self.draft.data.is_empty().then_some(ValidationError::UnknownError))
    }

    pub fn can_submit(&self) -> bool {
        self.nft().is_some() && self.pending_error().is_none()
    }

    pub async fn submit<W: WalletRpc>(&self, session: &WalletSession<W>) -> Result<TxHash, SessionError> {
        submit_draft(session, &self.draft, self.pending_error()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> WalletContext {
        WalletContext {
            account: Some(Address::repeat_byte(0xaa)),
            chain_id: Some(1),
            balance: Some(U256::from(1u64)),
            ..Default::default()
        }
    }

    #[test]
    fn test_token_id_is_normalized_to_decimal() {
        let context = context();
        let mut form = NftTransferForm::new(&context);

        form.set_token_id("0x2a", &context);
        assert_eq!(form.token_id().value, "42");
        assert_eq!(form.token_id().error, None);

        form.set_token_id("forty-two", &context);
        assert_eq!(form.token_id().error, Some(ValidationError::UnknownError));

        form.set_token_id("", &context);
        assert_eq!(form.token_id().value, "");
    }

    #[test]
    fn test_no_functions_before_detection() {
        let context = context();
        let mut form = NftTransferForm::new(&context);
        form.set_nft_address("0x000000000000000000000000deadbeefdeadbeef");
        assert!(form.nft().is_some());
        assert!(form.available_functions().is_empty());
        assert_eq!(form.function(), None);
        assert!(form.inputs().is_empty());

        form.set_input("to", "0x1234", &context);
        assert!(form.inputs().is_empty());
        assert!(!form.can_submit());
    }
}

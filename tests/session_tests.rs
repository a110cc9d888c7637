mod common;

use alloy::primitives::U256;
use anyhow::Result;
use clear_signing_tester::{
    errors::SessionError,
    forms::{NativeTransferForm, TypedMessageForm},
    types::{FeeData, LINEA_SEPOLIA_CHAIN_ID},
    TesterConfig, ValidationError, WalletSession,
};
use common::{MockChain, ACCOUNT};
use serde_json::Value;

fn session(chain: MockChain) -> WalletSession<MockChain> {
    WalletSession::new(chain, TesterConfig::default())
}

#[tokio::test]
async fn test_connect_populates_context() -> Result<()> {
    let chain = MockChain::legacy(1, 1).with_balance(ACCOUNT, U256::from(5_000u64));
    let mut session = session(chain);
    assert!(!session.context().is_connected());

    let context = session.connect().await?;
    assert_eq!(context.account, Some(ACCOUNT));
    assert_eq!(context.chain_id, Some(1));
    assert_eq!(context.balance, Some(U256::from(5_000u64)));
    assert_eq!(context.ticker(), "???");
    Ok(())
}

#[tokio::test]
async fn test_connect_without_accounts_fails() {
    let chain = MockChain { accounts: Vec::new(), ..MockChain::new(1) };
    let mut session = session(chain);
    assert!(matches!(session.connect().await, Err(SessionError::NoAccounts)));
}

#[tokio::test]
async fn test_switch_chain_defaults_to_linea_sepolia() -> Result<()> {
    let mut session = session(MockChain::new(1));
    session.connect().await?;

    let chain_id = session.switch_chain(None).await?;
    assert_eq!(chain_id, LINEA_SEPOLIA_CHAIN_ID);
    assert_eq!(session.context().chain_id, Some(LINEA_SEPOLIA_CHAIN_ID));
    assert_eq!(*session.wallet().switched_to.lock().unwrap(), vec![0xe705]);

    session.switch_chain(Some(137)).await?;
    assert_eq!(session.context().chain_id, Some(137));
    Ok(())
}

#[tokio::test]
async fn test_native_transfer_end_to_end() -> Result<()> {
    let chain = MockChain { gas_estimate: Some(21_000), ..MockChain::new(1) }
        .with_balance(ACCOUNT, U256::from(10u64).pow(U256::from(18)));
    let mut session = session(chain);
    session.connect().await?;

    let mut form = NativeTransferForm::new(session.context());
    form.apply_fee_data(FeeData::Eip1559 { max_fee_per_gas: 30_000_000_000, max_priority_fee_per_gas: 1_000_000_000 });
    form.set_recipient("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
    form.set_value("0.1", session.context());
    assert_eq!(form.value().error, None);

    assert!(form.refresh_gas(session.wallet().as_ref(), session.context()).await);
    assert_eq!(form.draft().gas_limit, 21_000);

    let hash = form.submit(&session).await?;
    println!("submitted {hash}");
    let sent = session.wallet().sent.lock().unwrap();
    let (from, draft) = &sent[0];
    assert_eq!(*from, ACCOUNT);
    assert_eq!(draft.value, U256::from(100_000_000_000_000_000u64));
    assert_eq!(draft.fees.map(|fees| fees.tx_type()), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_invalid_native_form_is_not_sent() -> Result<()> {
    let mut session = session(MockChain::new(1));
    session.connect().await?;

    let mut form = NativeTransferForm::new(session.context());
    form.set_recipient("0xnope");
    assert!(!form.refresh_gas(session.wallet().as_ref(), session.context()).await);

    let result = form.submit(&session).await;
    assert!(matches!(result, Err(SessionError::Invalid(ValidationError::InvalidAddress))));
    assert!(session.wallet().sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_typed_message_signing_payload() -> Result<()> {
    let mut session = session(MockChain::new(1));
    let form = TypedMessageForm::new(1);
    assert!(matches!(form.sign(&session).await, Err(SessionError::NotConnected)));

    session.connect().await?;
    let signature = form.sign(&session).await?;
    assert_eq!(signature.len(), 65);

    let payloads = session.wallet().signed_payloads.lock().unwrap();
    let payload: Value = serde_json::from_str(&payloads[0])?;
    assert_eq!(payload["primaryType"], "Test");
    assert_eq!(payload["domain"]["chainId"], 1);
    assert_eq!(payload["types"]["EIP712Domain"][0]["name"], "chainId");
    Ok(())
}

#[tokio::test]
async fn test_invalid_typed_message_is_not_signed() -> Result<()> {
    let mut session = session(MockChain::new(1));
    session.connect().await?;

    let mut form = TypedMessageForm::new(1);
    form.set_text("not json");
    assert!(matches!(
        form.sign(&session).await,
        Err(SessionError::Invalid(ValidationError::UnknownError))
    ));
    assert!(session.wallet().signed_payloads.lock().unwrap().is_empty());
    Ok(())
}

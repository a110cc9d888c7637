//! NFT detection and lookup
//!
//! - Classifies a contract as ERC721 or ERC1155 through ERC-165 probes
//! - Fetches the display name and the account's balance for one token id

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use crate::{
    contracts::{call_contract, IERC1155, IERC165, IERC721, ERC1155_INTERFACE_ID, ERC721_INTERFACE_ID},
    errors::{MetadataError, TokenError},
    traits::ChainReader,
    types::{Address, NftType, U256},
};

/// `{id}` placeholder of ERC1155 metadata URIs, optionally `0x`-prefixed
static ID_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(0x)?\{id\}").expect("valid placeholder regex"));

/// Probe a contract's ERC-165 support for ERC721 and ERC1155
///
/// Both probes are sent concurrently. ERC721 takes precedence when a contract
/// claims both; a probe that fails or reverts counts as unsupported.
///
/// # Returns
/// * `Some(NftType)` - First supported standard, in ERC721, ERC1155 order
/// * `None` - Neither interface is supported
pub async fn resolve_nft_type<R>(reader: &R, nft_address: Address) -> Option<NftType>
where
    R: ChainReader + ?Sized,
{
    let (is_erc721, is_erc1155) = tokio::join!(
        supports_interface(reader, nft_address, ERC721_INTERFACE_ID),
        supports_interface(reader, nft_address, ERC1155_INTERFACE_ID),
    );

    if is_erc721 {
        Some(NftType::Erc721)
    } else if is_erc1155 {
        Some(NftType::Erc1155)
    } else {
        None
    }
}

async fn supports_interface<R>(
    reader: &R,
    contract: Address,
    interface_id: alloy::primitives::FixedBytes<4>,
) -> bool
where
    R: ChainReader + ?Sized,
{
    let probe = IERC165::supportsInterfaceCall { interfaceId: interface_id };
    match call_contract(reader, contract, probe).await {
        Ok(supported) => supported,
        Err(error) => {
            tracing::debug!(%contract, %interface_id, %error, "supportsInterface probe failed");
            false
        }
    }
}

/// Resolve an ERC1155 metadata URI for a token
///
/// Substitutes every `{id}` / `0x{id}` with the decimal token id and routes
/// `ipfs://` through `ipfs_gateway`.
pub fn resolve_metadata_uri(uri: &str, token_id: U256, ipfs_gateway: &str) -> String {
    let id = token_id.to_string();
    ID_PLACEHOLDER
        .replace_all(uri, id.as_str())
        .replacen("ipfs://", ipfs_gateway, 1)
}

/// Fetch the collection/token name and the account's balance
///
/// - ERC1155: `uri(id)` metadata `name`, and `balanceOf(account, id)`
/// - ERC721: contract `name()`, and 1 if `ownerOf(id)` is the account, else 0
pub async fn get_nft_name_and_balance<R>(
    reader: &R,
    http: &reqwest::Client,
    ipfs_gateway: &str,
    nft_address: Address,
    nft_type: NftType,
    account: Address,
    token_id: U256,
) -> Result<(String, U256), TokenError>
where
    R: ChainReader + ?Sized,
{
    match nft_type {
        NftType::Erc1155 => {
            let name = async {
                let uri = call_contract(reader, nft_address, IERC1155::uriCall { id: token_id }).await?;
                let url = resolve_metadata_uri(&uri, token_id, ipfs_gateway);
                Ok::<_, TokenError>(fetch_metadata_name(http, &url).await?)
            };
            let balance = call_contract(
                reader,
                nft_address,
                IERC1155::balanceOfCall { account, id: token_id },
            );
            tokio::try_join!(name, balance)
        }
        NftType::Erc721 => {
            let (name, owner) = tokio::try_join!(
                call_contract(reader, nft_address, IERC721::nameCall {}),
                call_contract(reader, nft_address, IERC721::ownerOfCall { tokenId: token_id }),
            )?;
            let balance = if owner == account { U256::from(1) } else { U256::ZERO };
            Ok((name, balance))
        }
    }
}

async fn fetch_metadata_name(http: &reqwest::Client, url: &str) -> Result<String, MetadataError> {
    let metadata: Value = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    metadata["name"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MetadataError::UnexpectedResponse {
            url: url.to_string(),
            reason: "metadata has no `name`".to_string(),
        })
}

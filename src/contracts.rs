//! Token contract interfaces and function descriptors
//!
//! The tester only needs a handful of ERC20 / ERC721 / ERC1155 functions. Each
//! standard gets a closed enum of the functions the forms offer, and every
//! variant carries its fixed argument list so forms never look anything up by
//! name at runtime.

use std::str::FromStr;
use alloy::{
    primitives::{utils::parse_units, FixedBytes},
    sol,
    sol_types::SolCall,
};
use crate::{
    errors::{EncodeError, TokenError},
    traits::ChainReader,
    types::{Address, Bytes, FieldInputs, NftType, U256},
    utils::input_validators::validate_address,
};

sol! {
    interface IERC165 {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }

    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }

    interface IERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function transferFrom(address from, address to, uint256 tokenId) external;
        function setApprovalForAll(address operator, bool approved) external;
        function approve(address to, uint256 tokenId) external;
        function name() external view returns (string);
        function ownerOf(uint256 tokenId) external view returns (address);
    }

    interface IERC1155 {
        function safeTransferFrom(address from, address to, uint256 id, uint256 amount, bytes data) external;
        function setApprovalForAll(address operator, bool approved) external;
        function safeBatchTransferFrom(address from, address to, uint256[] ids, uint256[] amounts, bytes data) external;
        function balanceOf(address account, uint256 id) external view returns (uint256);
        function uri(uint256 id) external view returns (string);
    }
}

/// ERC-165 interface id of ERC721
pub const ERC721_INTERFACE_ID: FixedBytes<4> = FixedBytes([0x80, 0xac, 0x58, 0xcd]);

/// ERC-165 interface id of ERC1155
pub const ERC1155_INTERFACE_ID: FixedBytes<4> = FixedBytes([0xd9, 0xb6, 0x7a, 0x26]);

/// Execute a read-only contract call and decode its return value
///
/// # Arguments
/// - `reader`: chain access used for `eth_call`
/// - `contract`: target contract address
/// - `call`: typed call generated by `sol!`
///
/// # Returns
/// - `Ok(C::Return)`: decoded return value
/// - `Err(TokenError)`: if the call fails or returns undecodable data
pub async fn call_contract<R, C>(reader: &R, contract: Address, call: C) -> Result<C::Return, TokenError>
where
    R: ChainReader + ?Sized,
    C: SolCall,
{
    let output = reader
        .call(contract, call.abi_encode().into())
        .await
        .map_err(|source| TokenError::QueryFailed { address: contract.to_string(), source })?;
    C::abi_decode_returns(&output).map_err(|e| TokenError::Decode {
        address: contract.to_string(),
        function: C::SIGNATURE,
        reason: e.to_string(),
    })
}

/// ABI type of a function argument, limited to what the three standards use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Address,
    Uint256,
    Uint256Array,
    Bool,
    Bytes,
}

/// Formal argument of a token function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionInput {
    pub name: &'static str,
    pub kind: ParamKind,
}

use self::ParamKind as Kind;

const fn input(name: &'static str, kind: ParamKind) -> FunctionInput {
    FunctionInput { name, kind }
}

const ERC20_TRANSFER: &[FunctionInput] = &[input("to", Kind::Address), input("amount", Kind::Uint256)];
const ERC20_APPROVE: &[FunctionInput] = &[input("spender", Kind::Address), input("amount", Kind::Uint256)];

const ERC721_TRANSFER: &[FunctionInput] = &[
    input("from", Kind::Address),
    input("to", Kind::Address),
    input("tokenId", Kind::Uint256),
];
const ERC721_APPROVE: &[FunctionInput] = &[input("to", Kind::Address), input("tokenId", Kind::Uint256)];

const SET_APPROVAL_FOR_ALL: &[FunctionInput] = &[input("operator", Kind::Address), input("approved", Kind::Bool)];

const ERC1155_TRANSFER: &[FunctionInput] = &[
    input("from", Kind::Address),
    input("to", Kind::Address),
    input("id", Kind::Uint256),
    input("amount", Kind::Uint256),
    input("data", Kind::Bytes),
];
const ERC1155_BATCH_TRANSFER: &[FunctionInput] = &[
    input("from", Kind::Address),
    input("to", Kind::Address),
    input("ids", Kind::Uint256Array),
    input("amounts", Kind::Uint256Array),
    input("data", Kind::Bytes),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Erc20Function {
    Transfer,
    Approve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Erc721Function {
    SafeTransferFrom,
    TransferFrom,
    SetApprovalForAll,
    Approve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Erc1155Function {
    SafeTransferFrom,
    SetApprovalForAll,
    SafeBatchTransferFrom,
}

impl Erc20Function {
    pub const ALL: [Self; 2] = [Self::Transfer, Self::Approve];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Approve => "approve",
        }
    }

    pub fn inputs(&self) -> &'static [FunctionInput] {
        match self {
            Self::Transfer => ERC20_TRANSFER,
            Self::Approve => ERC20_APPROVE,
        }
    }
}

impl Erc721Function {
    pub const ALL: [Self; 4] = [
        Self::SafeTransferFrom,
        Self::TransferFrom,
        Self::SetApprovalForAll,
        Self::Approve,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SafeTransferFrom => "safeTransferFrom",
            Self::TransferFrom => "transferFrom",
            Self::SetApprovalForAll => "setApprovalForAll",
            Self::Approve => "approve",
        }
    }

    pub fn inputs(&self) -> &'static [FunctionInput] {
        match self {
            Self::SafeTransferFrom | Self::TransferFrom => ERC721_TRANSFER,
            Self::SetApprovalForAll => SET_APPROVAL_FOR_ALL,
            Self::Approve => ERC721_APPROVE,
        }
    }
}

impl Erc1155Function {
    pub const ALL: [Self; 3] = [
        Self::SafeTransferFrom,
        Self::SetApprovalForAll,
        Self::SafeBatchTransferFrom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SafeTransferFrom => "safeTransferFrom",
            Self::SetApprovalForAll => "setApprovalForAll",
            Self::SafeBatchTransferFrom => "safeBatchTransferFrom",
        }
    }

    pub fn inputs(&self) -> &'static [FunctionInput] {
        match self {
            Self::SafeTransferFrom => ERC1155_TRANSFER,
            Self::SetApprovalForAll => SET_APPROVAL_FOR_ALL,
            Self::SafeBatchTransferFrom => ERC1155_BATCH_TRANSFER,
        }
    }
}

/// A callable token operation of one of the three standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenFunction {
    Erc20(Erc20Function),
    Erc721(Erc721Function),
    Erc1155(Erc1155Function),
}

impl TokenFunction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Erc20(f) => f.name(),
            Self::Erc721(f) => f.name(),
            Self::Erc1155(f) => f.name(),
        }
    }

    pub fn inputs(&self) -> &'static [FunctionInput] {
        match self {
            Self::Erc20(f) => f.inputs(),
            Self::Erc721(f) => f.inputs(),
            Self::Erc1155(f) => f.inputs(),
        }
    }

    /// Functions offered for an NFT of the given standard
    pub fn nft_functions(nft_type: NftType) -> Vec<Self> {
        match nft_type {
            NftType::Erc721 => Erc721Function::ALL.into_iter().map(Self::Erc721).collect(),
            NftType::Erc1155 => Erc1155Function::ALL.into_iter().map(Self::Erc1155).collect(),
        }
    }

    /// Look up an NFT function by ABI name; `None` if the standard lacks it
    pub fn nft_function(nft_type: NftType, name: &str) -> Option<Self> {
        Self::nft_functions(nft_type)
            .into_iter()
            .find(|function| function.name() == name)
    }

    /// ABI-encode the call from the form's text values
    ///
    /// `decimals` scales ERC20 amounts; NFT integers are taken as-is.
    pub fn encode(&self, values: &FieldInputs, decimals: u8) -> Result<Bytes, EncodeError> {
        let args = Args { values };
        let data = match self {
            Self::Erc20(Erc20Function::Transfer) => IERC20::transferCall {
                to: args.address("to")?,
                amount: args.token_amount("amount", decimals)?,
            }.abi_encode(),
            Self::Erc20(Erc20Function::Approve) => IERC20::approveCall {
                spender: args.address("spender")?,
                amount: args.token_amount("amount", decimals)?,
            }.abi_encode(),
            Self::Erc721(Erc721Function::SafeTransferFrom) => IERC721::safeTransferFromCall {
                from: args.address("from")?,
                to: args.address("to")?,
                tokenId: args.uint("tokenId")?,
            }.abi_encode(),
            Self::Erc721(Erc721Function::TransferFrom) => IERC721::transferFromCall {
                from: args.address("from")?,
                to: args.address("to")?,
                tokenId: args.uint("tokenId")?,
            }.abi_encode(),
            Self::Erc721(Erc721Function::SetApprovalForAll) => IERC721::setApprovalForAllCall {
                operator: args.address("operator")?,
                approved: args.boolean("approved")?,
            }.abi_encode(),
            Self::Erc721(Erc721Function::Approve) => IERC721::approveCall {
                to: args.address("to")?,
                tokenId: args.uint("tokenId")?,
            }.abi_encode(),
            Self::Erc1155(Erc1155Function::SafeTransferFrom) => IERC1155::safeTransferFromCall {
                from: args.address("from")?,
                to: args.address("to")?,
                id: args.uint("id")?,
                amount: args.uint("amount")?,
                data: args.bytes("data")?,
            }.abi_encode(),
            Self::Erc1155(Erc1155Function::SetApprovalForAll) => IERC1155::setApprovalForAllCall {
                operator: args.address("operator")?,
                approved: args.boolean("approved")?,
            }.abi_encode(),
            Self::Erc1155(Erc1155Function::SafeBatchTransferFrom) => IERC1155::safeBatchTransferFromCall {
                from: args.address("from")?,
                to: args.address("to")?,
                ids: args.uint_list("ids")?,
                amounts: args.uint_list("amounts")?,
                data: args.bytes("data")?,
            }.abi_encode(),
        };
        Ok(data.into())
    }
}

/// Typed view over the form's text values
struct Args<'a> {
    values: &'a FieldInputs,
}

impl<'a> Args<'a> {
    fn raw(&self, name: &'static str) -> Result<&'a str, EncodeError> {
        self.values
            .get(name)
            .map(|field| field.value.trim())
            .ok_or(EncodeError::MissingArgument(name))
    }

    fn address(&self, name: &'static str) -> Result<Address, EncodeError> {
        let raw = self.raw(name)?;
        if let Some(error) = validate_address(raw) {
            return Err(invalid(name, error));
        }
        Address::from_str(raw).map_err(|e| invalid(name, e))
    }

    fn uint(&self, name: &'static str) -> Result<U256, EncodeError> {
        parse_uint(name, self.raw(name)?)
    }

    fn uint_list(&self, name: &'static str) -> Result<Vec<U256>, EncodeError> {
        self.raw(name)?
            .split(',')
            .map(|item| parse_uint(name, item.trim()))
            .collect()
    }

    fn token_amount(&self, name: &'static str, decimals: u8) -> Result<U256, EncodeError> {
        parse_units(self.raw(name)?, decimals)
            .map(|units| units.get_absolute())
            .map_err(|e| invalid(name, e))
    }

    fn boolean(&self, name: &'static str) -> Result<bool, EncodeError> {
        match self.raw(name)? {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(invalid(name, format!("`{other}` is not a boolean"))),
        }
    }

    fn bytes(&self, name: &'static str) -> Result<Bytes, EncodeError> {
        Bytes::from_str(self.raw(name)?).map_err(|e| invalid(name, e))
    }
}

fn parse_uint(name: &'static str, raw: &str) -> Result<U256, EncodeError> {
    U256::from_str(raw).map_err(|e| invalid(name, e))
}

fn invalid(name: &'static str, reason: impl ToString) -> EncodeError {
    EncodeError::InvalidArgument { name, reason: reason.to_string() }
}

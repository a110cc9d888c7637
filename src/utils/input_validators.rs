//! Form input validation
//!
//! Pure helpers turning raw text typed by the user into a normalized value and
//! an optional [`ValidationError`]. None of them touch the network.

use std::str::FromStr;
use alloy::primitives::utils::parse_units;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::{
    errors::ValidationError,
    types::{Address, U256},
};

/// 40 hex digits with an optional `0x` prefix
static ADDRESS_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x)?[0-9a-fA-F]{40}$").expect("valid address regex"));

/// Integer part only; leading zeros dropped
static INTEGER_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0*([0-9]*)").expect("valid integer regex"));

/// Integer part, separator (`.` or `,`), fractional part
static DECIMAL_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0*([0-9]*)([.,])*([0-9]*)").expect("valid decimal regex"));

/// Check an address for shape and EIP-55 casing
///
/// All-lowercase and all-uppercase addresses carry no checksum and are
/// accepted as-is; mixed case must match the checksum encoding exactly.
///
/// # Returns
/// * `None` - Valid address
/// * `Some(InvalidAddress)` - Not 40 hex digits
/// * `Some(Eip55IncorrectChecksum)` - Mixed case that does not match EIP-55
pub fn validate_address(input: &str) -> Option<ValidationError> {
    if !ADDRESS_SHAPE.is_match(input) {
        return Some(ValidationError::InvalidAddress);
    }

    let digits = input.strip_prefix("0x").unwrap_or(input);
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        return None;
    }

    let address = match Address::from_str(digits) {
        Ok(address) => address,
        Err(_) => return Some(ValidationError::UnknownError),
    };
    if address.to_checksum(None) == format!("0x{digits}") {
        None
    } else {
        Some(ValidationError::Eip55IncorrectChecksum)
    }
}

/// Outcome of [`validate_uint256_balance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountValidation {
    /// Sanitized text to write back into the input
    pub value: String,
    /// Parsed magnitude in the asset's smallest unit
    pub amount: U256,
    pub error: Option<ValidationError>,
}

/// Sanitize an amount and check both balances against it
///
/// With `decimals` set (and non-zero) one fractional separator is kept and the
/// amount is scaled by `10^decimals`; otherwise only the integer digits count.
/// Everything after the first character that does not fit is dropped.
///
/// The fee check always wins: `native_balance < estimated_fee` reports
/// `NotEnoughFunds` whatever the amount. Only then is `asset_balance` compared
/// to the amount (`NotEnoughAssets`). Missing balances count as zero.
pub fn validate_uint256_balance(
    input: &str,
    estimated_fee: U256,
    native_balance: Option<U256>,
    asset_balance: Option<U256>,
    decimals: Option<u8>,
) -> AmountValidation {
    let (value, amount) = match decimals.filter(|d| *d > 0) {
        Some(decimals) => sanitize_decimal(input, decimals),
        None => sanitize_integer(input),
    };

    let amount = match amount {
        Some(amount) => amount,
        None => {
            return AmountValidation {
                value,
                amount: U256::ZERO,
                error: Some(ValidationError::UnknownError),
            }
        }
    };

    let error = if native_balance.unwrap_or_default() < estimated_fee {
        Some(ValidationError::NotEnoughFunds)
    } else if asset_balance.unwrap_or_default() < amount {
        Some(ValidationError::NotEnoughAssets)
    } else {
        None
    };

    AmountValidation { value, amount, error }
}

fn sanitize_integer(input: &str) -> (String, Option<U256>) {
    let digits = INTEGER_AMOUNT
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    let value = if digits.is_empty() { "0" } else { digits };
    (value.to_string(), U256::from_str_radix(value, 10).ok())
}

fn sanitize_decimal(input: &str, decimals: u8) -> (String, Option<U256>) {
    let caps = DECIMAL_AMOUNT.captures(input);
    let group = |i: usize| {
        caps.as_ref()
            .and_then(|caps| caps.get(i))
            .map(|m| m.as_str())
    };
    let integer = group(1).unwrap_or("");
    let separator = group(2);
    let fraction = group(3).unwrap_or("");

    let integer_or_zero = if integer.is_empty() { "0" } else { integer };
    let value = match separator {
        Some(_) => format!("{integer_or_zero}.{fraction}"),
        None if !integer.is_empty() => integer.to_string(),
        None => "0".to_string(),
    };

    let significant = fraction.trim_end_matches('0');
    if significant.len() > decimals as usize {
        return (value, None);
    }
    let significant = if significant.is_empty() { "0" } else { significant };
    let amount = parse_units(&format!("{integer_or_zero}.{significant}"), decimals)
        .ok()
        .map(|units| units.get_absolute());
    (value, amount)
}

/// Check free-form call data
///
/// Empty input means "no data". Anything else must be `0x` followed by an even
/// number of hex digits.
pub fn validate_hex_data(input: &str) -> Option<ValidationError> {
    if input.is_empty() {
        return None;
    }
    match input.strip_prefix("0x") {
        Some(digits) if digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit()) => None,
        _ => Some(ValidationError::UnknownError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18))
    }

    #[test]
    fn test_checksummed_and_single_case_addresses_pass() {
        assert_eq!(validate_address(CHECKSUMMED), None);
        assert_eq!(validate_address(&CHECKSUMMED.to_lowercase()), None);
        assert_eq!(validate_address(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())), None);
        assert_eq!(validate_address("000000000000000000000000deadbeefdeadbeef"), None);
    }

    #[test]
    fn test_wrong_casing_is_a_checksum_mismatch() {
        // flip the case of the first letter
        let wrong = CHECKSUMMED.replacen("dA", "DA", 1);
        assert_eq!(validate_address(&wrong), Some(ValidationError::Eip55IncorrectChecksum));
        assert_eq!(
            validate_address(&wrong[2..]),
            Some(ValidationError::Eip55IncorrectChecksum)
        );
    }

    #[test]
    fn test_checksummed_address_without_prefix_passes() {
        assert_eq!(validate_address("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"), None);
        assert_eq!(validate_address(&CHECKSUMMED[2..]), None);
    }

    #[test]
    fn test_malformed_addresses() {
        for input in [
            "",
            "0x",
            "0x1234",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960455",
            "0xg8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "vitalik.eth",
        ] {
            assert_eq!(validate_address(input), Some(ValidationError::InvalidAddress), "{input}");
        }
    }

    #[test]
    fn test_integer_sanitization() {
        let check = |input: &str| validate_uint256_balance(input, U256::ZERO, None, Some(U256::MAX), None);
        assert_eq!(check("007").value, "7");
        assert_eq!(check("007").amount, U256::from(7));
        assert_eq!(check("12abc").value, "12");
        assert_eq!(check("abc").value, "0");
        assert_eq!(check("000").value, "0");
        assert_eq!(check("1.5").value, "1");
    }

    #[test]
    fn test_decimal_sanitization() {
        let check = |input: &str| {
            validate_uint256_balance(input, U256::ZERO, None, Some(U256::MAX), Some(6))
        };
        assert_eq!(check("0012.5").value, "12.5");
        assert_eq!(check("0012.5").amount, U256::from(12_500_000u64));
        assert_eq!(check("12,5").value, "12.5");
        assert_eq!(check(".5").value, "0.5");
        assert_eq!(check(".5").amount, U256::from(500_000u64));
        assert_eq!(check("12..5").value, "12.5");
        assert_eq!(check("3.").value, "3.");
        assert_eq!(check("3.").amount, U256::from(3_000_000u64));
        assert_eq!(check("x").value, "0");
        assert_eq!(check("1.1000000").amount, U256::from(1_100_000u64));
    }

    #[test]
    fn test_too_many_fraction_digits_is_unknown() {
        let result = validate_uint256_balance("1.1234567", U256::ZERO, None, None, Some(6));
        assert_eq!(result.value, "1.1234567");
        assert_eq!(result.error, Some(ValidationError::UnknownError));
    }

    #[test]
    fn test_zero_decimals_behaves_as_integer() {
        let result = validate_uint256_balance("2.7", U256::ZERO, None, Some(U256::from(5)), Some(0));
        assert_eq!(result.value, "2");
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_fee_check_precedes_asset_check() {
        for input in ["0", "1", "1000000"] {
            let result = validate_uint256_balance(
                input,
                U256::from(100),
                Some(U256::from(99)),
                Some(U256::ZERO),
                Some(18),
            );
            assert_eq!(result.error, Some(ValidationError::NotEnoughFunds), "{input}");
        }
        let result = validate_uint256_balance("1", U256::from(1), None, Some(eth(5)), Some(18));
        assert_eq!(result.error, Some(ValidationError::NotEnoughFunds));
    }

    #[test]
    fn test_asset_balance_check() {
        let result = validate_uint256_balance("2", U256::from(100), Some(U256::from(100)), Some(eth(1)), Some(18));
        assert_eq!(result.error, Some(ValidationError::NotEnoughAssets));

        let result = validate_uint256_balance("1", U256::from(100), Some(U256::from(100)), Some(eth(1)), Some(18));
        assert_eq!(result.error, None);

        let result = validate_uint256_balance("1", U256::ZERO, Some(U256::ZERO), None, None);
        assert_eq!(result.error, Some(ValidationError::NotEnoughAssets));
    }

    #[test]
    fn test_hex_data() {
        assert_eq!(validate_hex_data(""), None);
        assert_eq!(validate_hex_data("0x"), None);
        assert_eq!(validate_hex_data("0xdeadbeef"), None);
        assert_eq!(validate_hex_data("0xabc"), Some(ValidationError::UnknownError));
        assert_eq!(validate_hex_data("deadbeef"), Some(ValidationError::UnknownError));
        assert_eq!(validate_hex_data("0xzz"), Some(ValidationError::UnknownError));
    }
}

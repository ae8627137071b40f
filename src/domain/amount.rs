//! Token amount conversion between human units and on-chain base units.
//!
//! Human amounts are `Decimal`; on-chain amounts are `U256`. Conversion
//! is exact: an amount that cannot be represented in the token's
//! precision is rejected rather than rounded.

use alloy::primitives::U256;
use rust_decimal::Decimal;

use super::errors::AmountError;

/// Convert a human amount into base units (`amount × 10^decimals`).
///
/// # Errors
/// Returns [`AmountError`] if the amount is negative, carries more
/// fractional digits than `decimals`, or overflows `uint256`.
pub fn parse_units(amount: Decimal, decimals: u8) -> Result<U256, AmountError> {
    if amount.is_zero() {
        return Ok(U256::ZERO);
    }
    if amount.is_sign_negative() {
        return Err(AmountError::Negative(amount.to_string()));
    }

    let normalized = amount.normalize();
    let scale = normalized.scale();
    let decimals_u32 = u32::from(decimals);
    if scale > decimals_u32 {
        return Err(AmountError::TooPrecise {
            amount: amount.to_string(),
            decimals,
        });
    }

    let overflow = || AmountError::Overflow {
        amount: amount.to_string(),
        decimals,
    };

    let factor = U256::from(10u64)
        .checked_pow(U256::from(decimals_u32 - scale))
        .ok_or_else(overflow)?;

    U256::from(normalized.mantissa().unsigned_abs())
        .checked_mul(factor)
        .ok_or_else(overflow)
}

/// Render base units as a human-readable decimal string.
///
/// Used for log lines only; trailing fractional zeros are trimmed.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

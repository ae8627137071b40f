//! Swap parameter construction for single-pool exact-input swaps.
//!
//! CRITICAL: swaps are built with a zero minimum output and no price
//! limit, so they accept any execution price. Callers surface this with
//! a warning on every swap (see `SwapParams::has_slippage_protection`).

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, U256};
use serde::Deserialize;

/// Pool fee tiers supported by the V3 router, in hundredths of a bip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.30%
    #[default]
    Medium,
    /// 1.00%
    High,
}

impl FeeTier {
    /// Fee in hundredths of a basis point, as the router expects it.
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Lowest => 100,
            Self::Low => 500,
            Self::Medium => 3000,
            Self::High => 10_000,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(Self::Lowest),
            500 => Ok(Self::Low),
            3000 => Ok(Self::Medium),
            10_000 => Ok(Self::High),
            other => Err(format!(
                "unsupported fee tier {other}, expected one of 100, 500, 3000, 10000"
            )),
        }
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Parameters of one `exactInputSingle` call. Built fresh per swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: FeeTier,
    pub recipient: Address,
    /// Input amount in the input token's base units.
    pub amount_in: U256,
    /// Always zero: no slippage bound.
    pub amount_out_minimum: U256,
    /// Always zero: price limit disabled.
    pub sqrt_price_limit_x96: U160,
}

impl SwapParams {
    pub const fn exact_input_single(
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        recipient: Address,
        amount_in: U256,
    ) -> Self {
        Self {
            token_in,
            token_out,
            fee,
            recipient,
            amount_in,
            amount_out_minimum: U256::ZERO,
            sqrt_price_limit_x96: U160::ZERO,
        }
    }

    /// Whether the swap would revert on an unfavourable price.
    pub fn has_slippage_protection(&self) -> bool {
        !self.amount_out_minimum.is_zero() || !self.sqrt_price_limit_x96.is_zero()
    }
}

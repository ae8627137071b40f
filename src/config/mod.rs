//! Configuration Module - TOML Workflow Settings + Environment Secrets
//!
//! Workflow parameters (amounts, fee tier, confirmation timing) come
//! from an optional `config.toml`; the RPC endpoint, signing key and
//! contract addresses come from environment variables. Both are
//! combined once at startup into a [`WorkflowConfig`] that is passed
//! by reference to the sequencer - there is no global state.

pub mod env;
pub mod loader;

use std::time::Duration;

use alloy::primitives::Address;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::swap::FeeTier;
use crate::domain::token::TokenRef;

use self::env::ChainEnv;

/// Top-level file configuration.
///
/// Every section has defaults, so an absent `config.toml` yields the
/// stock workflow (swap 100 USDC, deposit 100 LINK, 0.30% pool).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Bot identity and logging.
  pub bot: BotConfig,
  /// Amounts and pool selection.
  pub workflow: WorkflowSettings,
  /// Receipt polling behaviour.
  pub confirmation: ConfirmationConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: "swap-deposit-bot".to_string(),
      log_level: default_log_level(),
    }
  }
}

/// Workflow amounts and pool selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
  /// Input token amount to swap, in human units.
  pub amount_to_swap: Decimal,
  /// Output token amount to deposit, in human units.
  pub amount_to_deposit: Decimal,
  /// Uniswap V3 pool fee tier.
  pub fee_tier: FeeTier,
  /// Expected precision of the input token (cross-check only).
  pub token_in_decimals: Option<u8>,
  /// Expected precision of the output token (cross-check only).
  pub token_out_decimals: Option<u8>,
}

impl Default for WorkflowSettings {
  fn default() -> Self {
    Self {
      amount_to_swap: dec!(100),
      amount_to_deposit: dec!(100),
      fee_tier: FeeTier::Medium,
      token_in_decimals: Some(6),
      token_out_decimals: Some(18),
    }
  }
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
  /// Give up waiting for a receipt after this many seconds.
  pub timeout_secs: u64,
  /// Interval between receipt lookups (milliseconds).
  pub poll_interval_ms: u64,
}

impl ConfirmationConfig {
  pub const fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  pub const fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }
}

impl Default for ConfirmationConfig {
  fn default() -> Self {
    Self {
      timeout_secs: 600,
      poll_interval_ms: 2_000,
    }
  }
}

/// Everything the sequencer needs to know, built once at startup.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
  /// Signing account address (recipient of the swap, depositor).
  pub account: Address,
  /// Token sold in the swap.
  pub token_in: TokenRef,
  /// Token bought in the swap and deposited.
  pub token_out: TokenRef,
  /// Uniswap V3 swap router.
  pub router: Address,
  /// Aave lending pool.
  pub lending_pool: Address,
  pub amount_to_swap: Decimal,
  pub amount_to_deposit: Decimal,
  pub fee_tier: FeeTier,
}

impl WorkflowConfig {
  /// Combine file settings with the environment-provided chain setup.
  pub fn build(settings: &WorkflowSettings, chain: &ChainEnv) -> Self {
    Self {
      account: chain.signer.address(),
      token_in: TokenRef::new("USDC", chain.usdc)
        .with_expected_decimals(settings.token_in_decimals),
      token_out: TokenRef::new("LINK", chain.link)
        .with_expected_decimals(settings.token_out_decimals),
      router: chain.router,
      lending_pool: chain.lending_pool,
      amount_to_swap: settings.amount_to_swap,
      amount_to_deposit: settings.amount_to_deposit,
      fee_tier: settings.fee_tier,
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

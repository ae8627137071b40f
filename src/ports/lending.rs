//! Lending Client Port - Lending Pool Deposit Interface

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::domain::errors::ChainError;
use crate::domain::tx::PendingTx;

/// Trait for an Aave-style lending pool.
#[async_trait]
pub trait LendingClient: Send + Sync + 'static {
  /// Pool contract address (the spender to approve).
  fn address(&self) -> Address;

  /// Submit `deposit(asset, amount, on_behalf_of, referral_code)`.
  async fn deposit(
    &self,
    asset: Address,
    amount: U256,
    on_behalf_of: Address,
    referral_code: u16,
  ) -> Result<PendingTx, ChainError>;
}

//! Token Client Port - ERC-20 Authorization Interface
//!
//! Minimal view of an ERC-20 token: its precision and the ability
//! to approve a spender. Approvals return a pending handle that must
//! be confirmed before anything depends on the allowance.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::domain::errors::ChainError;
use crate::domain::tx::PendingTx;
use crate::domain::workflow::Step;

/// Trait for a single ERC-20 token bound to the signing account.
#[async_trait]
pub trait TokenClient: Send + Sync + 'static {
  /// Contract address of the token.
  fn address(&self) -> Address;

  /// Decimal precision reported by the token contract.
  async fn decimals(&self) -> Result<u8, ChainError>;

  /// Submit `approve(spender, amount)` from the signing account.
  ///
  /// `step` labels the returned handle for logging.
  async fn approve(
    &self,
    spender: Address,
    amount: U256,
    step: Step,
  ) -> Result<PendingTx, ChainError>;
}

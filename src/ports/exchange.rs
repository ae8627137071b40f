//! Exchange Client Port - DEX Swap Interface

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::domain::errors::ChainError;
use crate::domain::swap::SwapParams;
use crate::domain::tx::PendingTx;

/// Trait for a V3-style swap router.
#[async_trait]
pub trait ExchangeClient: Send + Sync + 'static {
  /// Router contract address (the spender to approve).
  fn address(&self) -> Address;

  /// Submit `exactInputSingle(params)`.
  async fn exact_input_single(&self, params: &SwapParams) -> Result<PendingTx, ChainError>;
}

//! Confirmation Port - Transaction Receipt Waiting
//!
//! Resolves a pending handle into a receipt. A reverted transaction is
//! an error, never a receipt with `success = false`.

use async_trait::async_trait;

use crate::domain::errors::ConfirmationError;
use crate::domain::tx::{PendingTx, TxReceipt};

/// Trait for waiting on transaction confirmation.
#[async_trait]
pub trait Confirmations: Send + Sync + 'static {
  /// Block until `pending` is mined, reverts, or the wait gives up.
  ///
  /// Consumes the handle: it can be awaited exactly once.
  async fn wait_for(&self, pending: PendingTx) -> Result<TxReceipt, ConfirmationError>;
}

//! Receipt Poller - Transaction Confirmation via `eth_getTransactionReceipt`
//!
//! Implements the `Confirmations` port by polling for the receipt of a
//! submitted transaction. Every wait is bounded by a timeout so a
//! dropped transaction cannot hang the workflow forever.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::TxHash;
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::ConfirmationConfig;
use crate::domain::errors::{ChainError, ConfirmationError};
use crate::domain::tx::{PendingTx, TxReceipt};
use crate::ports::confirmation::Confirmations;

use super::provider::ChainProvider;

/// Consecutive failed receipt lookups tolerated before giving up.
const MAX_CONSECUTIVE_RPC_ERRORS: u32 = 3;

/// Single receipt lookup. `Ok(None)` means not mined yet.
#[async_trait]
pub trait ReceiptSource: Send + Sync + 'static {
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>, ChainError>;
}

#[async_trait]
impl ReceiptSource for ChainProvider {
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let receipt = self
            .inner()
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(receipt.map(|r| TxReceipt {
            tx_hash,
            block_number: r.block_number(),
            gas_used: u64::try_from(r.gas_used()).unwrap_or(u64::MAX),
            success: r.status(),
        }))
    }
}

/// Polls the node until a receipt appears or the timeout expires.
pub struct ReceiptPoller<S = ChainProvider> {
    source: Arc<S>,
    timeout: Duration,
    poll_interval: Duration,
}

impl<S: ReceiptSource> ReceiptPoller<S> {
    pub const fn new(source: Arc<S>, config: &ConfirmationConfig) -> Self {
        Self {
            source,
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    async fn poll(&self, pending: &PendingTx) -> Result<TxReceipt, ConfirmationError> {
        let tx_hash = pending.tx_hash();
        let mut rpc_errors = 0;

        loop {
            match self.source.receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {
                    rpc_errors = 0;
                    debug!(%tx_hash, "Receipt not available yet");
                }
                Err(e) => {
                    rpc_errors += 1;
                    if rpc_errors >= MAX_CONSECUTIVE_RPC_ERRORS {
                        return Err(ConfirmationError::Rpc {
                            tx_hash,
                            reason: e.to_string(),
                        });
                    }
                    warn!(%tx_hash, error = %e, attempt = rpc_errors, "Receipt lookup failed");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl<S: ReceiptSource> Confirmations for ReceiptPoller<S> {
    #[instrument(skip(self, pending), fields(tx_hash = %pending.tx_hash(), step = %pending.step()))]
    async fn wait_for(&self, pending: PendingTx) -> Result<TxReceipt, ConfirmationError> {
        let tx_hash = pending.tx_hash();

        let receipt = tokio::time::timeout(self.timeout, self.poll(&pending))
            .await
            .map_err(|_| ConfirmationError::TimedOut {
                tx_hash,
                after: self.timeout,
            })??;

        if !receipt.success {
            return Err(ConfirmationError::Reverted {
                tx_hash,
                block_number: receipt.block_number,
            });
        }

        debug!(block = ?receipt.block_number, gas_used = receipt.gas_used, "Transaction confirmed");
        Ok(receipt)
    }
}

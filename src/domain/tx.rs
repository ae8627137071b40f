//! Submitted-transaction handles and their confirmed receipts.

use alloy::primitives::TxHash;
use serde::Serialize;

use super::workflow::Step;

/// A transaction that has been accepted by the node but not yet confirmed.
///
/// Not `Clone`: the handle is consumed by value when awaited, so only
/// the submitting step can resolve it.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingTx {
    tx_hash: TxHash,
    step: Step,
}

impl PendingTx {
    pub const fn new(tx_hash: TxHash, step: Step) -> Self {
        Self { tx_hash, step }
    }

    pub const fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    pub const fn step(&self) -> Step {
        self.step
    }
}

/// Confirmed outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

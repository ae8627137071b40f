//! Workflow state machine and run report.
//!
//! The workflow is strictly linear:
//! `Start → AuthorizeIn → Swap → AuthorizeOut → Deposit → Done`.
//! Any step may fail instead, which halts forward progress.

use alloy::primitives::TxHash;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::tx::TxReceipt;

/// Position in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    Start,
    /// Approve the input token for the exchange router.
    AuthorizeIn,
    /// Exact-input single-pool swap.
    Swap,
    /// Approve the output token for the lending pool.
    AuthorizeOut,
    /// Deposit into the lending pool.
    Deposit,
    Done,
}

impl Step {
    /// Steps that submit a transaction, in execution order.
    pub const SUBMITTING: [Self; 4] = [
        Self::AuthorizeIn,
        Self::Swap,
        Self::AuthorizeOut,
        Self::Deposit,
    ];
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::AuthorizeIn => "AUTHORIZE_IN",
            Self::Swap => "SWAP",
            Self::AuthorizeOut => "AUTHORIZE_OUT",
            Self::Deposit => "DEPOSIT",
            Self::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// One confirmed step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl StepRecord {
    pub const fn from_receipt(step: Step, receipt: &TxReceipt) -> Self {
        Self {
            step,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// Outcome of a fully successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Confirmed steps in execution order.
    pub steps: Vec<StepRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn total_gas_used(&self) -> u64 {
        self.steps.iter().map(|s| s.gas_used).sum()
    }
}

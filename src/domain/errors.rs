//! Error taxonomy for the swap-and-deposit workflow.
//!
//! Each workflow step has its own error type that wraps the underlying
//! chain failure, so the top-level handler can report which step broke
//! without the sequencer doing any interpretation of its own.

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

use super::workflow::Step;

/// Startup configuration problems. Raised before any RPC traffic.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {var} is invalid: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Human amount could not be expressed in a token's base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount {0} is negative")]
    Negative(String),

    #[error("amount {amount} has more than {decimals} fractional digits")]
    TooPrecise { amount: String, decimals: u8 },

    #[error("amount {amount} with {decimals} decimals overflows uint256")]
    Overflow { amount: String, decimals: u8 },
}

/// A submitted transaction did not reach a successful receipt.
#[derive(Debug, Clone, Error)]
pub enum ConfirmationError {
    #[error("transaction {tx_hash} reverted in block {block_number:?}")]
    Reverted {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },

    #[error("transaction {tx_hash} not confirmed after {after:?}")]
    TimedOut { tx_hash: TxHash, after: Duration },

    #[error("receipt lookup for {tx_hash} failed: {reason}")]
    Rpc { tx_hash: TxHash, reason: String },
}

/// Failure talking to a contract: read call, submission, or confirmation.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc call failed: {0}")]
    Rpc(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}

/// Approval of a spender did not complete.
#[derive(Debug, Error)]
#[error("approval of token {token} for spender {spender} failed")]
pub struct AuthorizationError {
    pub token: Address,
    pub spender: Address,
    #[source]
    pub source: ChainError,
}

/// The exchange swap did not complete.
#[derive(Debug, Error)]
#[error("swap of {amount_in} base units failed")]
pub struct SwapError {
    pub amount_in: U256,
    #[source]
    pub source: ChainError,
}

/// Either the lending-pool approval or the deposit itself failed.
#[derive(Debug, Error)]
pub enum DepositError {
    #[error("deposit approval failed")]
    Authorization(#[source] AuthorizationError),

    #[error("deposit of {amount} base units into pool failed")]
    Submission {
        amount: U256,
        #[source]
        source: ChainError,
    },
}

/// First failure of a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("input token authorization failed")]
    Authorization(#[source] AuthorizationError),

    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error(transparent)]
    Deposit(#[from] DepositError),
}

impl WorkflowError {
    /// The step the workflow was in when it stopped.
    pub const fn failed_step(&self) -> Step {
        match self {
            Self::Authorization(_) => Step::AuthorizeIn,
            Self::Swap(_) => Step::Swap,
            Self::Deposit(DepositError::Authorization(_)) => Step::AuthorizeOut,
            Self::Deposit(DepositError::Submission { .. }) => Step::Deposit,
        }
    }
}

//! Sequencer Use Case - Approve, Swap, Approve, Deposit
//!
//! Drives the fixed workflow end-to-end:
//! 1. Approve the input token for the swap router
//! 2. Swap input for output token (exact input, single pool)
//! 3. Approve the output token for the lending pool
//! 4. Deposit the output token into the lending pool
//!
//! Every submission is awaited to confirmation before the next one is
//! issued. The signing account's nonce is shared by all four
//! transactions, so strict sequencing is required for correctness.
//! The first failure halts the run; confirmed steps stay on-chain and
//! nothing is retried or compensated.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{Instrument, error, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::domain::amount::{format_units, parse_units};
use crate::domain::errors::{
  AuthorizationError, ChainError, DepositError, SwapError, WorkflowError,
};
use crate::domain::swap::SwapParams;
use crate::domain::token::TokenRef;
use crate::domain::tx::{PendingTx, TxReceipt};
use crate::domain::workflow::{RunReport, Step, StepRecord};
use crate::ports::{Confirmations, ExchangeClient, LendingClient, TokenClient};

/// Referral code attached to every lending deposit (no referral program).
pub const REFERRAL_CODE: u16 = 0;

/// A confirmed approval and the base-unit amount it covers.
#[derive(Debug, Clone)]
pub struct Authorized {
  pub amount: U256,
  pub decimals: u8,
  pub receipt: TxReceipt,
}

/// Receipts of the deposit phase (output approval + deposit).
#[derive(Debug, Clone)]
pub struct Deposited {
  pub approval: TxReceipt,
  pub deposit: TxReceipt,
}

/// Executes the swap-and-deposit workflow against the chain ports.
pub struct Sequencer<'a, T, X, L, C>
where
  T: TokenClient,
  X: ExchangeClient,
  L: LendingClient,
  C: Confirmations,
{
  config: &'a WorkflowConfig,
  /// Client for the token sold in the swap.
  token_in: Arc<T>,
  /// Client for the token bought and deposited.
  token_out: Arc<T>,
  exchange: Arc<X>,
  lending: Arc<L>,
  confirmations: Arc<C>,
}

impl<'a, T, X, L, C> Sequencer<'a, T, X, L, C>
where
  T: TokenClient,
  X: ExchangeClient,
  L: LendingClient,
  C: Confirmations,
{
  /// Create a new sequencer over borrowed configuration.
  pub const fn new(
    config: &'a WorkflowConfig,
    token_in: Arc<T>,
    token_out: Arc<T>,
    exchange: Arc<X>,
    lending: Arc<L>,
    confirmations: Arc<C>,
  ) -> Self {
    Self {
      config,
      token_in,
      token_out,
      exchange,
      lending,
      confirmations,
    }
  }

  /// Run the full workflow once.
  ///
  /// Returns the four confirmed steps in order, or the first failure.
  ///
  /// # Errors
  /// Returns [`WorkflowError`] identifying the failed step; steps
  /// confirmed before it remain applied.
  pub async fn run(&self) -> Result<RunReport, WorkflowError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("workflow", %run_id);

    let result = self.run_steps(run_id).instrument(span.clone()).await;

    if let Err(e) = &result {
      span.in_scope(|| {
        error!(
          failed_step = %e.failed_step(),
          error = %e,
          cause = %error_chain(e),
          "Workflow halted; previously confirmed steps are not rolled back"
        );
      });
    }

    result
  }

  async fn run_steps(&self, run_id: Uuid) -> Result<RunReport, WorkflowError> {
    let started_at = Utc::now();
    let mut steps = Vec::with_capacity(Step::SUBMITTING.len());

    info!(
      account = %self.config.account,
      token_in = %self.config.token_in,
      token_out = %self.config.token_out,
      amount_to_swap = %self.config.amount_to_swap,
      amount_to_deposit = %self.config.amount_to_deposit,
      "Starting swap-and-deposit workflow"
    );

    // ── AUTHORIZE_IN ──────────────────────────────────────
    let approved = self
      .authorize(
        &self.token_in,
        &self.config.token_in,
        self.exchange.address(),
        self.config.amount_to_swap,
        Step::AuthorizeIn,
      )
      .await
      .map_err(WorkflowError::Authorization)?;
    steps.push(StepRecord::from_receipt(Step::AuthorizeIn, &approved.receipt));

    // ── SWAP ──────────────────────────────────────────────
    let swapped = self.swap(approved.amount).await?;
    steps.push(StepRecord::from_receipt(Step::Swap, &swapped));

    // ── AUTHORIZE_OUT + DEPOSIT ───────────────────────────
    let deposited = self
      .deposit_to_lending_pool(self.config.amount_to_deposit)
      .await?;
    steps.push(StepRecord::from_receipt(Step::AuthorizeOut, &deposited.approval));
    steps.push(StepRecord::from_receipt(Step::Deposit, &deposited.deposit));

    let report = RunReport {
      run_id,
      steps,
      started_at,
      finished_at: Utc::now(),
    };

    info!(
      steps = report.steps.len(),
      total_gas_used = report.total_gas_used(),
      "Workflow complete"
    );

    Ok(report)
  }

  /// Approve `spender` for `amount` of `token`, converted with the
  /// token's own on-chain precision, and wait for confirmation.
  ///
  /// # Errors
  /// Fails if the precision lookup, conversion, submission or
  /// confirmation fails.
  #[instrument(skip(self, client, token), fields(token = %token.symbol))]
  pub async fn authorize(
    &self,
    client: &T,
    token: &TokenRef,
    spender: Address,
    amount: Decimal,
    step: Step,
  ) -> Result<Authorized, AuthorizationError> {
    let fail = |source: ChainError| AuthorizationError {
      token: token.address,
      spender,
      source,
    };

    let decimals = client.decimals().await.map_err(fail)?;
    if token.decimals_mismatch(decimals) {
      warn!(
        expected = ?token.expected_decimals,
        fetched = decimals,
        "Token precision differs from configuration; using on-chain value"
      );
    }

    let base_units = parse_units(amount, decimals).map_err(|e| fail(e.into()))?;

    let pending = client.approve(spender, base_units, step).await.map_err(fail)?;
    let receipt = self.confirm(pending).await.map_err(fail)?;

    info!(
      %amount,
      %base_units,
      %spender,
      tx_hash = %receipt.tx_hash,
      block = ?receipt.block_number,
      "Approved {amount} {}",
      token.symbol
    );

    Ok(Authorized {
      amount: base_units,
      decimals,
      receipt,
    })
  }

  /// Swap `amount_in` base units of the input token for the output token.
  ///
  /// The swap accepts any output amount (zero minimum, no price limit).
  ///
  /// # Errors
  /// Fails on submission, confirmation, or on-chain revert.
  #[instrument(skip(self), fields(step = %Step::Swap))]
  pub async fn swap(&self, amount_in: U256) -> Result<TxReceipt, SwapError> {
    let fail = |source: ChainError| SwapError { amount_in, source };

    let params = SwapParams::exact_input_single(
      self.config.token_in.address,
      self.config.token_out.address,
      self.config.fee_tier,
      self.config.account,
      amount_in,
    );

    if !params.has_slippage_protection() {
      warn!(
        amount_in = %params.amount_in,
        fee = %params.fee,
        "Swap has zero minimum output and no price limit; any execution price is accepted"
      );
    }

    let pending = self
      .exchange
      .exact_input_single(&params)
      .await
      .map_err(fail)?;
    let receipt = self.confirm(pending).await.map_err(fail)?;

    info!(
      tx_hash = %receipt.tx_hash,
      block = ?receipt.block_number,
      "Swap executed"
    );

    Ok(receipt)
  }

  /// Approve the lending pool for the output token, then deposit
  /// `amount` on behalf of the configured account.
  ///
  /// # Errors
  /// Fails if either the approval or the deposit fails.
  #[instrument(skip(self), fields(step = %Step::Deposit))]
  pub async fn deposit_to_lending_pool(&self, amount: Decimal) -> Result<Deposited, DepositError> {
    let pool = self.lending.address();

    let authorized = self
      .authorize(
        &self.token_out,
        &self.config.token_out,
        pool,
        amount,
        Step::AuthorizeOut,
      )
      .await
      .map_err(DepositError::Authorization)?;

    let base_units = authorized.amount;
    let fail = |source: ChainError| DepositError::Submission {
      amount: base_units,
      source,
    };

    let pending = self
      .lending
      .deposit(
        self.config.token_out.address,
        base_units,
        self.config.account,
        REFERRAL_CODE,
      )
      .await
      .map_err(fail)?;
    let receipt = self.confirm(pending).await.map_err(fail)?;

    info!(
      tx_hash = %receipt.tx_hash,
      block = ?receipt.block_number,
      "Deposited {} {} to lending pool",
      format_units(base_units, authorized.decimals),
      self.config.token_out.symbol
    );

    Ok(Deposited {
      approval: authorized.receipt,
      deposit: receipt,
    })
  }

  /// Wait for a pending transaction. Reverts arrive as errors from the port.
  async fn confirm(&self, pending: PendingTx) -> Result<TxReceipt, ChainError> {
    let receipt = self.confirmations.wait_for(pending).await?;
    debug_assert!(receipt.success, "confirmation port returned a reverted receipt");
    Ok(receipt)
  }
}

/// Flatten an error's source chain for a single log field.
fn error_chain(err: &dyn std::error::Error) -> String {
  let mut parts = Vec::new();
  let mut source = err.source();
  while let Some(cause) = source {
    parts.push(cause.to_string());
    source = cause.source();
  }
  parts.join(": ")
}

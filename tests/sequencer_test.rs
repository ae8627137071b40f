//! Integration Tests - Sequencer Against Mocked Chain Ports
//!
//! Exercises the approve → swap → approve → deposit workflow with
//! mockall port mocks (strict ordering via `Sequence`) and a recording
//! fake that checks no submission happens while another is unconfirmed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, TxHash, U256, address};
use mockall::predicate::*;
use mockall::{Sequence, mock};
use rust_decimal_macros::dec;

use swap_deposit_bot::config::WorkflowConfig;
use swap_deposit_bot::domain::errors::{
  ChainError, ConfirmationError, DepositError, WorkflowError,
};
use swap_deposit_bot::domain::swap::{FeeTier, SwapParams};
use swap_deposit_bot::domain::token::TokenRef;
use swap_deposit_bot::domain::tx::{PendingTx, TxReceipt};
use swap_deposit_bot::domain::workflow::Step;
use swap_deposit_bot::ports::{Confirmations, ExchangeClient, LendingClient, TokenClient};
use swap_deposit_bot::usecases::Sequencer;

// ---- Mock Definitions ----

mock! {
    pub Token {}

    #[async_trait::async_trait]
    impl TokenClient for Token {
        fn address(&self) -> Address;
        async fn decimals(&self) -> Result<u8, ChainError>;
        async fn approve(
            &self,
            spender: Address,
            amount: U256,
            step: Step,
        ) -> Result<PendingTx, ChainError>;
    }
}

mock! {
    pub Exchange {}

    #[async_trait::async_trait]
    impl ExchangeClient for Exchange {
        fn address(&self) -> Address;
        async fn exact_input_single(&self, params: &SwapParams) -> Result<PendingTx, ChainError>;
    }
}

mock! {
    pub Lending {}

    #[async_trait::async_trait]
    impl LendingClient for Lending {
        fn address(&self) -> Address;
        async fn deposit(
            &self,
            asset: Address,
            amount: U256,
            on_behalf_of: Address,
            referral_code: u16,
        ) -> Result<PendingTx, ChainError>;
    }
}

mock! {
    pub Confirm {}

    #[async_trait::async_trait]
    impl Confirmations for Confirm {
        async fn wait_for(&self, pending: PendingTx) -> Result<TxReceipt, ConfirmationError>;
    }
}

// ---- Fixtures ----

const ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const LINK: Address = address!("514910771af9ca656af840dff83e8264ecf986ca");
const ROUTER: Address = address!("68b3465833fb72a70ecdf485e0e4c7bd8665fc45");
const POOL: Address = address!("7d2768de32b0b80b7a3454c06bdac94a69ddc7a9");

fn workflow_config() -> WorkflowConfig {
  WorkflowConfig {
    account: ACCOUNT,
    token_in: TokenRef::new("USDC", USDC).with_expected_decimals(Some(6)),
    token_out: TokenRef::new("LINK", LINK).with_expected_decimals(Some(18)),
    router: ROUTER,
    lending_pool: POOL,
    amount_to_swap: dec!(100),
    amount_to_deposit: dec!(100),
    fee_tier: FeeTier::Medium,
  }
}

fn units(amount: u64, decimals: u64) -> U256 {
  U256::from(amount) * U256::from(10u64).pow(U256::from(decimals))
}

fn hash_for(step: Step) -> TxHash {
  let byte = match step {
    Step::AuthorizeIn => 1,
    Step::Swap => 2,
    Step::AuthorizeOut => 3,
    Step::Deposit => 4,
    Step::Start | Step::Done => 0xff,
  };
  TxHash::repeat_byte(byte)
}

fn submitted(step: Step) -> Result<PendingTx, ChainError> {
  Ok(PendingTx::new(hash_for(step), step))
}

fn confirmed(pending: PendingTx) -> Result<TxReceipt, ConfirmationError> {
  Ok(TxReceipt {
    tx_hash: pending.tx_hash(),
    block_number: Some(100),
    gas_used: 50_000,
    success: true,
  })
}

fn rejected() -> ChainError {
  ChainError::Rejected("insufficient funds for gas * price + value".to_string())
}

/// Mocks with only address expectations set.
fn bare_mocks() -> (MockToken, MockToken, MockExchange, MockLending, MockConfirm) {
  let mut token_in = MockToken::new();
  token_in.expect_address().return_const(USDC);
  let mut token_out = MockToken::new();
  token_out.expect_address().return_const(LINK);
  let mut exchange = MockExchange::new();
  exchange.expect_address().return_const(ROUTER);
  let mut lending = MockLending::new();
  lending.expect_address().return_const(POOL);
  (token_in, token_out, exchange, lending, MockConfirm::new())
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_full_workflow_runs_steps_in_order() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();
  let mut seq = Sequence::new();

  token_in
    .expect_decimals()
    .times(1)
    .in_sequence(&mut seq)
    .returning(|| Ok(6));
  token_in
    .expect_approve()
    .with(eq(ROUTER), eq(units(100, 6)), eq(Step::AuthorizeIn))
    .times(1)
    .in_sequence(&mut seq)
    .returning(|_, _, step| submitted(step));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::AuthorizeIn)
    .times(1)
    .in_sequence(&mut seq)
    .returning(confirmed);

  exchange
    .expect_exact_input_single()
    .withf(|p| {
      p.token_in == USDC
        && p.token_out == LINK
        && p.fee.as_u32() == 3000
        && p.recipient == ACCOUNT
        && p.amount_in == units(100, 6)
        && p.amount_out_minimum == U256::ZERO
        && p.sqrt_price_limit_x96 == U160::ZERO
    })
    .times(1)
    .in_sequence(&mut seq)
    .returning(|_| submitted(Step::Swap));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::Swap)
    .times(1)
    .in_sequence(&mut seq)
    .returning(confirmed);

  token_out
    .expect_decimals()
    .times(1)
    .in_sequence(&mut seq)
    .returning(|| Ok(18));
  token_out
    .expect_approve()
    .with(eq(POOL), eq(units(100, 18)), eq(Step::AuthorizeOut))
    .times(1)
    .in_sequence(&mut seq)
    .returning(|_, _, step| submitted(step));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::AuthorizeOut)
    .times(1)
    .in_sequence(&mut seq)
    .returning(confirmed);

  lending
    .expect_deposit()
    .with(eq(LINK), eq(units(100, 18)), eq(ACCOUNT), eq(0u16))
    .times(1)
    .in_sequence(&mut seq)
    .returning(|_, _, _, _| submitted(Step::Deposit));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::Deposit)
    .times(1)
    .in_sequence(&mut seq)
    .returning(confirmed);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let report = sequencer.run().await.unwrap();

  let steps: Vec<Step> = report.steps.iter().map(|s| s.step).collect();
  assert_eq!(steps, Step::SUBMITTING.to_vec());
  let hashes: Vec<TxHash> = report.steps.iter().map(|s| s.tx_hash).collect();
  assert_eq!(
    hashes,
    Step::SUBMITTING.iter().map(|s| hash_for(*s)).collect::<Vec<_>>()
  );
  assert_eq!(report.total_gas_used(), 200_000);
  assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_authorize_in_failure_stops_everything() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in.expect_decimals().returning(|| Ok(6));
  token_in
    .expect_approve()
    .times(1)
    .returning(|_, _, _| Err(rejected()));
  confirm.expect_wait_for().times(0);
  exchange.expect_exact_input_single().times(0);
  token_out.expect_decimals().times(0);
  token_out.expect_approve().times(0);
  lending.expect_deposit().times(0);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = sequencer.run().await.unwrap_err();
  assert_eq!(err.failed_step(), Step::AuthorizeIn);
  match err {
    WorkflowError::Authorization(auth) => {
      assert_eq!(auth.token, USDC);
      assert_eq!(auth.spender, ROUTER);
      assert!(matches!(auth.source, ChainError::Rejected(_)));
    }
    other => panic!("expected authorization error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_decimals_lookup_failure_is_authorization_error() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in
    .expect_decimals()
    .returning(|| Err(ChainError::Rpc("execution reverted".to_string())));
  token_in.expect_approve().times(0);
  confirm.expect_wait_for().times(0);
  exchange.expect_exact_input_single().times(0);
  token_out.expect_decimals().times(0);
  lending.expect_deposit().times(0);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = sequencer.run().await.unwrap_err();
  assert!(matches!(err, WorkflowError::Authorization(_)));
}

#[tokio::test]
async fn test_swap_revert_stops_deposit_without_undoing_approval() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in.expect_decimals().returning(|| Ok(6));
  // Exactly one approval: nothing tries to reset the allowance afterwards.
  token_in
    .expect_approve()
    .times(1)
    .returning(|_, _, step| submitted(step));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::AuthorizeIn)
    .times(1)
    .returning(confirmed);
  exchange
    .expect_exact_input_single()
    .times(1)
    .returning(|_| submitted(Step::Swap));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::Swap)
    .times(1)
    .returning(|p| {
      Err(ConfirmationError::Reverted {
        tx_hash: p.tx_hash(),
        block_number: Some(101),
      })
    });
  token_out.expect_decimals().times(0);
  token_out.expect_approve().times(0);
  lending.expect_deposit().times(0);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = sequencer.run().await.unwrap_err();
  assert_eq!(err.failed_step(), Step::Swap);
  match err {
    WorkflowError::Swap(swap) => {
      assert_eq!(swap.amount_in, units(100, 6));
      assert!(matches!(
        swap.source,
        ChainError::Confirmation(ConfirmationError::Reverted { .. })
      ));
    }
    other => panic!("expected swap error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_output_approval_failure_is_deposit_error() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in.expect_decimals().returning(|| Ok(6));
  token_in
    .expect_approve()
    .returning(|_, _, step| submitted(step));
  exchange
    .expect_exact_input_single()
    .returning(|_| submitted(Step::Swap));
  confirm.expect_wait_for().times(2).returning(confirmed);
  token_out.expect_decimals().returning(|| Ok(18));
  token_out
    .expect_approve()
    .times(1)
    .returning(|_, _, _| Err(rejected()));
  lending.expect_deposit().times(0);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = sequencer.run().await.unwrap_err();
  assert_eq!(err.failed_step(), Step::AuthorizeOut);
  match err {
    WorkflowError::Deposit(DepositError::Authorization(auth)) => {
      assert_eq!(auth.token, LINK);
      assert_eq!(auth.spender, POOL);
    }
    other => panic!("expected deposit authorization error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_deposit_timeout_is_deposit_error() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in.expect_decimals().returning(|| Ok(6));
  token_in
    .expect_approve()
    .returning(|_, _, step| submitted(step));
  exchange
    .expect_exact_input_single()
    .returning(|_| submitted(Step::Swap));
  token_out.expect_decimals().returning(|| Ok(18));
  token_out
    .expect_approve()
    .returning(|_, _, step| submitted(step));
  lending
    .expect_deposit()
    .times(1)
    .returning(|_, _, _, _| submitted(Step::Deposit));
  confirm
    .expect_wait_for()
    .withf(|p| p.step() != Step::Deposit)
    .times(3)
    .returning(confirmed);
  confirm
    .expect_wait_for()
    .withf(|p| p.step() == Step::Deposit)
    .times(1)
    .returning(|p| {
      Err(ConfirmationError::TimedOut {
        tx_hash: p.tx_hash(),
        after: Duration::from_secs(600),
      })
    });

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = sequencer.run().await.unwrap_err();
  assert_eq!(err.failed_step(), Step::Deposit);
  match err {
    WorkflowError::Deposit(DepositError::Submission { amount, source }) => {
      assert_eq!(amount, units(100, 18));
      assert!(matches!(
        source,
        ChainError::Confirmation(ConfirmationError::TimedOut { .. })
      ));
    }
    other => panic!("expected deposit submission error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_approval_uses_fetched_precision_over_configured_hint() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  // Configured hint says 6, the token reports 18.
  token_in.expect_decimals().returning(|| Ok(18));
  token_in
    .expect_approve()
    .with(eq(ROUTER), eq(units(100, 18)), eq(Step::AuthorizeIn))
    .times(1)
    .returning(|_, _, step| submitted(step));
  exchange
    .expect_exact_input_single()
    .withf(|p| p.amount_in == units(100, 18))
    .times(1)
    .returning(|_| submitted(Step::Swap));
  token_out.expect_decimals().returning(|| Ok(8));
  token_out
    .expect_approve()
    .with(eq(POOL), eq(units(100, 8)), eq(Step::AuthorizeOut))
    .times(1)
    .returning(|_, _, step| submitted(step));
  lending
    .expect_deposit()
    .with(eq(LINK), eq(units(100, 8)), eq(ACCOUNT), eq(0u16))
    .times(1)
    .returning(|_, _, _, _| submitted(Step::Deposit));
  confirm.expect_wait_for().times(4).returning(confirmed);

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  tokio_test::assert_ok!(sequencer.run().await);
}

#[tokio::test]
async fn test_unrepresentable_amount_fails_before_submission() {
  let (mut token_in, mut token_out, mut exchange, mut lending, mut confirm) = bare_mocks();

  token_in.expect_decimals().returning(|| Ok(6));
  token_in.expect_approve().times(0);
  confirm.expect_wait_for().times(0);
  exchange.expect_exact_input_single().times(0);
  token_out.expect_decimals().times(0);
  lending.expect_deposit().times(0);

  let mut config = workflow_config();
  config.amount_to_swap = dec!(0.0000001);
  let sequencer = Sequencer::new(
    &config,
    Arc::new(token_in),
    Arc::new(token_out),
    Arc::new(exchange),
    Arc::new(lending),
    Arc::new(confirm),
  );

  let err = tokio_test::assert_err!(sequencer.run().await);
  match err {
    WorkflowError::Authorization(auth) => {
      assert!(matches!(auth.source, ChainError::Amount(_)));
    }
    other => panic!("expected authorization error, got {other:?}"),
  }
}

// ---- Recording fake: no submission while a handle is unresolved ----

#[derive(Default)]
struct Ledger {
  events: Mutex<Vec<String>>,
  in_flight: AtomicBool,
}

impl Ledger {
  fn submit(&self, step: Step) -> Result<PendingTx, ChainError> {
    assert!(
      !self.in_flight.swap(true, Ordering::SeqCst),
      "{step} submitted while a previous transaction was unconfirmed"
    );
    self.events.lock().unwrap().push(format!("submit {step}"));
    submitted(step)
  }

  fn events(&self) -> Vec<String> {
    self.events.lock().unwrap().clone()
  }
}

struct FakeToken {
  ledger: Arc<Ledger>,
  address: Address,
  decimals: u8,
}

#[async_trait::async_trait]
impl TokenClient for FakeToken {
  fn address(&self) -> Address {
    self.address
  }

  async fn decimals(&self) -> Result<u8, ChainError> {
    Ok(self.decimals)
  }

  async fn approve(
    &self,
    _spender: Address,
    _amount: U256,
    step: Step,
  ) -> Result<PendingTx, ChainError> {
    self.ledger.submit(step)
  }
}

struct FakeChain {
  ledger: Arc<Ledger>,
}

#[async_trait::async_trait]
impl ExchangeClient for FakeChain {
  fn address(&self) -> Address {
    ROUTER
  }

  async fn exact_input_single(&self, _params: &SwapParams) -> Result<PendingTx, ChainError> {
    self.ledger.submit(Step::Swap)
  }
}

#[async_trait::async_trait]
impl LendingClient for FakeChain {
  fn address(&self) -> Address {
    POOL
  }

  async fn deposit(
    &self,
    _asset: Address,
    _amount: U256,
    _on_behalf_of: Address,
    _referral_code: u16,
  ) -> Result<PendingTx, ChainError> {
    self.ledger.submit(Step::Deposit)
  }
}

/// Confirms after a delay, clearing the in-flight flag only on resolution.
struct SlowConfirmations {
  ledger: Arc<Ledger>,
  delay: Duration,
}

#[async_trait::async_trait]
impl Confirmations for SlowConfirmations {
  async fn wait_for(&self, pending: PendingTx) -> Result<TxReceipt, ConfirmationError> {
    tokio::time::sleep(self.delay).await;
    self
      .ledger
      .events
      .lock()
      .unwrap()
      .push(format!("confirm {}", pending.step()));
    self.ledger.in_flight.store(false, Ordering::SeqCst);
    confirmed(pending)
  }
}

#[tokio::test]
async fn test_never_submits_while_previous_step_unconfirmed() {
  let ledger = Arc::new(Ledger::default());
  let token_in = Arc::new(FakeToken {
    ledger: Arc::clone(&ledger),
    address: USDC,
    decimals: 6,
  });
  let token_out = Arc::new(FakeToken {
    ledger: Arc::clone(&ledger),
    address: LINK,
    decimals: 18,
  });
  let chain = Arc::new(FakeChain {
    ledger: Arc::clone(&ledger),
  });
  let confirmations = Arc::new(SlowConfirmations {
    ledger: Arc::clone(&ledger),
    delay: Duration::from_millis(10),
  });

  let config = workflow_config();
  let sequencer = Sequencer::new(
    &config,
    token_in,
    token_out,
    Arc::clone(&chain),
    chain,
    confirmations,
  );

  let report = sequencer.run().await.unwrap();
  assert_eq!(report.steps.len(), 4);

  assert_eq!(
    ledger.events(),
    vec![
      "submit AUTHORIZE_IN",
      "confirm AUTHORIZE_IN",
      "submit SWAP",
      "confirm SWAP",
      "submit AUTHORIZE_OUT",
      "confirm AUTHORIZE_OUT",
      "submit DEPOSIT",
      "confirm DEPOSIT",
    ]
  );
}

//! Swap-and-Deposit Bot - Entry Point
//!
//! Runs the approve → swap → approve → deposit workflow once and exits.
//!
//! Wiring sequence:
//! 1. Seed env vars from `.env` (if present), load config.toml
//!    (defaults if absent) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load RPC URL, signing key and contract addresses from env vars
//! 4. Connect the signing provider (chain ID check)
//! 5. Validate that every contract address has deployed code
//! 6. Build token/router/pool adapters and the receipt poller
//! 7. Run the sequencer; log the report or the first failure

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use swap_deposit_bot::adapters::chain::{
  ChainProvider, ContractValidator, Erc20Token, LendingPool, ReceiptPoller, SwapRouter,
};
use swap_deposit_bot::config::env::{self, ChainEnv};
use swap_deposit_bot::config::loader::ConfigSource;
use swap_deposit_bot::config::{self, WorkflowConfig};
use swap_deposit_bot::usecases::Sequencer;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
  // ── 1. Seed env vars from .env, load config.toml ────────
  let dotenv_path =
    env::load_dotenv(Path::new(env::DOTENV_FILE)).context("Invalid .env file")?;
  let (app_config, config_source) = config::loader::load_config(CONFIG_PATH)
    .context("Failed to load configuration")?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&app_config.bot.log_level)),
    )
    .json()
    .init();

  info!(
    name = %app_config.bot.name,
    version = env!("CARGO_PKG_VERSION"),
    "Starting swap-and-deposit bot"
  );

  match config_source {
    ConfigSource::File => info!(
      path = CONFIG_PATH,
      amount_to_swap = %app_config.workflow.amount_to_swap,
      amount_to_deposit = %app_config.workflow.amount_to_deposit,
      fee_tier = %app_config.workflow.fee_tier,
      "Configuration loaded successfully"
    ),
    ConfigSource::Defaults => info!(
      path = CONFIG_PATH,
      "No config file found, using workflow defaults"
    ),
  }

  // ── 3. Chain settings from env vars ─────────────────────
  match dotenv_path {
    Some(path) => info!(path = %path.display(), "Loaded environment file"),
    None => info!("No .env file found, using process environment only"),
  }
  let chain_env = ChainEnv::from_env().context("Invalid chain environment")?;
  let workflow = WorkflowConfig::build(&app_config.workflow, &chain_env);

  // ── 4. Signing provider ─────────────────────────────────
  let provider = Arc::new(
    ChainProvider::connect(chain_env.rpc_url.clone(), chain_env.signer.clone())
      .await
      .context("Failed to connect to RPC")?,
  );

  // ── 5. Contract preflight ───────────────────────────────
  ContractValidator::new(provider.inner())
    .validate_all(&[
      ("Swap Router", workflow.router),
      (workflow.token_in.symbol.as_str(), workflow.token_in.address),
      (workflow.token_out.symbol.as_str(), workflow.token_out.address),
      ("Lending Pool", workflow.lending_pool),
    ])
    .await
    .context("Contract validation failed")?;

  // ── 6. Adapters ─────────────────────────────────────────
  let token_in = Arc::new(Erc20Token::new(Arc::clone(&provider), workflow.token_in.address));
  let token_out = Arc::new(Erc20Token::new(Arc::clone(&provider), workflow.token_out.address));
  let router = Arc::new(SwapRouter::new(Arc::clone(&provider), workflow.router));
  let pool = Arc::new(LendingPool::new(Arc::clone(&provider), workflow.lending_pool));
  let receipts = Arc::new(ReceiptPoller::new(
    Arc::clone(&provider),
    &app_config.confirmation,
  ));

  // ── 7. Run the workflow ─────────────────────────────────
  let sequencer = Sequencer::new(&workflow, token_in, token_out, router, pool, receipts);
  let report = sequencer.run().await.context("Swap-and-deposit workflow failed")?;

  for step in &report.steps {
    info!(
      step = %step.step,
      tx_hash = %step.tx_hash,
      block = ?step.block_number,
      gas_used = step.gas_used,
      "Confirmed"
    );
  }

  info!(
    run_id = %report.run_id,
    chain_id = provider.chain_id(),
    total_gas_used = report.total_gas_used(),
    elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
    "Shutdown complete"
  );
  Ok(())
}

//! RPC Provider - alloy-rs 0.9 Connection and Signing
//!
//! Manages the HTTP connection to the chain and the signing wallet.
//! Every contract adapter shares one provider, so the nonce filler
//! sees all four workflow transactions in submission order.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type. We store it as a type-erased `dyn Provider` to keep
//! the API clean across the adapter layer.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::domain::errors::ChainError;
use crate::domain::tx::PendingTx;
use crate::domain::workflow::Step;

/// Shared signing RPC provider backed by alloy-rs 0.9.
///
/// Uses `dyn Provider` for type erasure because alloy 0.9's
/// `ProviderBuilder` returns a deeply-nested generic filler type
/// that would leak implementation details.
pub struct ChainProvider {
    /// Filler-equipped provider with the account's wallet attached.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Address of the signing account.
    account: Address,
    /// Chain ID reported by the node at connect time.
    chain_id: u64,
}

impl ChainProvider {
    /// Connect to the RPC endpoint with `signer` as the sending wallet.
    ///
    /// Queries the chain ID once so a dead endpoint fails at startup.
    #[instrument(skip_all)]
    pub async fn connect(rpc_url: Url, signer: PrivateKeySigner) -> Result<Self> {
        let account = signer.address();
        let wallet = EthereumWallet::from(signer);

        // Recommended fillers: gas (EIP-1559), nonce, chain id.
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_client(RpcClient::new_http(rpc_url).boxed());

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        info!(chain_id, %account, "Connected to RPC");

        Ok(Self {
            provider,
            account,
            chain_id,
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Execute a read-only `eth_call` against `to`.
    pub async fn read(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default()
            .from(self.account)
            .to(to)
            .input(Bytes::from(calldata).into());

        self.provider
            .call(&tx)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Sign and broadcast a state-changing call to `to`.
    ///
    /// Returns as soon as the node accepts the transaction; the handle
    /// must be confirmed separately.
    pub async fn submit(
        &self,
        to: Address,
        calldata: Vec<u8>,
        step: Step,
    ) -> Result<PendingTx, ChainError> {
        let tx = TransactionRequest::default()
            .from(self.account)
            .to(to)
            .input(Bytes::from(calldata).into());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        debug!(%step, %tx_hash, %to, "Transaction submitted");

        Ok(PendingTx::new(tx_hash, step))
    }
}

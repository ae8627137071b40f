//! ERC-20 Token Adapter - Precision Lookup and Approvals
//!
//! Implements the `TokenClient` port for one token contract.
//! Approvals are for the exact workflow amount, never unlimited.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::instrument;

use crate::domain::errors::ChainError;
use crate::domain::tx::PendingTx;
use crate::domain::workflow::Step;
use crate::ports::token::TokenClient;

use super::bindings::IERC20;
use super::provider::ChainProvider;

/// ABI-encode `approve(spender, amount)`.
pub fn encode_approve(spender: Address, amount: U256) -> Vec<u8> {
    IERC20::approveCall { spender, amount }.abi_encode()
}

/// Decode the return data of `decimals()`.
pub fn decode_decimals(data: &[u8]) -> Result<u8, ChainError> {
    IERC20::decimalsCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| ChainError::Rpc(format!("invalid decimals() return data: {e}")))
}

/// One ERC-20 token bound to the signing account.
pub struct Erc20Token {
    provider: Arc<ChainProvider>,
    address: Address,
}

impl Erc20Token {
    pub const fn new(provider: Arc<ChainProvider>, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl TokenClient for Erc20Token {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip(self), fields(token = %self.address))]
    async fn decimals(&self) -> Result<u8, ChainError> {
        let data = self
            .provider
            .read(self.address, IERC20::decimalsCall {}.abi_encode())
            .await?;
        decode_decimals(&data)
    }

    #[instrument(skip(self), fields(token = %self.address))]
    async fn approve(
        &self,
        spender: Address,
        amount: U256,
        step: Step,
    ) -> Result<PendingTx, ChainError> {
        self.provider
            .submit(self.address, encode_approve(spender, amount), step)
            .await
    }
}

//! Swap Router Adapter - Uniswap V3 `exactInputSingle`
//!
//! Implements the `ExchangeClient` port against a SwapRouter02
//! deployment. Domain swap parameters map one-to-one onto the
//! router's params struct.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::primitives::aliases::U24;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::instrument;

use crate::domain::errors::ChainError;
use crate::domain::swap::SwapParams;
use crate::domain::tx::PendingTx;
use crate::domain::workflow::Step;
use crate::ports::exchange::ExchangeClient;

use super::bindings::ISwapRouter;
use super::provider::ChainProvider;

/// ABI-encode `exactInputSingle(params)`.
pub fn encode_exact_input_single(params: &SwapParams) -> Vec<u8> {
    ISwapRouter::exactInputSingleCall {
        params: ISwapRouter::ExactInputSingleParams {
            tokenIn: params.token_in,
            tokenOut: params.token_out,
            fee: U24::from(params.fee.as_u32()),
            recipient: params.recipient,
            amountIn: params.amount_in,
            amountOutMinimum: params.amount_out_minimum,
            sqrtPriceLimitX96: params.sqrt_price_limit_x96,
        },
    }
    .abi_encode()
}

/// Uniswap V3 swap router bound to the signing account.
pub struct SwapRouter {
    provider: Arc<ChainProvider>,
    address: Address,
}

impl SwapRouter {
    pub const fn new(provider: Arc<ChainProvider>, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl ExchangeClient for SwapRouter {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip(self, params), fields(router = %self.address, amount_in = %params.amount_in))]
    async fn exact_input_single(&self, params: &SwapParams) -> Result<PendingTx, ChainError> {
        self.provider
            .submit(self.address, encode_exact_input_single(params), Step::Swap)
            .await
    }
}

//! Lending Pool Adapter - Aave V2 `deposit`
//!
//! Implements the `LendingClient` port.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::instrument;

use crate::domain::errors::ChainError;
use crate::domain::tx::PendingTx;
use crate::domain::workflow::Step;
use crate::ports::lending::LendingClient;

use super::bindings::ILendingPool;
use super::provider::ChainProvider;

/// ABI-encode `deposit(asset, amount, onBehalfOf, referralCode)`.
pub fn encode_deposit(
    asset: Address,
    amount: U256,
    on_behalf_of: Address,
    referral_code: u16,
) -> Vec<u8> {
    ILendingPool::depositCall {
        asset,
        amount,
        onBehalfOf: on_behalf_of,
        referralCode: referral_code,
    }
    .abi_encode()
}

/// Aave lending pool bound to the signing account.
pub struct LendingPool {
    provider: Arc<ChainProvider>,
    address: Address,
}

impl LendingPool {
    pub const fn new(provider: Arc<ChainProvider>, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl LendingClient for LendingPool {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip(self), fields(pool = %self.address))]
    async fn deposit(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> Result<PendingTx, ChainError> {
        self.provider
            .submit(
                self.address,
                encode_deposit(asset, amount, on_behalf_of, referral_code),
                Step::Deposit,
            )
            .await
    }
}

//! Chain Adapters - EVM Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with a signing wallet
//! - ERC-20 precision lookups and approvals
//! - Uniswap V3 `exactInputSingle` swaps
//! - Aave lending pool deposits
//! - Receipt polling with a bounded wait
//! - Contract code validation at startup

pub mod bindings;
pub mod erc20;
pub mod lending_pool;
pub mod provider;
pub mod receipts;
pub mod router;
pub mod validator;

pub use erc20::Erc20Token;
pub use lending_pool::LendingPool;
pub use provider::ChainProvider;
pub use receipts::{ReceiptPoller, ReceiptSource};
pub use router::SwapRouter;
pub use validator::ContractValidator;

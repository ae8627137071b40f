//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the sequencer requires from
//! the outside world. Chain adapters implement these traits; tests
//! substitute mocks.
//!
//! Port categories:
//! - `TokenClient`: ERC-20 precision lookup and approvals
//! - `ExchangeClient`: single-pool exact-input swaps
//! - `LendingClient`: lending pool deposits
//! - `Confirmations`: waiting for a submitted transaction's receipt

pub mod confirmation;
pub mod exchange;
pub mod lending;
pub mod token;

pub use confirmation::Confirmations;
pub use exchange::ExchangeClient;
pub use lending::LendingClient;
pub use token::TokenClient;

//! Token references used by the workflow.

use alloy::primitives::Address;

/// Identifies a fungible token by contract address.
///
/// `expected_decimals` is an optional hint from configuration; the
/// precision actually used for conversion is always read from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub symbol: String,
    pub address: Address,
    pub expected_decimals: Option<u8>,
}

impl TokenRef {
    pub fn new(symbol: impl Into<String>, address: Address) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            expected_decimals: None,
        }
    }

    pub fn with_expected_decimals(mut self, decimals: Option<u8>) -> Self {
        self.expected_decimals = decimals;
        self
    }

    /// Whether the fetched precision disagrees with the configured hint.
    pub fn decimals_mismatch(&self, fetched: u8) -> bool {
        self.expected_decimals.is_some_and(|expected| expected != fetched)
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

//! Contract Validator - On-chain Verification at Startup
//!
//! Validates that configured contract addresses point to actual
//! deployed contracts. An address with no code (an EOA or a typo)
//! would make every workflow call a silent no-op or revert, so
//! startup fails before any transaction is submitted.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::Provider;
use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

/// Result of validating a single contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Contract name for logging.
    pub name: String,
    /// Address that was validated.
    pub address: Address,
    /// Whether the contract has deployed code.
    pub has_code: bool,
}

/// Validates contract addresses against on-chain state.
pub struct ContractValidator {
    /// Alloy provider for on-chain queries.
    provider: Arc<dyn Provider + Send + Sync>,
}

impl ContractValidator {
    /// Create a new validator with the given provider.
    pub fn new(provider: Arc<dyn Provider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Validate every named contract.
    ///
    /// Returns an error if any address has no deployed code.
    #[instrument(skip_all, fields(count = contracts.len()))]
    pub async fn validate_all(
        &self,
        contracts: &[(&str, Address)],
    ) -> Result<Vec<ValidationResult>> {
        let mut results = Vec::with_capacity(contracts.len());

        for (name, address) in contracts {
            let result = self.validate_contract(name, *address).await?;

            if result.has_code {
                info!(contract = name, %address, "Contract validated: code exists on-chain");
            } else {
                warn!(contract = name, %address, "Contract has no code, possible misconfiguration");
            }

            results.push(result);
        }

        ensure_all_deployed(&results)?;

        info!(validated = results.len(), "All contract validations complete");
        Ok(results)
    }

    /// Validate a single contract by checking if code exists at the address.
    async fn validate_contract(&self, name: &str, address: Address) -> Result<ValidationResult> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .with_context(|| format!("Failed to query code for {name}"))?;

        Ok(ValidationResult {
            name: name.to_string(),
            address,
            has_code: !code.is_empty(),
        })
    }
}

/// Fail naming every contract without code.
fn ensure_all_deployed(results: &[ValidationResult]) -> Result<()> {
    let missing: Vec<String> = results
        .iter()
        .filter(|r| !r.has_code)
        .map(|r| format!("{} at {}", r.name, r.address))
        .collect();

    anyhow::ensure!(
        missing.is_empty(),
        "No deployed code for: {}; check environment addresses",
        missing.join(", ")
    );
    Ok(())
}

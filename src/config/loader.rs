//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.
//! A missing file is not an error: the stock workflow defaults apply.

use std::path::Path;

use super::AppConfig;
use crate::domain::errors::ConfigurationError;

/// Largest precision whose scale factor (10^d) still fits in uint256.
const MAX_TOKEN_DECIMALS: u8 = 77;

/// Where the active configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
  /// Parsed from the config file.
  File,
  /// No config file; the stock workflow defaults apply.
  Defaults,
}

/// Load and validate configuration from a TOML file.
///
/// Runs before logging is initialized, so the caller reports the
/// returned [`ConfigSource`].
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns [`ConfigurationError`] if:
/// - The file exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<(AppConfig, ConfigSource), ConfigurationError> {
  let file = Path::new(path);

  if !file.exists() {
    let config = AppConfig::default();
    validate_config(&config)?;
    return Ok((config, ConfigSource::Defaults));
  }

  let content = std::fs::read_to_string(file).map_err(|e| ConfigurationError::Unreadable {
    path: file.display().to_string(),
    reason: e.to_string(),
  })?;

  let config = parse_config(&content, path)?;
  Ok((config, ConfigSource::File))
}

/// Parse and validate configuration from TOML text.
///
/// `origin` names the source in error messages.
pub fn parse_config(content: &str, origin: &str) -> Result<AppConfig, ConfigurationError> {
  let config: AppConfig = toml::from_str(content).map_err(|e| ConfigurationError::Malformed {
    path: origin.to_string(),
    reason: e.to_string(),
  })?;

  validate_config(&config)?;
  Ok(config)
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), ConfigurationError> {
  if condition {
    Ok(())
  } else {
    Err(ConfigurationError::Invalid(message()))
  }
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive swap and deposit amounts
/// - Token precision hints that fit uint256 scaling
/// - Sensible confirmation timing
fn validate_config(config: &AppConfig) -> Result<(), ConfigurationError> {
  let workflow = &config.workflow;

  ensure(workflow.amount_to_swap > rust_decimal::Decimal::ZERO, || {
    format!("amount_to_swap must be positive, got {}", workflow.amount_to_swap)
  })?;
  ensure(workflow.amount_to_deposit > rust_decimal::Decimal::ZERO, || {
    format!(
      "amount_to_deposit must be positive, got {}",
      workflow.amount_to_deposit
    )
  })?;

  for (name, hint) in [
    ("token_in_decimals", workflow.token_in_decimals),
    ("token_out_decimals", workflow.token_out_decimals),
  ] {
    if let Some(decimals) = hint {
      ensure(decimals <= MAX_TOKEN_DECIMALS, || {
        format!("{name} must be at most {MAX_TOKEN_DECIMALS}, got {decimals}")
      })?;
    }
  }

  let confirmation = &config.confirmation;
  ensure(confirmation.timeout_secs > 0, || {
    "confirmation timeout_secs must be positive".to_string()
  })?;
  ensure(confirmation.poll_interval_ms > 0, || {
    "confirmation poll_interval_ms must be positive".to_string()
  })?;
  ensure(
    confirmation.poll_interval() <= confirmation.timeout(),
    || {
      format!(
        "poll_interval_ms ({}) must not exceed timeout_secs ({})",
        confirmation.poll_interval_ms, confirmation.timeout_secs
      )
    },
  )?;

  ensure(!config.bot.log_level.is_empty(), || {
    "bot log_level must not be empty".to_string()
  })?;

  Ok(())
}

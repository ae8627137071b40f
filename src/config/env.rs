//! Environment Configuration - RPC Endpoint, Signing Key, Contracts
//!
//! Required env vars: RPC_URL, PRIVATE_KEY, UNISWAP_ROUTER_ADDRESS,
//! USDC_ADDRESS, LINK_ADDRESS, AAVE_LENDING_POOL_ADDRESS.
//! They come from the process environment, optionally seeded from a
//! `.env` file in the working directory (never committed to git).
//! Variables already set in the environment win over the file.
//! All values are parsed here so that a typo fails at startup,
//! before any RPC traffic.

use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;

use crate::domain::errors::ConfigurationError;

pub const RPC_URL: &str = "RPC_URL";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const ROUTER_ADDRESS: &str = "UNISWAP_ROUTER_ADDRESS";
pub const USDC_ADDRESS: &str = "USDC_ADDRESS";
pub const LINK_ADDRESS: &str = "LINK_ADDRESS";
pub const LENDING_POOL_ADDRESS: &str = "AAVE_LENDING_POOL_ADDRESS";

/// Dotenv file read at startup, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Seed the process environment from a dotenv file if it exists.
///
/// Returns the loaded path, or `None` when there is no file.
///
/// # Errors
/// Returns [`ConfigurationError::Unreadable`] if the file exists but
/// cannot be read or parsed.
pub fn load_dotenv(path: &Path) -> Result<Option<PathBuf>, ConfigurationError> {
  if !path.exists() {
    return Ok(None);
  }

  dotenvy::from_path(path).map_err(|e| ConfigurationError::Unreadable {
    path: path.display().to_string(),
    reason: e.to_string(),
  })?;

  Ok(Some(path.to_path_buf()))
}

/// Chain connection and contract addresses from the environment.
pub struct ChainEnv {
  /// RPC endpoint (never logged: it may embed an API key).
  pub rpc_url: Url,
  /// Signing key for the workflow account.
  pub signer: PrivateKeySigner,
  /// Uniswap V3 swap router.
  pub router: Address,
  /// Input token (USDC).
  pub usdc: Address,
  /// Output token (LINK).
  pub link: Address,
  /// Aave lending pool.
  pub lending_pool: Address,
}

impl ChainEnv {
  /// Read all chain settings from the process environment.
  pub fn from_env() -> Result<Self, ConfigurationError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Read chain settings through an arbitrary lookup function.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let require = |var: &'static str| -> Result<String, ConfigurationError> {
      lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigurationError::MissingVar(var))
    };

    let rpc_url = require(RPC_URL)?
      .parse::<Url>()
      .map_err(|e| ConfigurationError::InvalidVar {
        var: RPC_URL,
        reason: e.to_string(),
      })?;

    // The parse error text is generic and never echoes the key itself.
    let signer = require(PRIVATE_KEY)?
      .parse::<PrivateKeySigner>()
      .map_err(|_| ConfigurationError::InvalidVar {
        var: PRIVATE_KEY,
        reason: "not a valid hex-encoded secp256k1 private key".to_string(),
      })?;

    Ok(Self {
      rpc_url,
      signer,
      router: parse_address(ROUTER_ADDRESS, &require(ROUTER_ADDRESS)?)?,
      usdc: parse_address(USDC_ADDRESS, &require(USDC_ADDRESS)?)?,
      link: parse_address(LINK_ADDRESS, &require(LINK_ADDRESS)?)?,
      lending_pool: parse_address(LENDING_POOL_ADDRESS, &require(LENDING_POOL_ADDRESS)?)?,
    })
  }
}

impl std::fmt::Debug for ChainEnv {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChainEnv")
      .field("rpc_url", &"<redacted>")
      .field("account", &self.signer.address())
      .field("router", &self.router)
      .field("usdc", &self.usdc)
      .field("link", &self.link)
      .field("lending_pool", &self.lending_pool)
      .finish()
  }
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigurationError> {
  let address = value
    .parse::<Address>()
    .map_err(|e| ConfigurationError::InvalidVar {
      var,
      reason: e.to_string(),
    })?;

  if address.is_zero() {
    return Err(ConfigurationError::InvalidVar {
      var,
      reason: "zero address".to_string(),
    });
  }

  Ok(address)
}

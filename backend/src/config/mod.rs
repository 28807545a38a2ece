//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here and the
//! resulting [`AppConfig`] is injected into the HTTP handlers; nothing
//! below the `main` function reads the environment directly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! println!("RPC URL: {}", config.rpc_url());
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Example |
//! |----------|-------------|---------|
//! | `SUI_NETWORK` | `mainnet`, `testnet` or `devnet` | `testnet` |
//! | `SUI_RPC_URL` | Full node override | `http://127.0.0.1:9000` |
//! | `SUI_PRIVATE_KEY` | Signing key (`suiprivkey...` or base64) | `suiprivkey1qq...` |
//! | `PACKAGE_ID` | Deployed loyalty package | `0x5b1f...` |
//! | `ADMIN_CAP_ID` | Admin capability object | `0x9c0e...` |
//! | `API_SECRET_KEY` | Shared secret for callers | `change-me` |
//! | `GAS_BUDGET` | Gas budget per transaction (MIST) | `10000000` |
//! | `SERVER_HOST` | HTTP server host | `127.0.0.1` |
//! | `SERVER_PORT` | HTTP server port | `8080` |

use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// The Sui network the backend talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    /// Public full node JSON-RPC endpoint for this network.
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(ConfigError::InvalidValue(
                "SUI_NETWORK".to_string(),
                format!("'{}' (expected mainnet, testnet or devnet)", other),
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Ledger credentials are optional here: the server starts without them
/// and every request that needs the ledger reports the missing value
/// through [`AppConfig::ledger_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ==========================================
    // SUI SETTINGS
    // ==========================================

    /// Network selector.
    pub network: Network,

    /// Explicit JSON-RPC endpoint; falls back to the network's full node.
    pub rpc_url: Option<String>,

    /// Signing key material (`suiprivkey...` or legacy base64).
    pub private_key: Option<String>,

    /// Deployed loyalty package identifier.
    pub package_id: Option<String>,

    /// Admin capability object required by `update_progress`.
    pub admin_cap_id: Option<String>,

    /// Gas budget attached to every transaction, in MIST.
    pub gas_budget: u64,

    // ==========================================
    // API SETTINGS
    // ==========================================

    /// Shared secret callers present in `x-api-key` or `Authorization`.
    pub api_secret_key: Option<String>,

    // ==========================================
    // SERVER SETTINGS
    // ==========================================

    /// HTTP server host address.
    ///
    /// Use `127.0.0.1` for localhost only, `0.0.0.0` to accept
    /// connections from any interface.
    pub server_host: String,

    /// HTTP server port number.
    ///
    /// Default: 8080
    pub server_port: u16,
}

/// The subset of configuration the ledger client needs, with every
/// required value present.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub network: Network,
    pub private_key: String,
    pub package_id: String,
    pub admin_cap_id: String,
    pub rpc_url: Option<String>,
    pub gas_budget: u64,
}

impl LedgerConfig {
    /// The endpoint actually used: the override if set, else the full node.
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.fullnode_url().to_string())
    }
}

/// Default gas budget: 0.01 SUI.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    ///
    /// ## Returns
    ///
    /// - `Ok(AppConfig)` - Configuration loaded successfully
    /// - `Err(ConfigError)` - A variable is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Sui
            network: get_env_or_default("SUI_NETWORK", "testnet").parse()?,
            rpc_url: get_optional_env("SUI_RPC_URL"),
            private_key: get_optional_env("SUI_PRIVATE_KEY"),
            package_id: get_optional_env("PACKAGE_ID"),
            admin_cap_id: get_optional_env("ADMIN_CAP_ID"),
            gas_budget: get_env_or_default("GAS_BUDGET", &DEFAULT_GAS_BUDGET.to_string())
                .parse()
                .map_err(|e| ConfigError::ParseError(
                    "GAS_BUDGET".to_string(),
                    format!("{}", e),
                ))?,

            // API
            api_secret_key: get_optional_env("API_SECRET_KEY"),

            // Server
            server_host: get_env_or_default("SERVER_HOST", "127.0.0.1"),
            server_port: get_env_or_default("SERVER_PORT", "8080")
                .parse()
                .map_err(|e| ConfigError::ParseError(
                    "SERVER_PORT".to_string(),
                    format!("{}", e),
                ))?,
        })
    }

    /// The JSON-RPC endpoint for read-only queries.
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.fullnode_url().to_string())
    }

    /// Build the ledger client configuration.
    ///
    /// Fails with [`ConfigError::MissingEnvVar`] naming the first
    /// required value that is not set.
    pub fn ledger_config(&self) -> Result<LedgerConfig, ConfigError> {
        Ok(LedgerConfig {
            network: self.network,
            private_key: require(&self.private_key, "SUI_PRIVATE_KEY")?,
            package_id: require(&self.package_id, "PACKAGE_ID")?,
            admin_cap_id: require(&self.admin_cap_id, "ADMIN_CAP_ID")?,
            rpc_url: self.rpc_url.clone(),
            gas_budget: self.gas_budget,
        })
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String, ConfigError> {
    value
        .clone()
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
///
/// Returns the default if the variable is not set.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

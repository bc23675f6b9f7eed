//! Environment-backed configuration
//!
//! All runtime settings come from process environment variables, with a
//! `.env` file loaded first when present. Nothing is required up front:
//! each setting is validated at the point of use, so read-only commands
//! work without chain credentials.

use crate::error::{Error, Result};

/// Base URL of the hosted graph API (testnet)
pub const DEFAULT_API_URL: &str = "https://api-testnet.grc-20.thegraph.com";

/// Runtime settings read from the environment.
///
/// # Example
///
/// ```no_run
/// use graphwire_kg::config::Settings;
///
/// let settings = Settings::from_env();
/// let key = settings.require_private_key().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// JSON-RPC endpoint, `RPC_URL`
    pub rpc_url: Option<String>,
    /// Hex signing key, `PRIVATE_KEY`, leading `0x` accepted
    pub private_key: Option<String>,
    /// Author and editor address, `WALLET_ADDRESS`
    pub wallet_address: Option<String>,
    /// Target space, `SPACE_ID`
    pub space_id: Option<String>,
    /// Graph API base, `GRC20_API_URL`, defaults to the hosted testnet
    pub api_url: String,
}

impl Settings {
    /// Read settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            rpc_url: read_var("RPC_URL"),
            private_key: read_var("PRIVATE_KEY"),
            wallet_address: read_var("WALLET_ADDRESS"),
            space_id: read_var("SPACE_ID"),
            api_url: read_var("GRC20_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Signing key with any `0x` prefix stripped, or a config error naming
    /// the missing variable.
    pub fn require_private_key(&self) -> Result<String> {
        let key = self
            .private_key
            .as_deref()
            .ok_or_else(|| Error::Config("PRIVATE_KEY is not set".to_string()))?;
        Ok(key.trim_start_matches("0x").to_string())
    }

    pub fn require_wallet_address(&self) -> Result<String> {
        self.wallet_address
            .clone()
            .ok_or_else(|| Error::Config("WALLET_ADDRESS is not set".to_string()))
    }

    pub fn require_space_id(&self) -> Result<String> {
        self.space_id
            .clone()
            .ok_or_else(|| Error::Config("SPACE_ID is not set".to_string()))
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

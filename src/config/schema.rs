//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the board.
//! All types derive Serde traits for deserialization from config files.
//! Defaults are compiled in; a config file only overrides them at startup.

use serde::{Deserialize, Serialize};

/// Token contract the gate checks (USDC on Base).
pub const DEFAULT_TOKEN_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// Minimum token balance, in the token's smallest unit.
pub const DEFAULT_MIN_BALANCE: &str = "1";

/// Chain the gate is evaluated on (Base mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// Attestation schema identifier.
pub const DEFAULT_SCHEMA_ID: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Environment variable holding the local wallet key.
pub const DEFAULT_PRIVATE_KEY_ENV: &str = "BOARD_WALLET_PRIVATE_KEY";

/// Root configuration for the board.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BoardConfig {
    /// Token gate (token, threshold).
    pub gate: GateConfig,

    /// Chain RPC settings.
    pub blockchain: BlockchainConfig,

    /// Wallet provider selection.
    pub wallet: WalletConfig,

    /// Attestation service settings.
    pub attestation: AttestationConfig,

    /// Deadlines for each external call made by the sequencers.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Token gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// ERC-20 contract address.
    pub token_address: String,

    /// Minimum balance as a decimal (or 0x-hex) integer string.
    /// Strings avoid the i64 ceiling of TOML integers.
    pub min_balance: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            token_address: DEFAULT_TOKEN_ADDRESS.to_string(),
            min_balance: DEFAULT_MIN_BALANCE.to_string(),
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID the gate is evaluated on.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.base.org".to_string(),
            failover_urls: Vec::new(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_timeout_secs: 10,
        }
    }
}

/// Where connected accounts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WalletSource {
    /// A private key held in an environment variable.
    #[default]
    LocalKey,
    /// Accounts unlocked on the JSON-RPC node (`eth_accounts`).
    NodeAccounts,
    /// No wallet provider at all.
    None,
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    pub source: WalletSource,

    /// Environment variable read by the `local_key` source.
    pub private_key_env: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            source: WalletSource::LocalKey,
            private_key_env: DEFAULT_PRIVATE_KEY_ENV.to_string(),
        }
    }
}

/// Attestation service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AttestationConfig {
    /// Endpoint receiving the attestation POST.
    pub endpoint: String,

    /// Schema identifier sent with every request.
    pub schema_id: String,

    /// Optional Bearer token.
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/attestations".to_string(),
            schema_id: DEFAULT_SCHEMA_ID.to_string(),
            api_key: None,
            request_timeout_secs: 15,
        }
    }
}

/// Deadlines applied by the sequencers around each external call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Account request deadline in seconds.
    pub wallet_secs: u64,

    /// Balance lookup deadline in seconds.
    pub balance_secs: u64,

    /// Attestation deadline in seconds.
    pub attestation_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            wallet_secs: 60,
            balance_secs: 20,
            attestation_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

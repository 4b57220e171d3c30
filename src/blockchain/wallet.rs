//! Wallet providers that hand connected accounts to the board.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::board::ports::WalletConnector;
use crate::config::{WalletConfig, WalletSource};

/// Errors surfaced by a wallet provider.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No provider exists in this environment.
    #[error("No wallet provider available")]
    Unavailable,

    /// The user (or provider) declined to share an account.
    #[error("Account request rejected: {0}")]
    Rejected(String),

    /// The node backing the provider failed.
    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// A wallet backed by a local private key.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from the named environment variable.
    pub fn from_env(var: &str) -> BlockchainResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

/// The wallet provider available to this process.
#[derive(Debug, Clone)]
pub enum WalletProvider {
    /// A local key; the only account is its address.
    LocalKey(Wallet),
    /// Accounts unlocked on the RPC node.
    NodeAccounts(BlockchainClient),
    /// Nothing to connect with.
    Absent,
}

impl WalletProvider {
    /// Pick the provider described by `config`.
    ///
    /// A missing or malformed key yields [`WalletProvider::Absent`] so the
    /// board can still start and report the problem on connect.
    pub fn from_config(config: &WalletConfig, client: &BlockchainClient) -> Self {
        match config.source {
            WalletSource::LocalKey => match Wallet::from_env(&config.private_key_env) {
                Ok(wallet) => Self::LocalKey(wallet),
                Err(e) => {
                    tracing::warn!(error = %e, "Local wallet unavailable");
                    Self::Absent
                }
            },
            WalletSource::NodeAccounts => Self::NodeAccounts(client.clone()),
            WalletSource::None => Self::Absent,
        }
    }
}

impl WalletConnector for WalletProvider {
    fn is_available(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        match self {
            Self::LocalKey(wallet) => Ok(vec![wallet.address()]),
            Self::NodeAccounts(client) => Ok(client.get_accounts().await?),
            Self::Absent => Err(WalletError::Unavailable),
        }
    }
}

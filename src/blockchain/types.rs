//! Chain types and the chain error taxonomy.

use std::fmt;

use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// EIP-155 chain id as reported by `eth_chainId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Failures of chain reads and of the key-backed wallet.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Every provider returned an error (or the URL is unusable).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The last provider tried did not answer within the deadline.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// `eth_call` output is not a valid ABI-encoded return value.
    #[error("Failed to decode contract response: {0}")]
    Decode(String),

    /// Private key missing or malformed.
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

pub type BlockchainResult<T> = Result<T, BlockchainError>;

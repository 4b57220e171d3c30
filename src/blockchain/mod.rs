//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) / RPC node accounts
//!     → wallet.rs (account source for connect)
//! RPC URL(s)
//!     → client.rs (RPC connection with timeouts, ERC-20 balance reads)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
pub use wallet::{Wallet, WalletError, WalletProvider};

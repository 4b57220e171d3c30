//! Board data model and error taxonomy.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attestation::ClaimData;
use crate::config::{BoardConfig, ConfigError, TimeoutConfig};
use crate::config::validation::ValidationError;

/// Sequence number of a message within a session. Starts at 1.
pub type MessageId = u64;

/// A posted message. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Truncated wallet address of the poster.
    pub author: String,
    pub content: String,
    /// Client clock at append time.
    pub created_at: DateTime<Utc>,
    pub attestation_uid: Option<String>,
}

/// Everything a message needs except its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub attestation_uid: Option<String>,
}

impl NewPost {
    pub(crate) fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            author: self.author,
            content: self.content,
            created_at: self.created_at,
            attestation_uid: self.attestation_uid,
        }
    }
}

/// Errors reported to the user by the sequencers.
///
/// Generic variants carry no cause; causes are logged by the sequencers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("No wallet provider is available")]
    ProviderUnavailable,

    #[error("No account was selected in the wallet")]
    NoAccountSelected,

    #[error("Insufficient token balance: at least {required} required, found {actual}")]
    InsufficientBalance { required: U256, actual: U256 },

    #[error("Failed to connect wallet")]
    ConnectionFailed,

    #[error("Failed to create attestation")]
    AttestationFailed,

    #[error("A wallet connection is already in progress")]
    ConnectInProgress,

    #[error("Wallet was disconnected before the connection completed")]
    ConnectSuperseded,
}

/// Non-error results of [`submit`](crate::board::BoardController::submit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was attested and appended.
    Posted(Message),
    /// Empty draft or no wallet; nothing happened.
    Skipped,
    /// The attestation arrived after the session changed and was dropped.
    Discarded { attestation_uid: String },
}

/// The token gate, fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    pub token: Address,
    pub min_balance: U256,
    pub chain_id: u64,
}

impl GatePolicy {
    /// Inclusive threshold check.
    pub fn admits(&self, balance: U256) -> bool {
        balance >= self.min_balance
    }

    /// Claim payload sent with every attestation request.
    pub fn claim(&self) -> ClaimData {
        ClaimData {
            token_address: self.token,
            chain_id: self.chain_id,
            min_balance: self.min_balance.to_string(),
        }
    }
}

impl TryFrom<&BoardConfig> for GatePolicy {
    type Error = ConfigError;

    fn try_from(config: &BoardConfig) -> Result<Self, Self::Error> {
        let token = Address::from_str(&config.gate.token_address).map_err(|e| {
            ConfigError::Validation(vec![ValidationError {
                field: "gate.token_address",
                message: e.to_string(),
            }])
        })?;
        let min_balance = U256::from_str(config.gate.min_balance.trim()).map_err(|e| {
            ConfigError::Validation(vec![ValidationError {
                field: "gate.min_balance",
                message: e.to_string(),
            }])
        })?;

        Ok(Self {
            token,
            min_balance,
            chain_id: config.blockchain.chain_id,
        })
    }
}

/// Deadlines for each external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerTimeouts {
    pub wallet: Duration,
    pub balance: Duration,
    pub attestation: Duration,
}

impl Default for SequencerTimeouts {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

impl From<&TimeoutConfig> for SequencerTimeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            wallet: Duration::from_secs(config.wallet_secs),
            balance: Duration::from_secs(config.balance_secs),
            attestation: Duration::from_secs(config.attestation_secs),
        }
    }
}

/// Read projection of the board handed to the view.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub wallet: Option<Address>,
    pub connecting: bool,
    pub attesting: bool,
    pub draft: String,
    pub messages: Arc<Vec<Message>>,
}

impl BoardSnapshot {
    /// Display form of the connected wallet, if any.
    pub fn author(&self) -> Option<String> {
        self.wallet.as_ref().map(display_address)
    }
}

/// Shorten a checksummed address to `0xABCD...1234`.
pub fn display_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(min: u64) -> GatePolicy {
        GatePolicy {
            token: Address::ZERO,
            min_balance: U256::from(min),
            chain_id: 8453,
        }
    }

    #[test]
    fn test_display_address() {
        let address: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        assert_eq!(display_address(&address), "0xf39F...2266");
    }

    #[test]
    fn test_gate_is_inclusive() {
        let gate = policy(100);
        assert!(gate.admits(U256::from(100)));
        assert!(gate.admits(U256::from(101)));
        assert!(!gate.admits(U256::from(99)));
    }

    #[test]
    fn test_zero_threshold_admits_empty_wallet() {
        assert!(policy(0).admits(U256::ZERO));
    }

    #[test]
    fn test_claim_uses_configured_threshold() {
        let claim = policy(1_000_000).claim();
        assert_eq!(claim.min_balance, "1000000");
        assert_eq!(claim.chain_id, 8453);
        assert_eq!(claim.token_address, Address::ZERO);
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = BoardConfig::default();
        config.gate.min_balance = "0x10".into();
        config.blockchain.chain_id = 31337;

        let gate = GatePolicy::try_from(&config).unwrap();
        assert_eq!(gate.min_balance, U256::from(16));
        assert_eq!(gate.chain_id, 31337);
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = BoardError::InsufficientBalance {
            required: U256::from(10),
            actual: U256::from(9),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient token balance: at least 10 required, found 9"
        );
    }
}

//! Seams between the board controller and the outside world.
//!
//! Each external collaborator is a trait so the sequencers can be driven by
//! the real clients in the binary and by fakes in tests.

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::attestation::{AttestationResult, ClaimData};
use crate::blockchain::{BlockchainResult, WalletError};

/// Source of the account a user connects with.
pub trait WalletConnector: Send + Sync {
    /// Whether a provider exists at all in this environment.
    fn is_available(&self) -> bool;

    /// Ask the provider for accounts. The first one is used.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;
}

/// Read-only view of token balances on the gate's chain.
pub trait ChainReader: Send + Sync {
    fn token_balance(
        &self,
        token: Address,
        owner: Address,
    ) -> impl Future<Output = BlockchainResult<U256>> + Send;
}

/// Issuer of attestations certifying the gate for a recipient.
pub trait AttestationService: Send + Sync {
    fn issue_attestation(
        &self,
        recipient: Address,
        claim: ClaimData,
    ) -> impl Future<Output = AttestationResult<String>> + Send;
}

impl<T: WalletConnector> WalletConnector for Arc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send {
        (**self).request_accounts()
    }
}

impl<T: ChainReader> ChainReader for Arc<T> {
    fn token_balance(
        &self,
        token: Address,
        owner: Address,
    ) -> impl Future<Output = BlockchainResult<U256>> + Send {
        (**self).token_balance(token, owner)
    }
}

impl<T: AttestationService> AttestationService for Arc<T> {
    fn issue_attestation(
        &self,
        recipient: Address,
        claim: ClaimData,
    ) -> impl Future<Output = AttestationResult<String>> + Send {
        (**self).issue_attestation(recipient, claim)
    }
}

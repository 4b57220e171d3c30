//! Attestation request/response types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed claim certified by every attestation.
///
/// Built once from the gate configuration, never from a live balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimData {
    /// Token contract the gate checks.
    pub token_address: Address,
    /// Chain the gate is evaluated on.
    pub chain_id: u64,
    /// Minimum balance as a decimal string.
    pub min_balance: String,
}

/// JSON body POSTed to the attestation endpoint.
#[derive(Debug, Serialize)]
pub struct AttestationRequest<'a> {
    pub schema: &'a str,
    pub recipient: Address,
    pub data: &'a ClaimData,
}

/// Successful response body. Only the identifier matters.
#[derive(Debug, Deserialize)]
pub struct AttestationResponse {
    #[serde(default, alias = "id", alias = "attestationUID")]
    pub uid: Option<String>,
}

/// Errors from the attestation service.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// Request could not be sent or the body could not be read.
    #[error("Attestation transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("Attestation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not the expected JSON.
    #[error("Invalid attestation response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Response carried no (or an empty) identifier.
    #[error("Attestation response is missing an identifier")]
    MissingIdentifier,

    /// Client misconfiguration.
    #[error("Attestation client misconfigured: {0}")]
    Config(String),
}

/// Result type for attestation operations.
pub type AttestationResult<T> = Result<T, AttestationError>;

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that addresses, the gate threshold and URLs parse
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BoardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use alloy::primitives::{Address, U256};

use crate::config::schema::{BoardConfig, WalletSource};

/// A single semantic problem with a config field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `gate.token_address`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BoardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Address::from_str(&config.gate.token_address) {
        errors.push(ValidationError::new(
            "gate.token_address",
            format!("invalid address '{}': {}", config.gate.token_address, e),
        ));
    }

    if let Err(e) = U256::from_str(config.gate.min_balance.trim()) {
        errors.push(ValidationError::new(
            "gate.min_balance",
            format!("invalid integer '{}': {}", config.gate.min_balance, e),
        ));
    }

    if let Err(e) = url::Url::parse(&config.blockchain.rpc_url) {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}': {}", config.blockchain.rpc_url, e),
        ));
    }

    for failover in &config.blockchain.failover_urls {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}'", failover),
            ));
        }
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }

    if config.wallet.source == WalletSource::LocalKey && config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "wallet.private_key_env",
            "required when source is local_key",
        ));
    }

    if let Err(e) = url::Url::parse(&config.attestation.endpoint) {
        errors.push(ValidationError::new(
            "attestation.endpoint",
            format!("invalid URL '{}': {}", config.attestation.endpoint, e),
        ));
    }

    if config.attestation.schema_id.trim().is_empty() {
        errors.push(ValidationError::new("attestation.schema_id", "must not be empty"));
    }

    if config.attestation.request_timeout_secs == 0 {
        errors.push(ValidationError::new("attestation.request_timeout_secs", "must be > 0"));
    }

    let timeouts = [
        ("timeouts.wallet_secs", config.timeouts.wallet_secs),
        ("timeouts.balance_secs", config.timeouts.balance_secs),
        ("timeouts.attestation_secs", config.timeouts.attestation_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be > 0"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

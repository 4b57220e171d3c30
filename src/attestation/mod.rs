//! Attestation service integration.
//!
//! One POST per submitted post; the returned identifier is stored on the
//! message. Failures of any kind are reported as [`AttestationError`].

pub mod client;
pub mod types;

pub use client::AttestationClient;
pub use types::{AttestationError, AttestationResult, ClaimData};

//! HTTP client for the attestation service.

use std::time::Duration;

use alloy::primitives::Address;
use reqwest::Client;
use url::Url;

use crate::attestation::types::{
    AttestationError, AttestationRequest, AttestationResponse, AttestationResult, ClaimData,
};
use crate::board::ports::AttestationService;
use crate::config::AttestationConfig;

/// Issues attestations with one JSON POST per request.
#[derive(Debug, Clone)]
pub struct AttestationClient {
    client: Client,
    endpoint: Url,
    schema_id: String,
    api_key: Option<String>,
}

impl AttestationClient {
    /// Build a client from configuration.
    pub fn new(config: &AttestationConfig) -> AttestationResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            AttestationError::Config(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            schema_id: config.schema_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Request an attestation for `recipient` and return its identifier.
    pub async fn issue(&self, recipient: Address, claim: &ClaimData) -> AttestationResult<String> {
        let body = AttestationRequest {
            schema: &self.schema_id,
            recipient,
            data: claim,
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(AttestationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: AttestationResponse = serde_json::from_str(&text)?;
        match parsed.uid {
            Some(uid) if !uid.trim().is_empty() => {
                tracing::debug!(%recipient, uid = %uid, "Attestation issued");
                Ok(uid)
            }
            _ => Err(AttestationError::MissingIdentifier),
        }
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl AttestationService for AttestationClient {
    async fn issue_attestation(&self, recipient: Address, claim: ClaimData) -> AttestationResult<String> {
        self.issue(recipient, &claim).await
    }
}

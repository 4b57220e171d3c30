//! Connection and submission sequencers.
//!
//! # Connect
//! ```text
//! provider available? → request accounts → balanceOf(token, account)
//!     → balance >= minimum ? wallet set : wallet cleared
//! ```
//!
//! # Submit
//! ```text
//! non-empty draft + connected wallet → issue attestation
//!     → session unchanged ? append message, clear draft : discard
//! ```
//!
//! # Design Decisions
//! - The gate is checked at connect time only; submit does not re-read
//!   the balance
//! - Overlapping connects are rejected; overlapping submits are allowed and
//!   append in completion order
//! - Every external call has a deadline; a late result after a disconnect
//!   is dropped instead of cancelled
//! - Causes of the generic failures are logged, never shown to the user

use std::future::Future;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use chrono::Utc;
use tokio::time::timeout;

use crate::blockchain::WalletError;
use crate::board::ports::{AttestationService, ChainReader, WalletConnector};
use crate::board::session::Session;
use crate::board::store::MessageStore;
use crate::board::types::{
    display_address, BoardError, BoardSnapshot, GatePolicy, Message, NewPost, SequencerTimeouts,
    SubmitOutcome,
};
use crate::observability::metrics;

/// Owns the session and the message store, and sequences every user action
/// against the injected wallet, chain and attestation collaborators.
pub struct BoardController<W, C, A> {
    gate: GatePolicy,
    timeouts: SequencerTimeouts,
    wallet: W,
    chain: C,
    attestations: A,
    session: Session,
    store: MessageStore,
}

impl<W, C, A> BoardController<W, C, A>
where
    W: WalletConnector,
    C: ChainReader,
    A: AttestationService,
{
    pub fn new(gate: GatePolicy, timeouts: SequencerTimeouts, wallet: W, chain: C, attestations: A) -> Self {
        Self {
            gate,
            timeouts,
            wallet,
            chain,
            attestations,
            session: Session::new(),
            store: MessageStore::new(),
        }
    }

    /// Connect a wallet and enforce the token gate.
    pub async fn connect(&self) -> Result<Address, BoardError> {
        if !self.wallet.is_available() {
            tracing::warn!("Connect requested but no wallet provider is available");
            metrics::record_connect("provider_unavailable");
            return Err(BoardError::ProviderUnavailable);
        }

        let Some(_busy) = self.session.begin_connect() else {
            tracing::debug!("Connect ignored, another connect is in flight");
            return Err(BoardError::ConnectInProgress);
        };
        let epoch = self.session.epoch();

        let result = self.run_connect().await;

        match result {
            Ok(address) => {
                if !self.session.admit(address, epoch) {
                    tracing::info!(%address, "Disconnected while connecting, dropping result");
                    metrics::record_connect("superseded");
                    return Err(BoardError::ConnectSuperseded);
                }
                tracing::info!(%address, "Wallet connected");
                metrics::record_connect("connected");
                Ok(address)
            }
            Err(err) => {
                // A vanished provider leaves the session as it was, same as
                // the availability check above.
                if err != BoardError::ProviderUnavailable {
                    self.session.reject(epoch);
                }
                metrics::record_connect(connect_outcome(&err));
                Err(err)
            }
        }
    }

    async fn run_connect(&self) -> Result<Address, BoardError> {
        let accounts = match deadline(self.timeouts.wallet, self.wallet.request_accounts()).await {
            Ok(Ok(accounts)) => accounts,
            Ok(Err(WalletError::Rejected(reason))) => {
                tracing::info!(%reason, "Account request declined");
                return Err(BoardError::NoAccountSelected);
            }
            Ok(Err(WalletError::Unavailable)) => {
                tracing::warn!("Wallet provider went away during connect");
                return Err(BoardError::ProviderUnavailable);
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Account request failed");
                return Err(BoardError::ConnectionFailed);
            }
            Err(elapsed) => {
                tracing::error!(timeout_ms = elapsed.as_millis() as u64, "Account request timed out");
                return Err(BoardError::ConnectionFailed);
            }
        };

        let Some(&address) = accounts.first() else {
            tracing::info!("Wallet returned no accounts");
            return Err(BoardError::NoAccountSelected);
        };

        let balance = match deadline(self.timeouts.balance, self.chain.token_balance(self.gate.token, address)).await {
            Ok(Ok(balance)) => balance,
            Ok(Err(e)) => {
                tracing::error!(%address, error = %e, "Token balance lookup failed");
                return Err(BoardError::ConnectionFailed);
            }
            Err(elapsed) => {
                tracing::error!(%address, timeout_ms = elapsed.as_millis() as u64, "Token balance lookup timed out");
                return Err(BoardError::ConnectionFailed);
            }
        };

        if !self.gate.admits(balance) {
            tracing::info!(
                %address,
                %balance,
                required = %self.gate.min_balance,
                "Token gate refused wallet"
            );
            return Err(BoardError::InsufficientBalance {
                required: self.gate.min_balance,
                actual: balance,
            });
        }

        Ok(address)
    }

    /// Drop the connected wallet. In-flight sequences will not commit.
    pub fn disconnect(&self) {
        if let Some(address) = self.session.reset() {
            tracing::info!(%address, "Wallet disconnected");
        }
    }

    /// Attest and append `draft` as a message from the connected wallet.
    ///
    /// `draft` becomes the session draft for the duration of the call: it is
    /// kept on failure and cleared on success unless replaced meanwhile.
    pub async fn submit(&self, draft: &str) -> Result<SubmitOutcome, BoardError> {
        if draft.trim().is_empty() {
            return Ok(SubmitOutcome::Skipped);
        }
        let Some((recipient, epoch)) = self.session.connected() else {
            tracing::debug!("Submit ignored, no wallet connected");
            return Ok(SubmitOutcome::Skipped);
        };
        self.session.set_draft(draft);

        let _busy = self.session.begin_attest();
        let started = Instant::now();

        let issued = deadline(
            self.timeouts.attestation,
            self.attestations.issue_attestation(recipient, self.gate.claim()),
        )
        .await;

        let uid = match issued {
            Ok(Ok(uid)) if !uid.trim().is_empty() => uid,
            Ok(Ok(_)) => {
                tracing::error!(%recipient, "Attestation service returned no identifier");
                metrics::record_attestation("failed", started.elapsed());
                return Err(BoardError::AttestationFailed);
            }
            Ok(Err(e)) => {
                tracing::error!(%recipient, error = %e, "Attestation failed");
                metrics::record_attestation("failed", started.elapsed());
                return Err(BoardError::AttestationFailed);
            }
            Err(elapsed) => {
                tracing::error!(%recipient, timeout_ms = elapsed.as_millis() as u64, "Attestation timed out");
                metrics::record_attestation("timeout", started.elapsed());
                return Err(BoardError::AttestationFailed);
            }
        };
        metrics::record_attestation("issued", started.elapsed());

        if !self.session.is_current(recipient, epoch) {
            tracing::warn!(%recipient, uid = %uid, "Session changed during attestation, discarding post");
            return Ok(SubmitOutcome::Discarded { attestation_uid: uid });
        }

        let message = self.store.append(NewPost {
            author: display_address(&recipient),
            content: draft.to_string(),
            created_at: Utc::now(),
            attestation_uid: Some(uid),
        });
        self.session.clear_draft_if(draft);
        metrics::record_post();

        tracing::info!(id = message.id, author = %message.author, "Message posted");
        Ok(SubmitOutcome::Posted(message))
    }

    /// Submit whatever the session draft currently holds.
    pub async fn submit_draft(&self) -> Result<SubmitOutcome, BoardError> {
        let draft = self.session.draft();
        self.submit(&draft).await
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.session.set_draft(text);
    }

    pub fn draft(&self) -> String {
        self.session.draft()
    }

    pub fn wallet(&self) -> Option<Address> {
        self.session.wallet()
    }

    pub fn is_connecting(&self) -> bool {
        self.session.is_connecting()
    }

    pub fn is_attesting(&self) -> bool {
        self.session.is_attesting()
    }

    pub fn messages(&self) -> std::sync::Arc<Vec<Message>> {
        self.store.list()
    }

    /// Read projection for rendering.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            wallet: self.session.wallet(),
            connecting: self.session.is_connecting(),
            attesting: self.session.is_attesting(),
            draft: self.session.draft(),
            messages: self.store.list(),
        }
    }
}

/// `tokio::time::timeout` that reports the deadline it missed.
async fn deadline<F: Future>(limit: Duration, fut: F) -> Result<F::Output, Duration> {
    timeout(limit, fut).await.map_err(|_| limit)
}

fn connect_outcome(err: &BoardError) -> &'static str {
    match err {
        BoardError::ProviderUnavailable => "provider_unavailable",
        BoardError::NoAccountSelected => "no_account",
        BoardError::InsufficientBalance { .. } => "insufficient_balance",
        _ => "failed",
    }
}

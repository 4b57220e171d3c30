//! Token-gated message board core.
//!
//! # Data Flow
//! ```text
//! View intent (connect / submit)
//!     → controller.rs (sequencers)
//!         → ports.rs (wallet, chain reader, attestation service)
//!     → session.rs (wallet, draft, busy flags)
//!     → store.rs (append-only messages)
//!     → BoardSnapshot back to the view
//! ```
//!
//! # State Machine
//! ```text
//! Disconnected --connect() ok--> Connected
//! Connected --disconnect() / failed gate--> Disconnected
//! ```
//! The `connecting` and `attesting` flags are orthogonal UI hints.

pub mod controller;
pub mod ports;
pub mod session;
pub mod store;
pub mod types;

pub use controller::BoardController;
pub use ports::{AttestationService, ChainReader, WalletConnector};
pub use store::MessageStore;
pub use types::{
    display_address, BoardError, BoardSnapshot, GatePolicy, Message, MessageId, NewPost,
    SequencerTimeouts, SubmitOutcome,
};

//! Token-gated message board library.

pub mod attestation;
pub mod blockchain;
pub mod board;
pub mod config;
pub mod observability;
pub mod view;

pub use board::BoardController;
pub use config::schema::BoardConfig;

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! compiled-in defaults
//!     → optional TOML file (loader.rs, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BoardConfig (validated, immutable)
//!     → GatePolicy / clients built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; the gate cannot change for a running board
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AttestationConfig;
pub use schema::BlockchainConfig;
pub use schema::BoardConfig;
pub use schema::GateConfig;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
pub use schema::WalletConfig;
pub use schema::WalletSource;

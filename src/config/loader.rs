//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BoardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BoardConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BoardConfig, ConfigError> {
    let config: BoardConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            r#"
            [blockchain]
            rpc_url = "http://127.0.0.1:8545"
            chain_id = 31337

            [attestation]
            endpoint = "http://127.0.0.1:4000/attest"
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.blockchain.chain_id, 31337);
        assert_eq!(config.attestation.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = parse_config(include_str!("../../board.example.toml")).unwrap();
        assert_eq!(config.gate.min_balance, "1000000");
        assert_eq!(config.timeouts.attestation_secs, 30);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[gate\nmin_balance = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = parse_config("[attestation]\nendpoint = \"::nope\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().starts_with("Validation failed: attestation.endpoint"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

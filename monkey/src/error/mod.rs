//! Host-facing error types
//!
//! Evaluation itself never fails at the host level (errors are values, see
//! `interp::RuntimeError`). What can fail is setting the evaluator up.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Parse(_) => None,
            Self::Invalid { key, .. } => Some(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("stack_grow_size", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid config value for `stack_grow_size`: must be greater than zero"
        );
        assert_eq!(err.key(), Some("stack_grow_size"));
    }

    #[test]
    fn test_parse_error_from_toml() {
        let toml_err = toml::from_str::<toml::Table>("not = [valid").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().starts_with("Config parse error:"));
        assert_eq!(err.key(), None);
    }
}

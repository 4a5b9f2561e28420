//! Evaluator configuration

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Remaining stack below which evaluation grows the stack
pub const DEFAULT_STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each stack growth segment
pub const DEFAULT_STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Tuning knobs for an `Interpreter`.
///
/// Loaded from TOML by embedding hosts; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Bytes of native stack that must remain before a nested evaluation
    /// switches to a freshly allocated segment
    pub stack_red_zone: usize,
    /// Bytes allocated per stack segment
    pub stack_grow_size: usize,
    /// Reject calls whose argument count differs from the parameter count.
    /// When off, missing parameters bind to `null` and extra arguments are
    /// dropped.
    pub check_arity: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            stack_red_zone: DEFAULT_STACK_RED_ZONE,
            stack_grow_size: DEFAULT_STACK_GROW_SIZE,
            check_arity: true,
        }
    }
}

impl EvalConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EvalConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stack_grow_size == 0 {
            return Err(ConfigError::invalid(
                "stack_grow_size",
                "must be greater than zero",
            ));
        }
        if self.stack_red_zone >= self.stack_grow_size {
            return Err(ConfigError::invalid(
                "stack_red_zone",
                format!(
                    "must be smaller than stack_grow_size ({})",
                    self.stack_grow_size
                ),
            ));
        }
        Ok(())
    }
}

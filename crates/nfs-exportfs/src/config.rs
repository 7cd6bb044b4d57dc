//! Manager configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::EXPORTFS;
use crate::error::{ExportfsError, Result};
use crate::runner::default_escalation;

/// Which exportfs to run and how to elevate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// exportfs executable, looked up on `PATH` unless absolute
    pub program: String,
    /// Tokens prepended for the elevated retry
    pub escalation: Vec<String>,
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self {
            program: EXPORTFS.to_string(),
            escalation: default_escalation(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ExportfsError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ExportfsError::Config {
                reason: "program must not be empty".to_string(),
            });
        }
        if self.escalation.is_empty() {
            return Err(ExportfsError::Config {
                reason: "escalation must have at least one token".to_string(),
            });
        }
        if self.escalation.iter().any(|t| t.trim().is_empty()) {
            return Err(ExportfsError::Config {
                reason: "escalation tokens must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

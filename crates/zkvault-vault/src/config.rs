//! Configuration file management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use zkvault_merkle::check_levels;

use crate::{Result, VaultError};

/// Environment variable naming the config file read by [`VaultConfig::load_default`].
pub const CONFIG_ENV: &str = "ZKVAULT_CONFIG";

/// Complete vault configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault parameters.
    #[serde(default)]
    pub vault: VaultSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Parameters fixed for the lifetime of a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Value of every deposit and withdrawal, in base units.
    #[serde(default = "default_denomination")]
    pub denomination: u64,
    /// Tree depth, 1 to 32.
    #[serde(default = "default_levels")]
    pub levels: usize,
    /// Number of recent roots accepted by withdrawals.
    #[serde(default = "default_root_history_size")]
    pub root_history_size: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_denomination() -> u64 {
    1_000_000_000_000_000_000
}

fn default_levels() -> usize {
    10
}

fn default_root_history_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            denomination: default_denomination(),
            levels: default_levels(),
            root_history_size: default_root_history_size(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl VaultSettings {
    /// Check the parameters a vault can be built from.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfig`] for a zero denomination, a depth
    ///   outside `[1, 32]` or an empty root window
    pub fn validate(&self) -> Result<()> {
        if self.denomination == 0 {
            return Err(VaultError::InvalidConfig("denomination must be nonzero".into()));
        }
        check_levels(self.levels).map_err(|e| VaultError::InvalidConfig(e.to_string()))?;
        if self.root_history_size == 0 {
            return Err(VaultError::InvalidConfig(
                "root_history_size must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

impl VaultConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VaultError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfig`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| VaultError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Load from the file named by `ZKVAULT_CONFIG`.
    ///
    /// Falls back to defaults if the variable is unset.
    pub fn load_default() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.vault.validate()
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| VaultError::InvalidConfig(e.to_string()))
    }

    /// `EnvFilter` directive for the configured level, scoped to this workspace.
    pub fn log_directive(&self) -> String {
        format!("zkvault={}", self.logging.log_level)
    }
}

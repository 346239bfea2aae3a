use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.credvault.toml`.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the base dir) where the key and vault
    /// files are stored.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the master key file.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// File name of the encrypted vault blob.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Seconds of inactivity before the vault auto-locks (default: 5 minutes).
    #[serde(default = "default_auto_lock_timeout_secs")]
    pub auto_lock_timeout_secs: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".credvault".to_string()
}

fn default_key_file() -> String {
    "vault.key".to_string()
}

fn default_vault_file() -> String {
    "vault.dat".to_string()
}

fn default_auto_lock_timeout_secs() -> u64 {
    300
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key_file: default_key_file(),
            vault_file: default_vault_file(),
            auto_lock_timeout_secs: default_auto_lock_timeout_secs(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the base directory.
    const FILE_NAME: &'static str = ".credvault.toml";

    /// Load settings from `<base_dir>/.credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the master key file.
    ///
    /// Example: `base_dir/.credvault/vault.key`
    pub fn key_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.data_dir).join(&self.key_file)
    }

    /// Build the full path to the encrypted vault blob.
    ///
    /// Example: `base_dir/.credvault/vault.dat`
    pub fn vault_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.data_dir).join(&self.vault_file)
    }

    /// The auto-lock timeout as a `Duration`.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.auto_lock_timeout_secs)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

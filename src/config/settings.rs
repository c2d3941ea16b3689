use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, MIN_ITERATIONS};
use crate::errors::{Result, VaultError};
use crate::generator::DEFAULT_LENGTH;

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Vault file location, relative to the project root unless absolute.
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// PBKDF2 iteration count (default: 100 000, never lower).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Seconds before `get --copy` clears the clipboard again.
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,

    /// Length used by `generate` and `add --generate` when none is given.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> String {
    "passvault.vault".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    MIN_ITERATIONS
}

fn default_clipboard_clear_secs() -> u64 {
    20
}

fn default_generator_length() -> usize {
    DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            clipboard_clear_secs: default_clipboard_clear_secs(),
            generator_length: default_generator_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds out-of-range
    /// values, a `Config` error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;
        settings.validate()?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.pbkdf2_iterations < MIN_ITERATIONS {
            return Err(VaultError::Config(format!(
                "pbkdf2_iterations must be at least {MIN_ITERATIONS} (got {})",
                self.pbkdf2_iterations
            )));
        }
        if self.generator_length == 0 {
            return Err(VaultError::Config(
                "generator_length must be at least 1".into(),
            ));
        }
        if self.vault_path.trim().is_empty() {
            return Err(VaultError::Config("vault_path cannot be empty".into()));
        }
        Ok(())
    }

    /// Resolve the vault file path against the project root.
    ///
    /// Example: `project_dir/passvault.vault`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_path)
    }

    /// Convert the PBKDF2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.pbkdf2_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

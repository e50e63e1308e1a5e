use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShecretsError};
use crate::unlock::UnlockOptions;

/// User configuration, loaded from `.shecrets.toml`.
///
/// Every field has a sensible default so Shecrets works out-of-the-box
/// without any config file at all.  Key derivation cost is intentionally
/// absent: it is fixed for every vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds before a copied value is cleared from the clipboard.
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,

    /// Offer to save a prompted passphrase in the OS keychain.
    #[serde(default = "default_true")]
    pub offer_keychain_save: bool,

    /// Require new vault files to end in `.she`.
    #[serde(default = "default_true")]
    pub require_extension: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_clipboard_clear_secs() -> u64 {
    45
}

fn default_true() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            clipboard_clear_secs: default_clipboard_clear_secs(),
            offer_keychain_save: default_true(),
            require_extension: default_true(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".shecrets.toml";

    /// Load settings from `<dir>/.shecrets.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            ShecretsError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Options for the unlock protocol.
    pub fn unlock_options(&self) -> UnlockOptions {
        UnlockOptions {
            offer_keychain_save: self.offer_keychain_save,
        }
    }

    /// Clipboard auto-clear delay.
    pub fn clipboard_clear_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.clipboard_clear_secs)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

//! OS keychain integration for passphrase caching.
//!
//! Stores and retrieves a vault's passphrase from the operating system's
//! secure credential store, keyed by the vault uuid:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: kernel keyutils
//!
//! The unlock protocol only depends on the `Keychain` trait.  Read and
//! delete failures are best-effort at that boundary: an unavailable
//! keychain behaves like an empty one.

use std::cell::RefCell;
use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::errors::{Result, ShecretsError};

/// Service name used in the OS keychain.
pub const SERVICE_NAME: &str = "shecrets";

/// Passphrase storage keyed by vault uuid.
pub trait Keychain {
    /// The stored passphrase for `uuid`, or `None` if there is none.
    fn get(&self, uuid: &str) -> Result<Option<Zeroizing<String>>>;

    /// Store (or replace) the passphrase for `uuid`.
    fn set(&self, uuid: &str, passphrase: &str) -> Result<()>;

    /// Remove the passphrase for `uuid`.  Removing a missing entry is
    /// not an error.
    fn delete(&self, uuid: &str) -> Result<()>;
}

/// The platform credential store.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeychain;

#[cfg(feature = "keyring-store")]
impl OsKeychain {
    fn entry(uuid: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(SERVICE_NAME, uuid).map_err(|e| {
            ShecretsError::KeychainUnavailable(format!("failed to create keychain entry: {e}"))
        })
    }
}

#[cfg(feature = "keyring-store")]
impl Keychain for OsKeychain {
    fn get(&self, uuid: &str) -> Result<Option<Zeroizing<String>>> {
        match Self::entry(uuid)?.get_password() {
            Ok(passphrase) => Ok(Some(Zeroizing::new(passphrase))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ShecretsError::KeychainUnavailable(format!(
                "failed to read from keychain: {e}"
            ))),
        }
    }

    fn set(&self, uuid: &str, passphrase: &str) -> Result<()> {
        Self::entry(uuid)?.set_password(passphrase).map_err(|e| {
            ShecretsError::KeychainUnavailable(format!("failed to store passphrase in keychain: {e}"))
        })
    }

    fn delete(&self, uuid: &str) -> Result<()> {
        match Self::entry(uuid)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ShecretsError::KeychainUnavailable(format!(
                "failed to delete from keychain: {e}"
            ))),
        }
    }
}

#[cfg(not(feature = "keyring-store"))]
impl Keychain for OsKeychain {
    fn get(&self, _uuid: &str) -> Result<Option<Zeroizing<String>>> {
        Err(not_compiled())
    }

    fn set(&self, _uuid: &str, _passphrase: &str) -> Result<()> {
        Err(not_compiled())
    }

    fn delete(&self, _uuid: &str) -> Result<()> {
        Err(not_compiled())
    }
}

#[cfg(not(feature = "keyring-store"))]
fn not_compiled() -> ShecretsError {
    ShecretsError::KeychainUnavailable(
        "keychain support not compiled — rebuild with `--features keyring-store`".into(),
    )
}

/// A process-local keychain, for tests and scripted use.
#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: RefCell<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryKeychain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A keychain that already holds `passphrase` for `uuid`.
    pub fn with_entry(uuid: &str, passphrase: &str) -> Self {
        let keychain = Self::new();
        keychain
            .entries
            .borrow_mut()
            .insert(uuid.to_string(), passphrase.to_string());
        keychain
    }

    /// A keychain whose every call fails with `KeychainUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Peek at the stored passphrase without going through the trait.
    pub fn stored(&self, uuid: &str) -> Option<String> {
        self.entries.borrow().get(uuid).cloned()
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            return Err(ShecretsError::KeychainUnavailable("keychain is locked".into()));
        }
        Ok(())
    }
}

impl Keychain for MemoryKeychain {
    fn get(&self, uuid: &str) -> Result<Option<Zeroizing<String>>> {
        self.check()?;
        Ok(self.entries.borrow().get(uuid).cloned().map(Zeroizing::new))
    }

    fn set(&self, uuid: &str, passphrase: &str) -> Result<()> {
        self.check()?;
        self.entries
            .borrow_mut()
            .insert(uuid.to_string(), passphrase.to_string());
        Ok(())
    }

    fn delete(&self, uuid: &str) -> Result<()> {
        self.check()?;
        self.entries.borrow_mut().remove(uuid);
        Ok(())
    }
}

//! An unlocked vault: the open store plus the verified key.

use std::path::Path;

use super::lifecycle::EntryManager;
use super::store::VaultStore;
use crate::crypto::VaultKey;
use crate::errors::Result;

/// The result of a successful unlock.
///
/// A session exclusively owns the vault file handle and the derived key.
/// The handle is released exactly once, either by `close` or on drop;
/// the key is zeroized on drop.
pub struct Session {
    store: VaultStore,
    key: VaultKey,
    uuid: String,
}

impl Session {
    pub fn new(store: VaultStore, key: VaultKey, uuid: String) -> Self {
        Self { store, key, uuid }
    }

    /// Entry operations bound to this session's store and key.
    pub fn entries(&self) -> EntryManager<'_> {
        EntryManager::new(&self.store, &self.key)
    }

    /// The vault's identifier (keychain account name).
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Path of the open vault file.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Release the vault file, surfacing any close error.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }
}

//! Entry lifecycle over an unlocked `(store, key)` pair.
//!
//! Encryption and decryption happen here, at the store boundary, so the
//! store only ever sees ciphertext.  Each field is sealed separately
//! under its own fresh nonce.
//!
//! Name lookups decrypt every entry and compare plaintext.  There is
//! deliberately no index over names.

use tracing::{debug, info};

use super::entry::{Entry, EntryField, EntryRow};
use super::store::VaultStore;
use crate::crypto::{decrypt_str, encrypt_str, VaultKey};
use crate::errors::{Result, ShecretsError};

/// CRUD and flag operations on the entries of an unlocked vault.
pub struct EntryManager<'a> {
    store: &'a VaultStore,
    key: &'a VaultKey,
}

impl<'a> EntryManager<'a> {
    pub fn new(store: &'a VaultStore, key: &'a VaultKey) -> Self {
        Self { store, key }
    }

    /// Create an entry, failing with `DuplicateName` if the exact
    /// (case-sensitive) name is already taken.  Returns the new id.
    pub fn create(&self, name: &str, username: &str, password: &str) -> Result<i64> {
        if self.find(name)?.is_some() {
            return Err(ShecretsError::DuplicateName(name.to_string()));
        }

        let key = self.key.as_bytes();
        let sealed_name = encrypt_str(key, name)?;
        let sealed_username = encrypt_str(key, username)?;
        let sealed_password = encrypt_str(key, password)?;

        let id = self
            .store
            .insert_entry(&sealed_name, &sealed_username, &sealed_password)?;
        info!(id, "created entry");
        Ok(id)
    }

    /// Decrypt every entry, in id order.
    pub fn list(&self) -> Result<Vec<Entry>> {
        self.store
            .list_entries()?
            .iter()
            .map(|row| self.decrypt_row(row))
            .collect()
    }

    /// Decrypt entry `id`, if it exists.
    pub fn get(&self, id: i64) -> Result<Option<Entry>> {
        self.store
            .get_entry(id)?
            .map(|row| self.decrypt_row(&row))
            .transpose()
    }

    /// The first entry whose decrypted name equals `name` exactly.
    pub fn find(&self, name: &str) -> Result<Option<Entry>> {
        Ok(self.list()?.into_iter().find(|e| e.name == name))
    }

    /// Like `find`, but a missing entry is `EntryNotFound`.
    pub fn require(&self, name: &str) -> Result<Entry> {
        self.find(name)?
            .ok_or_else(|| ShecretsError::EntryNotFound(name.to_string()))
    }

    /// Re-encrypt exactly one field of entry `id` under a fresh nonce.
    ///
    /// Renaming onto a name held by another entry is `DuplicateName`.
    pub fn update(&self, id: i64, field: EntryField, new_value: &str) -> Result<()> {
        if field == EntryField::Name {
            if let Some(existing) = self.find(new_value)? {
                if existing.id != id {
                    return Err(ShecretsError::DuplicateName(new_value.to_string()));
                }
            }
        }

        let sealed = encrypt_str(self.key.as_bytes(), new_value)?;
        if !self.store.update_entry_field(id, field, &sealed)? {
            return Err(ShecretsError::EntryNotFound(format!("#{id}")));
        }
        info!(id, field = field.label(), "updated entry");
        Ok(())
    }

    /// Permanently delete entry `id`.
    pub fn remove(&self, id: i64) -> Result<()> {
        if !self.store.remove_entry(id)? {
            return Err(ShecretsError::EntryNotFound(format!("#{id}")));
        }
        info!(id, "removed entry");
        Ok(())
    }

    /// Toggle the confirmation-bypass flag of entry `id`.
    pub fn set_auto_enabled(&self, id: i64, enabled: bool) -> Result<()> {
        if !self.store.set_auto_enabled(id, enabled)? {
            return Err(ShecretsError::EntryNotFound(format!("#{id}")));
        }
        info!(id, enabled, "changed auto mode");
        Ok(())
    }

    // ------------------------------------------------------------------
    // By-name conveniences used by the CLI
    // ------------------------------------------------------------------

    /// Resolve `name` and delete it.
    pub fn remove_by_name(&self, name: &str) -> Result<()> {
        let entry = self.require(name)?;
        self.remove(entry.id)
    }

    /// Resolve `name` and set its auto flag.
    pub fn set_auto_enabled_by_name(&self, name: &str, enabled: bool) -> Result<()> {
        let entry = self.require(name)?;
        self.set_auto_enabled(entry.id, enabled)
    }

    fn decrypt_row(&self, row: &EntryRow) -> Result<Entry> {
        let key = self.key.as_bytes();
        let decrypt_field = |field: EntryField| {
            let sealed = row.field(field);
            decrypt_str(key, &sealed.ciphertext, &sealed.nonce).inspect_err(|_| {
                debug!(id = row.id, field = field.label(), "field failed authentication");
            })
        };

        Ok(Entry {
            id: row.id,
            name: decrypt_field(EntryField::Name)?,
            username: decrypt_field(EntryField::Username)?,
            password: decrypt_field(EntryField::Password)?,
            auto_enabled: row.auto_enabled,
        })
    }
}

//! Metadata and entry types stored inside a vault file.
//!
//! `EntryRow` is what the store persists: three independently sealed
//! fields plus the auto flag.  `Entry` is the decrypted form handed to
//! callers after unlock and never written anywhere.

use std::fmt;

use zeroize::Zeroize;

use crate::crypto::Sealed;

/// The single metadata record of a vault, written once at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultMetadata {
    /// Opaque vault identifier, used as the keychain account name.
    pub uuid: String,

    /// Argon2id salt (32 random bytes).
    pub salt: Vec<u8>,

    /// The verification pair: the marker sealed under the vault key.
    pub verify: Sealed,
}

/// A persisted entry row; every field is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: i64,
    pub name: Sealed,
    pub username: Sealed,
    pub password: Sealed,
    pub auto_enabled: bool,
}

impl EntryRow {
    /// The sealed value of one field.
    pub fn field(&self, field: EntryField) -> &Sealed {
        match field {
            EntryField::Name => &self.name,
            EntryField::Username => &self.username,
            EntryField::Password => &self.password,
        }
    }
}

/// A decrypted entry.  Its plaintext fields are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password: String,
    pub auto_enabled: bool,
}

impl Entry {
    /// The plaintext value of one field.
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Name => &self.name,
            EntryField::Username => &self.username,
            EntryField::Password => &self.password,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auto_enabled", &self.auto_enabled)
            .finish()
    }
}

/// One of the three encrypted fields of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Name,
    Username,
    Password,
}

impl EntryField {
    /// The `(ciphertext, nonce)` column pair backing this field.
    pub(crate) fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Name => ("name", "name_iv"),
            Self::Username => ("username", "username_iv"),
            Self::Password => ("password", "password_iv"),
        }
    }

    /// Human-readable label used in prompts and messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Username => "username",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

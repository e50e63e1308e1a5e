//! Vault module — the encrypted credential file.
//!
//! This module provides:
//! - `VaultMetadata`, `EntryRow`, `Entry` and `EntryField` (`entry`)
//! - SQLite persistence of ciphertext blobs (`store`)
//! - Entry CRUD with field-level encryption (`lifecycle`)
//! - The unlocked `Session` (`session`)
//! - Vault creation (`init`)

pub mod entry;
pub mod init;
pub mod lifecycle;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, EntryField, EntryRow, VaultMetadata};
pub use init::{check_target, has_vault_extension, init_vault, VAULT_EXTENSION};
pub use lifecycle::EntryManager;
pub use session::Session;
pub use store::VaultStore;

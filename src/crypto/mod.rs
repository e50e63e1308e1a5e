//! Cryptographic primitives for Shecrets.
//!
//! This module provides:
//! - AES-256-GCM field encryption and decryption (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - The zeroize-on-drop vault key (`keys`)
//! - Key verification against the stored marker pair (`verify`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod verify;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, decrypt_str, encrypt, encrypt_str, Sealed};
pub use kdf::{derive_key, generate_salt};
pub use keys::VaultKey;
pub use verify::{create_verification, verify_key};

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Shecrets.
#[derive(Debug, Error)]
pub enum ShecretsError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — ciphertext was tampered with or the key is wrong")]
    AuthenticationFailure,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Unlock errors ---
    #[error("Invalid vault file: no metadata found")]
    InvalidVaultFile,

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Passphrases do not match")]
    PassphraseMismatch,

    // --- Vault errors ---
    #[error("File not found: {0}")]
    VaultNotFound(PathBuf),

    #[error("File already exists: {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("File must have a .she extension: {0}")]
    InvalidExtension(PathBuf),

    #[error("Entry \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Entry \"{0}\" not found")]
    EntryNotFound(String),

    #[error("Stored value is not valid UTF-8")]
    InvalidUtf8,

    #[error("Vault store error: {0}")]
    Store(#[from] rusqlite::Error),

    // --- Keychain errors ---
    #[error("Keychain unavailable: {0}")]
    KeychainUnavailable(String),

    // --- Clipboard errors ---
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Shecrets results.
pub type Result<T> = std::result::Result<T, ShecretsError>;

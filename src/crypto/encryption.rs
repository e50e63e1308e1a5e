//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! nonce is returned next to the ciphertext instead of being prepended,
//! because the vault file keeps them in separate columns:
//!
//! ```text
//! ciphertext = [ encrypted bytes | 16-byte auth tag ]
//! nonce      = [ 12 random bytes ]
//! ```

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroize;

use crate::errors::{Result, ShecretsError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// A ciphertext together with the nonce it was sealed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key` under a freshly generated nonce.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| ShecretsError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| ShecretsError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Sealed {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

/// Decrypt and authenticate a ciphertext produced by `encrypt`.
///
/// Any malformed nonce, short ciphertext, wrong key or tag mismatch
/// yields `AuthenticationFailure`; no partial plaintext ever escapes.
pub fn decrypt(key: &[u8], ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(ShecretsError::AuthenticationFailure);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| ShecretsError::AuthenticationFailure)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ShecretsError::AuthenticationFailure)
}

/// Encrypt a UTF-8 string field.
pub fn encrypt_str(key: &[u8], plaintext: &str) -> Result<Sealed> {
    encrypt(key, plaintext.as_bytes())
}

/// Decrypt a field that is expected to hold UTF-8 text.
///
/// On invalid UTF-8 the recovered bytes are wiped before the error is
/// returned.
pub fn decrypt_str(key: &[u8], ciphertext: &[u8], nonce: &[u8]) -> Result<String> {
    let plaintext = decrypt(key, ciphertext, nonce)?;
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        ShecretsError::InvalidUtf8
    })
}

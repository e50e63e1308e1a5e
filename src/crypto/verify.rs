//! Key verification without storing the passphrase.
//!
//! At vault creation a fixed marker is sealed under the derived key and
//! the ciphertext/nonce pair is stored in the metadata row.  A candidate
//! key is correct iff it can open that pair and recover the marker.

use subtle::ConstantTimeEq;

use super::encryption::{decrypt, encrypt, Sealed};
use super::keys::VaultKey;
use crate::errors::Result;

/// Plaintext sealed into every vault's verification pair.
///
/// Existing vault files depend on this exact value.
pub const VERIFY_MARKER: &[u8] = b"shecrets-verify";

/// Seal the marker under `key`, producing the verification pair.
pub fn create_verification(key: &VaultKey) -> Result<Sealed> {
    encrypt(key.as_bytes(), VERIFY_MARKER)
}

/// Check a candidate key against a stored verification pair.
///
/// Any authentication failure or marker mismatch means the key is wrong.
pub fn verify_key(key: &VaultKey, ciphertext: &[u8], nonce: &[u8]) -> bool {
    match decrypt(key.as_bytes(), ciphertext, nonce) {
        Ok(plaintext) => plaintext.as_slice().ct_eq(VERIFY_MARKER).into(),
        Err(_) => false,
    }
}

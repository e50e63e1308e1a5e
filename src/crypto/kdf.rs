//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The cost parameters are fixed for every vault:
//! a vault file does not record them, so changing any of these values
//! would make every existing vault impossible to unlock.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{Result, ShecretsError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Memory cost in KiB (64 MB).
pub const MEMORY_KIB: u32 = 65_536;

/// Number of Argon2 passes.
pub const ITERATIONS: u32 = 3;

/// Parallelism lanes.
pub const PARALLELISM: u32 = 4;

/// Derive the 32-byte vault key from a passphrase and the vault salt.
///
/// The same passphrase + salt always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<VaultKey> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| ShecretsError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| ShecretsError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let vault_key = VaultKey::new(key);
    key.zeroize();
    Ok(vault_key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn rejects_short_salt() {
        // Argon2 requires at least 8 bytes of salt.
        let result = derive_key(b"pass", b"abc");
        assert!(matches!(result, Err(ShecretsError::KeyDerivationFailed(_))));
    }
}

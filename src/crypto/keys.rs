//! In-memory handling of the derived vault key.

use std::fmt;

use zeroize::Zeroize;

/// Length of the vault key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte vault key that zeroes its memory when
/// dropped.
///
/// The key lives only for one unlocked session; nothing ever writes it
/// to disk.
#[derive(Zeroize, PartialEq, Eq)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a new `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

// Never print key material, not even in debug output.
impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_bytes() {
        let key = VaultKey::new([7u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "VaultKey(..)");
    }
}

//! Creating a new vault file.

use std::fs;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

use super::entry::VaultMetadata;
use super::store::VaultStore;
use crate::crypto::{create_verification, derive_key, generate_salt};
use crate::errors::{Result, ShecretsError};

/// File extension every vault is expected to carry.
pub const VAULT_EXTENSION: &str = "she";

/// Create a new vault at `path` protected by `passphrase`.
///
/// Generates a salt and uuid, derives the key, seals the verification
/// marker, writes the schema and the single metadata row, then closes
/// the file.  The key is dropped (and zeroized) before returning.
pub fn init_vault(path: &Path, passphrase: &str, require_extension: bool) -> Result<VaultMetadata> {
    check_target(path, require_extension)?;

    let salt = generate_salt();
    let key = derive_key(passphrase.as_bytes(), &salt)?;
    let verify = create_verification(&key)?;
    drop(key);

    let meta = VaultMetadata {
        uuid: Uuid::new_v4().to_string(),
        salt: salt.to_vec(),
        verify,
    };

    let store = VaultStore::create(path)?;
    let written = store
        .init_schema()
        .and_then(|()| store.insert_metadata(&meta));
    if let Err(e) = written {
        drop(store);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    store.close()?;

    // On Unix, restrict the vault to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    info!(uuid = %meta.uuid, path = %path.display(), "initialized vault");
    Ok(meta)
}

/// Fail if `path` cannot become a new vault: it already exists, or it
/// lacks the `.she` extension while one is required.
pub fn check_target(path: &Path, require_extension: bool) -> Result<()> {
    if path.exists() {
        return Err(ShecretsError::VaultAlreadyExists(path.to_path_buf()));
    }
    if require_extension && !has_vault_extension(path) {
        return Err(ShecretsError::InvalidExtension(path.to_path_buf()));
    }
    Ok(())
}

/// Returns `true` if `path` ends in `.she`.
pub fn has_vault_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == VAULT_EXTENSION)
}

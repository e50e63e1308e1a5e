//! The unlock protocol.
//!
//! ```text
//! Start ──► KeychainLookup ──► Unlocked
//!                │
//!                ▼
//!         PromptPassphrase ──► Unlocked
//!                │
//!                ▼
//!              Failed
//! ```
//!
//! A keychain passphrase that no longer verifies is discarded and the
//! user is prompted instead; it is never a hard failure.  A prompted
//! passphrase that fails verification ends the attempt: there is no
//! automatic retry, callers re-invoke `unlock` if they want one.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::crypto::{derive_key, verify_key, VaultKey};
use crate::errors::{Result, ShecretsError};
use crate::keyring::Keychain;
use crate::prompt::Prompt;
use crate::vault::{Session, VaultMetadata, VaultStore};

/// Text shown when asking for the vault passphrase.
pub const PASSPHRASE_PROMPT: &str = "Passphrase";

/// Text shown when offering to remember a verified passphrase.
pub const KEYCHAIN_OFFER_PROMPT: &str = "Save passphrase to keychain?";

/// Tunables of the protocol.
#[derive(Debug, Clone, Copy)]
pub struct UnlockOptions {
    /// Offer to store a prompted passphrase in the keychain.
    pub offer_keychain_save: bool,
}

impl Default for UnlockOptions {
    fn default() -> Self {
        Self {
            offer_keychain_save: true,
        }
    }
}

/// States of one unlock attempt.
pub enum UnlockState {
    Start,
    KeychainLookup {
        store: VaultStore,
        meta: VaultMetadata,
    },
    PromptPassphrase {
        store: VaultStore,
        meta: VaultMetadata,
    },
    Unlocked(Session),
    Failed(ShecretsError),
}

impl UnlockState {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::KeychainLookup { .. } => "keychain-lookup",
            Self::PromptPassphrase { .. } => "prompt-passphrase",
            Self::Unlocked(_) => "unlocked",
            Self::Failed(_) => "failed",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Unlocked(_) | Self::Failed(_))
    }
}

/// Drives one unlock attempt against a vault file.
pub struct Unlocker<'a> {
    path: PathBuf,
    keychain: &'a dyn Keychain,
    prompt: &'a dyn Prompt,
    options: UnlockOptions,
}

impl<'a> Unlocker<'a> {
    pub fn new(
        path: &Path,
        keychain: &'a dyn Keychain,
        prompt: &'a dyn Prompt,
        options: UnlockOptions,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            keychain,
            prompt,
            options,
        }
    }

    /// Run the state machine to a terminal state.
    pub fn run(&self) -> Result<Session> {
        let mut state = UnlockState::Start;
        while !state.is_terminal() {
            let from = state.name();
            state = self.step(state);
            debug!(from, to = state.name(), "unlock transition");
        }

        match state {
            UnlockState::Unlocked(session) => Ok(session),
            UnlockState::Failed(e) => Err(e),
            other => Err(ShecretsError::CommandFailed(format!(
                "unlock stopped in state {}",
                other.name()
            ))),
        }
    }

    /// Perform a single transition.
    pub fn step(&self, state: UnlockState) -> UnlockState {
        match state {
            UnlockState::Start => self.start(),
            UnlockState::KeychainLookup { store, meta } => self.keychain_lookup(store, meta),
            UnlockState::PromptPassphrase { store, meta } => self.prompt_passphrase(store, meta),
            terminal => terminal,
        }
    }

    fn start(&self) -> UnlockState {
        let store = match VaultStore::open(&self.path) {
            Ok(store) => store,
            Err(e) => return UnlockState::Failed(e),
        };

        match store.get_metadata() {
            Ok(Some(meta)) => UnlockState::KeychainLookup { store, meta },
            Ok(None) => fail(store, ShecretsError::InvalidVaultFile),
            Err(e) => fail(store, e),
        }
    }

    fn keychain_lookup(&self, store: VaultStore, meta: VaultMetadata) -> UnlockState {
        let stored = match self.keychain.get(&meta.uuid) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(uuid = %meta.uuid, error = %e, "keychain lookup failed, prompting instead");
                None
            }
        };

        let Some(passphrase) = stored else {
            debug!(uuid = %meta.uuid, "no keychain entry");
            return UnlockState::PromptPassphrase { store, meta };
        };

        match derive_and_verify(passphrase.as_bytes(), &meta) {
            Ok(Some(key)) => {
                info!(uuid = %meta.uuid, "unlocked from keychain");
                UnlockState::Unlocked(Session::new(store, key, meta.uuid))
            }
            Ok(None) => {
                warn!(uuid = %meta.uuid, "keychain passphrase is stale, prompting instead");
                UnlockState::PromptPassphrase { store, meta }
            }
            Err(e) => fail(store, e),
        }
    }

    fn prompt_passphrase(&self, store: VaultStore, meta: VaultMetadata) -> UnlockState {
        let passphrase = match self.prompt.read_secret(PASSPHRASE_PROMPT) {
            Ok(passphrase) => passphrase,
            Err(e) => return fail(store, e),
        };

        let key = match derive_and_verify(passphrase.as_bytes(), &meta) {
            Ok(Some(key)) => key,
            Ok(None) => return fail(store, ShecretsError::InvalidPassphrase),
            Err(e) => return fail(store, e),
        };
        info!(uuid = %meta.uuid, "unlocked with passphrase");

        // Reached only when the keychain had no valid passphrase.
        if self.options.offer_keychain_save {
            match self.prompt.confirm(KEYCHAIN_OFFER_PROMPT) {
                Ok(true) => {
                    if let Err(e) = self.keychain.set(&meta.uuid, &passphrase) {
                        warn!(uuid = %meta.uuid, error = %e, "could not save passphrase to keychain");
                    }
                }
                Ok(false) => {}
                Err(e) => return fail(store, e),
            }
        }

        UnlockState::Unlocked(Session::new(store, key, meta.uuid))
    }
}

/// Unlock the vault at `path` with the given collaborators.
pub fn unlock(
    path: &Path,
    keychain: &dyn Keychain,
    prompt: &dyn Prompt,
    options: UnlockOptions,
) -> Result<Session> {
    Unlocker::new(path, keychain, prompt, options).run()
}

/// Verify `passphrase` against the vault at `path` and store it in the
/// keychain.  Returns the vault uuid.
pub fn register_keychain(path: &Path, passphrase: &str, keychain: &dyn Keychain) -> Result<String> {
    let meta = read_metadata(path)?;
    if derive_and_verify(passphrase.as_bytes(), &meta)?.is_none() {
        return Err(ShecretsError::InvalidPassphrase);
    }
    keychain.set(&meta.uuid, passphrase)?;
    info!(uuid = %meta.uuid, "passphrase saved to keychain");
    Ok(meta.uuid)
}

/// Best-effort removal of the vault's keychain entry.  Returns the uuid.
pub fn forget_keychain(path: &Path, keychain: &dyn Keychain) -> Result<String> {
    let meta = read_metadata(path)?;
    if let Err(e) = keychain.delete(&meta.uuid) {
        warn!(uuid = %meta.uuid, error = %e, "could not remove keychain entry");
    }
    Ok(meta.uuid)
}

/// Open the vault just long enough to read its metadata.
pub fn read_metadata(path: &Path) -> Result<VaultMetadata> {
    let store = VaultStore::open(path)?;
    let meta = store.get_metadata();
    store.close()?;
    meta?.ok_or(ShecretsError::InvalidVaultFile)
}

/// Derive a key and check it against the verification pair.
fn derive_and_verify(passphrase: &[u8], meta: &VaultMetadata) -> Result<Option<VaultKey>> {
    let key = derive_key(passphrase, &meta.salt)?;
    if verify_key(&key, &meta.verify.ciphertext, &meta.verify.nonce) {
        Ok(Some(key))
    } else {
        Ok(None)
    }
}

/// Release the store and enter `Failed`.
fn fail(store: VaultStore, error: ShecretsError) -> UnlockState {
    if let Err(close_err) = store.close() {
        warn!(error = %close_err, "failed to close vault after unlock error");
    }
    UnlockState::Failed(error)
}

//! Integration tests for the unlock protocol and keychain registration.

use std::fs;

use shecrets::errors::ShecretsError;
use shecrets::keyring::{Keychain, MemoryKeychain};
use shecrets::prompt::ScriptedPrompt;
use shecrets::unlock::{
    forget_keychain, register_keychain, unlock, UnlockOptions, UnlockState, Unlocker,
    KEYCHAIN_OFFER_PROMPT, PASSPHRASE_PROMPT,
};
use shecrets::vault::{init_vault, VaultMetadata};
use tempfile::TempDir;

const PASSPHRASE: &str = "correct-horse";

fn new_vault() -> (TempDir, std::path::PathBuf, VaultMetadata) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.she");
    let meta = init_vault(&path, PASSPHRASE, true).unwrap();
    (dir, path, meta)
}

fn no_offer() -> UnlockOptions {
    UnlockOptions {
        offer_keychain_save: false,
    }
}

// ---------------------------------------------------------------------------
// Keychain path
// ---------------------------------------------------------------------------

#[test]
fn keychain_passphrase_unlocks_without_prompting() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::with_entry(&meta.uuid, PASSPHRASE);
    let prompt = ScriptedPrompt::new();

    let session = unlock(&path, &keychain, &prompt, UnlockOptions::default()).unwrap();
    assert_eq!(session.uuid(), meta.uuid);
    assert!(prompt.asked().is_empty());
    session.close().unwrap();
}

#[test]
fn stale_keychain_entry_falls_back_to_prompt() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::with_entry(&meta.uuid, "old-passphrase");
    let prompt = ScriptedPrompt::new().secret(PASSPHRASE).confirm_with(true);

    let session = unlock(&path, &keychain, &prompt, UnlockOptions::default()).unwrap();
    session.close().unwrap();

    assert_eq!(prompt.asked(), vec![PASSPHRASE_PROMPT, KEYCHAIN_OFFER_PROMPT]);
    assert_eq!(keychain.stored(&meta.uuid).as_deref(), Some(PASSPHRASE));
}

#[test]
fn unavailable_keychain_behaves_like_empty() {
    let (_dir, path, _meta) = new_vault();
    let keychain = MemoryKeychain::unavailable();
    let prompt = ScriptedPrompt::new().secret(PASSPHRASE).confirm_with(true);

    // The failed save is only a warning.
    let session = unlock(&path, &keychain, &prompt, UnlockOptions::default()).unwrap();
    session.close().unwrap();
}

// ---------------------------------------------------------------------------
// Prompt path
// ---------------------------------------------------------------------------

#[test]
fn prompted_passphrase_declined_offer_stores_nothing() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::new();
    let prompt = ScriptedPrompt::new().secret(PASSPHRASE).confirm_with(false);

    let session = unlock(&path, &keychain, &prompt, UnlockOptions::default()).unwrap();
    session.close().unwrap();
    assert!(keychain.stored(&meta.uuid).is_none());
}

#[test]
fn offer_can_be_disabled() {
    let (_dir, path, _meta) = new_vault();
    let keychain = MemoryKeychain::new();
    let prompt = ScriptedPrompt::new().secret(PASSPHRASE);

    let session = unlock(&path, &keychain, &prompt, no_offer()).unwrap();
    session.close().unwrap();
    assert_eq!(prompt.asked(), vec![PASSPHRASE_PROMPT]);
}

#[test]
fn wrong_passphrase_is_rejected_without_retry() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::new();
    let prompt = ScriptedPrompt::new().secret("correct-horsf");

    let result = unlock(&path, &keychain, &prompt, UnlockOptions::default());
    assert!(matches!(result, Err(ShecretsError::InvalidPassphrase)));
    assert_eq!(prompt.asked(), vec![PASSPHRASE_PROMPT]);
    assert!(keychain.stored(&meta.uuid).is_none());
}

// ---------------------------------------------------------------------------
// Bad files
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_vault_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.she");
    let prompt = ScriptedPrompt::new();

    let result = unlock(&path, &MemoryKeychain::new(), &prompt, no_offer());
    assert!(matches!(result, Err(ShecretsError::VaultNotFound(_))));
    assert!(!path.exists());
}

#[test]
fn non_vault_file_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.she");
    fs::write(&path, b"just some text, definitely not sqlite").unwrap();
    let prompt = ScriptedPrompt::new();

    let result = unlock(&path, &MemoryKeychain::new(), &prompt, no_offer());
    assert!(matches!(result, Err(ShecretsError::InvalidVaultFile)));
    assert!(prompt.asked().is_empty());
}

#[test]
fn foreign_sqlite_file_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("other.she");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE notes (body TEXT);").unwrap();
    drop(conn);

    let prompt = ScriptedPrompt::new();
    let result = unlock(&path, &MemoryKeychain::new(), &prompt, no_offer());
    assert!(matches!(result, Err(ShecretsError::InvalidVaultFile)));
}

#[test]
fn corrupt_pages_are_invalid() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::with_entry(&meta.uuid, PASSPHRASE);

    // Keep the 100-byte SQLite header, smash the schema page behind it.
    let mut bytes = fs::read(&path).unwrap();
    let end = bytes.len().min(3100);
    bytes[100..end].fill(0xA5);
    fs::write(&path, &bytes).unwrap();

    let prompt = ScriptedPrompt::new();
    let result = unlock(&path, &keychain, &prompt, no_offer());
    assert!(matches!(result, Err(ShecretsError::InvalidVaultFile)));
    assert!(prompt.asked().is_empty());
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[test]
fn steps_through_expected_states() {
    let (_dir, path, _meta) = new_vault();
    let keychain = MemoryKeychain::new();
    let prompt = ScriptedPrompt::new().secret(PASSPHRASE);
    let unlocker = Unlocker::new(&path, &keychain, &prompt, no_offer());

    let mut names = Vec::new();
    let mut state = UnlockState::Start;
    loop {
        names.push(state.name());
        if matches!(state, UnlockState::Unlocked(_) | UnlockState::Failed(_)) {
            break;
        }
        state = unlocker.step(state);
    }

    assert_eq!(
        names,
        vec!["start", "keychain-lookup", "prompt-passphrase", "unlocked"]
    );
    if let UnlockState::Unlocked(session) = state {
        session.close().unwrap();
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn register_then_forget() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::new();

    let uuid = register_keychain(&path, PASSPHRASE, &keychain).unwrap();
    assert_eq!(uuid, meta.uuid);
    assert_eq!(keychain.stored(&uuid).as_deref(), Some(PASSPHRASE));

    forget_keychain(&path, &keychain).unwrap();
    assert!(keychain.get(&uuid).unwrap().is_none());

    // Forgetting again is harmless.
    forget_keychain(&path, &keychain).unwrap();
}

#[test]
fn register_rejects_wrong_passphrase() {
    let (_dir, path, meta) = new_vault();
    let keychain = MemoryKeychain::new();

    let result = register_keychain(&path, "correct-horsf", &keychain);
    assert!(matches!(result, Err(ShecretsError::InvalidPassphrase)));
    assert!(keychain.stored(&meta.uuid).is_none());
}

#[test]
fn forget_tolerates_unavailable_keychain() {
    let (_dir, path, meta) = new_vault();
    let uuid = forget_keychain(&path, &MemoryKeychain::unavailable()).unwrap();
    assert_eq!(uuid, meta.uuid);
}

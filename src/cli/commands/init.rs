//! `shecrets init` — create a new vault file.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::prompt::read_new_passphrase;
use crate::unlock::KEYCHAIN_OFFER_PROMPT;
use crate::vault::{check_target, init_vault, VaultMetadata};

/// Execute the `init` command.
pub fn execute(ctx: &Context<'_>) -> Result<()> {
    run(ctx)?;
    output::tip("Run `shecrets create <NAME>` to add an entry.");
    Ok(())
}

/// Create the vault, then optionally remember the passphrase.
pub fn run(ctx: &Context<'_>) -> Result<VaultMetadata> {
    // 1. Refuse a bad target before asking for anything.
    check_target(&ctx.path, ctx.settings.require_extension)?;

    // 2. Read the new passphrase twice.
    let passphrase = read_new_passphrase(ctx.prompt)?;

    // 3. Write the vault file.
    let meta = init_vault(&ctx.path, &passphrase, ctx.settings.require_extension)?;
    output::success(&format!("Created {}", ctx.path.display()));

    // 4. Offer the keychain.  A failed save is only a warning.
    if ctx.settings.offer_keychain_save && ctx.prompt.confirm(KEYCHAIN_OFFER_PROMPT)? {
        match ctx.keychain.set(&meta.uuid, &passphrase) {
            Ok(()) => output::success("Passphrase saved to keychain."),
            Err(e) => output::warning(&format!("Could not save passphrase: {e}")),
        }
    }

    Ok(meta)
}

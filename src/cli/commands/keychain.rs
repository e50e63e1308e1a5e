//! `shecrets keychain` — save or remove the vault passphrase in the OS keychain.
//!
//! Once saved, every command unlocks the vault without prompting.  The
//! entry is keyed by the vault's uuid, so moving or renaming the file
//! keeps working.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::unlock::{forget_keychain, register_keychain, PASSPHRASE_PROMPT};

/// Execute the `keychain` command.
pub fn execute(ctx: &Context<'_>, delete: bool) -> Result<()> {
    run(ctx, delete)?;
    if delete {
        output::success("Passphrase removed from keychain.");
    } else {
        output::success("Passphrase saved to keychain. Future unlocks will be automatic.");
    }
    Ok(())
}

/// Returns the vault uuid the keychain entry belongs to.
pub fn run(ctx: &Context<'_>, delete: bool) -> Result<String> {
    if delete {
        return forget_keychain(&ctx.path, ctx.keychain);
    }

    // Explicitly set: always prompt, never reuse what is stored.
    let passphrase = ctx.prompt.read_secret(PASSPHRASE_PROMPT)?;
    register_keychain(&ctx.path, &passphrase, ctx.keychain)
}

//! `shecrets remove` — permanently delete an entry.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `remove` command.
pub fn execute(ctx: &Context<'_>, name: &str) -> Result<()> {
    if run(ctx, name)? {
        output::success(&format!("Removed entry '{name}'"));
    } else {
        output::info("Nothing was removed.");
    }
    Ok(())
}

/// Returns `false` when the user declined.
pub fn run(ctx: &Context<'_>, name: &str) -> Result<bool> {
    ctx.with_session(|session| {
        let entries = session.entries();
        let entry = entries.require(name)?;

        let question = format!("Are you sure you want to remove \"{}\"?", entry.name);
        if !ctx.confirm_unless_auto(&entry, &question)? {
            return Ok(false);
        }

        entries.remove(entry.id)?;
        Ok(true)
    })
}

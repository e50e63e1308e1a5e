//! `shecrets edit` — replace an entry's username or password.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::EntryField;

/// Execute the `edit` command.
pub fn execute(ctx: &Context<'_>, name: &str, field: EntryField) -> Result<()> {
    if run(ctx, name, field)? {
        output::success(&format!("Updated {field} for '{name}'"));
    } else {
        output::info("Nothing was changed.");
    }
    Ok(())
}

/// Returns `false` when the user declined or entered an empty value.
pub fn run(ctx: &Context<'_>, name: &str, field: EntryField) -> Result<bool> {
    ctx.with_session(|session| {
        let entries = session.entries();
        let entry = entries.require(name)?;

        let question = format!(
            "Are you sure you want to edit the {field} for \"{}\"?",
            entry.name
        );
        if !ctx.confirm_unless_auto(&entry, &question)? {
            return Ok(false);
        }

        let value = match field {
            EntryField::Password => ctx.prompt.read_secret("New password")?,
            _ => Zeroizing::new(ctx.prompt.read_line(&format!("New {field}"))?),
        };
        if value.is_empty() {
            return Ok(false);
        }
        entries.update(entry.id, field, &value)?;
        Ok(true)
    })
}

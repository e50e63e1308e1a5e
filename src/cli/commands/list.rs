//! `shecrets list` — print every entry name.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::Entry;

/// Execute the `list` command.
pub fn execute(ctx: &Context<'_>) -> Result<()> {
    let entries = run(ctx)?;
    output::print_entry_names(&entries);
    Ok(())
}

pub fn run(ctx: &Context<'_>) -> Result<Vec<Entry>> {
    ctx.with_session(|session| session.entries().list())
}

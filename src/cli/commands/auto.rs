//! `shecrets auto` — toggle confirmation-free access for an entry.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `auto` command.
pub fn execute(ctx: &Context<'_>, name: &str, enable: bool) -> Result<()> {
    run(ctx, name, enable)?;
    let state = if enable { "enabled" } else { "disabled" };
    output::success(&format!("Auto mode {state} for '{name}'"));
    Ok(())
}

pub fn run(ctx: &Context<'_>, name: &str, enable: bool) -> Result<()> {
    ctx.with_session(|session| session.entries().set_auto_enabled_by_name(name, enable))
}

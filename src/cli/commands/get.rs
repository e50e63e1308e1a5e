//! `shecrets get` — output or copy one field of an entry.
//!
//! `--output` writes the raw value to stdout with no trailing newline, so
//! it can be piped.  `--copy` puts it on the clipboard and schedules a
//! clear.  Both ask for confirmation unless the entry is in auto mode.

use std::io::Write;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::Context;
use crate::clipboard;
use crate::errors::Result;
use crate::vault::EntryField;

/// Where the value should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Clipboard,
}

impl Destination {
    fn verb(self) -> &'static str {
        match self {
            Self::Stdout => "output",
            Self::Clipboard => "copy",
        }
    }
}

/// Result of the protected part of `get`.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The user confirmed (or auto mode skipped the question).
    Value(Zeroizing<String>),
    /// The user declined.
    Declined,
}

/// Execute the `get` command.
pub fn execute(
    ctx: &Context<'_>,
    name: &str,
    field: EntryField,
    destination: Destination,
) -> Result<()> {
    let Outcome::Value(value) = run(ctx, name, field, destination)? else {
        output::info("Nothing was retrieved.");
        return Ok(());
    };

    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(value.as_bytes())?;
            stdout.flush()?;
        }
        Destination::Clipboard => {
            let delay = ctx.settings.clipboard_clear_delay();
            clipboard::copy(&value, delay)?;
            output::success(&format!(
                "Copied {} for '{name}' (clears in {}s)",
                field.label(),
                delay.as_secs()
            ));
        }
    }
    Ok(())
}

/// Unlock, find the entry, confirm, and return the requested value.
pub fn run(
    ctx: &Context<'_>,
    name: &str,
    field: EntryField,
    destination: Destination,
) -> Result<Outcome> {
    ctx.with_session(|session| {
        let entry = session.entries().require(name)?;
        let question = format!(
            "Are you sure you want to {} the {} for \"{}\"?",
            destination.verb(),
            field.label(),
            entry.name
        );
        if !ctx.confirm_unless_auto(&entry, &question)? {
            return Ok(Outcome::Declined);
        }
        Ok(Outcome::Value(Zeroizing::new(entry.field(field).to_string())))
    })
}

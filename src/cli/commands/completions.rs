//! `shecrets completions <SHELL>`: print a completion script to stdout.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    generate(shell, &mut Cli::command(), "shecrets", &mut io::stdout());
    Ok(())
}

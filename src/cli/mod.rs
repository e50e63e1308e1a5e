//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, ValueEnum};
use clap_complete::Shell;

use crate::config::Settings;
use crate::errors::{Result, ShecretsError};
use crate::keyring::{Keychain, OsKeychain};
use crate::prompt::{Prompt, TerminalPrompt};
use crate::unlock::unlock;
use crate::vault::{Entry, EntryField, Session};

/// Shecrets CLI: local encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "shecrets",
    about = "Local encrypted credential vault",
    version
)]
pub struct Cli {
    /// Command to run (opens the interactive browser when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Vault file (.she)
    #[arg(short, long, env = "SHECRETS_FILE", global = true)]
    pub file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault file
    Init,

    /// Save the vault passphrase to the OS keychain (auto-unlock)
    Keychain {
        /// Remove the passphrase from the keychain instead of saving it
        #[arg(long)]
        delete: bool,
    },

    /// Create an entry
    Create {
        /// Entry name
        name: String,
    },

    /// List entry names
    List,

    /// Output or copy an entry's username or password
    #[command(group(ArgGroup::new("mode").required(true).args(["output", "copy"])))]
    Get {
        /// Entry name
        name: String,
        /// Which field to retrieve
        #[arg(long, value_enum, default_value = "password")]
        field: FieldArg,
        /// Write the value to stdout
        #[arg(short = 'O', long)]
        output: bool,
        /// Copy the value to the clipboard (cleared automatically)
        #[arg(short = 'C', long)]
        copy: bool,
    },

    /// Change an entry's username or password
    Edit {
        /// Entry name
        name: String,
        /// Which field to change
        #[arg(long, value_enum)]
        field: FieldArg,
    },

    /// Remove an entry
    Remove {
        /// Entry name
        name: String,
    },

    /// Enable or disable auto mode (skip confirmations) for an entry
    #[command(group(ArgGroup::new("toggle").required(true).args(["enable", "disable"])))]
    Auto {
        /// Entry name
        name: String,
        /// Enable auto mode
        #[arg(long)]
        enable: bool,
        /// Disable auto mode
        #[arg(long)]
        disable: bool,
    },

    /// Browse entries interactively
    Browse,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Internal: clear the clipboard after a delay
    #[command(name = "clear-clipboard", hide = true)]
    ClearClipboard,
}

/// Entry fields that can be retrieved or edited from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Username,
    Password,
}

impl From<FieldArg> for EntryField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Username => EntryField::Username,
            FieldArg::Password => EntryField::Password,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs besides its own arguments.
pub struct Context<'a> {
    pub path: PathBuf,
    pub keychain: &'a dyn Keychain,
    pub prompt: &'a dyn Prompt,
    pub settings: Settings,
}

impl<'a> Context<'a> {
    pub fn new(
        path: &Path,
        keychain: &'a dyn Keychain,
        prompt: &'a dyn Prompt,
        settings: Settings,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            keychain,
            prompt,
            settings,
        }
    }

    /// Run the unlock protocol against this context's vault.
    pub fn unlock(&self) -> Result<Session> {
        unlock(
            &self.path,
            self.keychain,
            self.prompt,
            self.settings.unlock_options(),
        )
    }

    /// Unlock, run `f`, and close the vault on every path.
    pub fn with_session<T>(&self, f: impl FnOnce(&Session) -> Result<T>) -> Result<T> {
        let session = self.unlock()?;
        let result = f(&session);
        let closed = session.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Ask before acting on `entry`, unless it has auto mode enabled.
    pub fn confirm_unless_auto(&self, entry: &Entry, question: &str) -> Result<bool> {
        if entry.auto_enabled {
            return Ok(true);
        }
        self.prompt.confirm(question)
    }
}

/// The vault file from `--file` / `SHECRETS_FILE`.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    cli.file.clone().ok_or_else(|| {
        ShecretsError::CommandFailed("no vault file given, pass --file <FILE.she> or set SHECRETS_FILE".into())
    })
}

/// Build a terminal-backed context for `cli` and run `f` with it.
pub fn with_terminal<T>(cli: &Cli, f: impl FnOnce(&Context<'_>) -> Result<T>) -> Result<T> {
    let path = vault_path(cli)?;
    let settings = Settings::load(&std::env::current_dir()?)?;
    let keychain = OsKeychain;
    let prompt = TerminalPrompt;
    let ctx = Context::new(&path, &keychain, &prompt, settings);
    f(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn get_requires_a_mode() {
        let result = Cli::try_parse_from(["shecrets", "-f", "v.she", "get", "Email"]);
        assert!(result.is_err());
    }

    #[test]
    fn get_defaults_to_password() {
        let cli = Cli::try_parse_from(["shecrets", "-f", "v.she", "get", "Email", "--output"]).unwrap();
        match cli.command {
            Some(Commands::Get { field, output, copy, .. }) => {
                assert_eq!(field, FieldArg::Password);
                assert!(output);
                assert!(!copy);
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn auto_flags_are_exclusive() {
        let result = Cli::try_parse_from([
            "shecrets", "-f", "v.she", "auto", "Email", "--enable", "--disable",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn completions_take_a_known_shell() {
        let cli = Cli::try_parse_from(["shecrets", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));

        let err = Cli::try_parse_from(["shecrets", "completions", "csh"])
            .err()
            .expect("csh is not supported");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_file_is_reported() {
        let cli = Cli::try_parse_from(["shecrets", "list"]).unwrap();
        if std::env::var_os("SHECRETS_FILE").is_none() {
            assert!(vault_path(&cli).is_err());
        }
    }
}

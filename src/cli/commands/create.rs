//! `shecrets create` — add a new entry.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{Result, ShecretsError};

/// Execute the `create` command.
pub fn execute(ctx: &Context<'_>, name: &str) -> Result<()> {
    run(ctx, name)?;
    output::success(&format!("Created entry '{name}'"));
    Ok(())
}

/// Unlock, read username and password, and store the entry.
/// Returns the new entry id.
pub fn run(ctx: &Context<'_>, name: &str) -> Result<i64> {
    ctx.with_session(|session| {
        let entries = session.entries();

        // Fail before asking for anything.
        if entries.find(name)?.is_some() {
            return Err(ShecretsError::DuplicateName(name.to_string()));
        }

        let username = ctx.prompt.read_line("Username")?;
        let password = ctx.prompt.read_secret("Password")?;
        entries.create(name, &username, &password)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::testing::unlocked_vault;
    use crate::config::Settings;
    use crate::prompt::ScriptedPrompt;

    #[test]
    fn create_then_duplicate() {
        let (_dir, path, keychain) = unlocked_vault();

        let prompt = ScriptedPrompt::new().line("me@x.com").secret("p4ss");
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        run(&ctx, "Email").unwrap();
        assert_eq!(prompt.asked(), vec!["Username", "Password"]);

        let prompt = ScriptedPrompt::new();
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        assert!(matches!(
            run(&ctx, "Email"),
            Err(ShecretsError::DuplicateName(_))
        ));
        assert!(prompt.asked().is_empty());
    }
}

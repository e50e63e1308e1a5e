//! `shecrets browse` — interactive entry browser.
//!
//! Renders the current `View`, turns the user's menu choice into an
//! `Event`, performs the side effect that goes with it, and lets
//! `browser::transition` pick the next view.  Runs inside a single
//! session; the vault is closed when the browser quits.

use zeroize::Zeroizing;

use crate::browser::{transition, Event, Reveal, View};
use crate::cli::output;
use crate::cli::Context;
use crate::clipboard;
use crate::errors::{Result, ShecretsError};
use crate::vault::{Entry, EntryField, Session};

/// Execute the `browse` command.
pub fn execute(ctx: &Context<'_>) -> Result<()> {
    ctx.with_session(|session| Browser::new(ctx, session).run())
}

/// Terminal driver over the browser state machine.
pub struct Browser<'a> {
    ctx: &'a Context<'a>,
    session: &'a Session,
}

impl<'a> Browser<'a> {
    pub fn new(ctx: &'a Context<'a>, session: &'a Session) -> Self {
        Self { ctx, session }
    }

    /// Loop until the user quits.
    pub fn run(&self) -> Result<()> {
        let mut view = View::List;
        while view != View::Quit {
            let event = self.screen(&view)?;
            view = transition(&view, event);
        }
        Ok(())
    }

    fn screen(&self, view: &View) -> Result<Event> {
        match view {
            View::List => self.list_screen(),
            View::Create => self.create_screen(),
            View::Detail { id, reveal } => self.detail_screen(*id, *reveal),
            View::Edit { id, field } => self.edit_screen(*id, *field),
            View::ConfirmDelete { id } => self.delete_screen(*id),
            View::Quit => Ok(Event::Quit),
        }
    }

    fn list_screen(&self) -> Result<Event> {
        let entries = self.session.entries().list()?;
        let mut items = output::entry_lines(&entries);
        items.push("+ New entry".to_string());
        items.push("Quit".to_string());

        let choice = self.ctx.prompt.select("Entries", &items)?;
        Ok(match choice {
            Some(i) if i < entries.len() => Event::Select(entries[i].id),
            Some(i) if i == entries.len() => Event::StartCreate,
            _ => Event::Quit,
        })
    }

    fn create_screen(&self) -> Result<Event> {
        let name = self.ctx.prompt.read_line("Name")?;
        if name.is_empty() {
            return Ok(Event::Cancel);
        }
        let username = self.ctx.prompt.read_line("Username")?;
        let password = self.ctx.prompt.read_secret("Password")?;

        match self.session.entries().create(&name, &username, &password) {
            Ok(_) => {
                output::success(&format!("Created entry '{name}'"));
                Ok(Event::Created)
            }
            Err(ShecretsError::DuplicateName(n)) => {
                output::error(&format!("An entry named '{n}' already exists"));
                Ok(Event::Cancel)
            }
            Err(e) => Err(e),
        }
    }

    fn detail_screen(&self, id: i64, reveal: Reveal) -> Result<Event> {
        let Some(entry) = self.session.entries().get(id)? else {
            return Ok(Event::Back);
        };
        eprintln!("{}", output::entry_table(&entry, reveal));

        let actions = detail_actions(&entry, reveal);
        let labels: Vec<String> = actions.iter().map(|(label, _)| label.clone()).collect();
        let Some(i) = self.ctx.prompt.select(&entry.name, &labels)? else {
            return Ok(Event::Back);
        };
        let event = actions[i].1;

        match event {
            Event::Copy(field) => self.copy(&entry, field)?,
            Event::ToggleReveal(field) if !reveal.shows(field) => {
                if !self.confirm_access(&entry, "show", field)? {
                    return Ok(Event::Cancel);
                }
            }
            Event::StartEdit(field) => {
                if !self.confirm_access(&entry, "edit", field)? {
                    return Ok(Event::Cancel);
                }
            }
            Event::ToggleAuto => {
                self.session
                    .entries()
                    .set_auto_enabled(id, !entry.auto_enabled)?;
            }
            _ => {}
        }
        Ok(event)
    }

    /// Ask before touching a plaintext field; auto-mode entries skip it.
    fn confirm_access(&self, entry: &Entry, verb: &str, field: EntryField) -> Result<bool> {
        let question = format!(
            "Are you sure you want to {verb} the {field} for \"{}\"?",
            entry.name
        );
        self.ctx.confirm_unless_auto(entry, &question)
    }

    fn copy(&self, entry: &Entry, field: EntryField) -> Result<()> {
        if !self.confirm_access(entry, "copy", field)? {
            return Ok(());
        }
        let delay = self.ctx.settings.clipboard_clear_delay();
        let value = Zeroizing::new(entry.field(field).to_string());
        clipboard::copy(&value, delay)?;
        output::success(&format!("Copied {field} (clears in {}s)", delay.as_secs()));
        Ok(())
    }

    fn edit_screen(&self, id: i64, field: EntryField) -> Result<Event> {
        let value = match field {
            EntryField::Password => self.ctx.prompt.read_secret("New password")?,
            _ => Zeroizing::new(self.ctx.prompt.read_line(&format!("New {field}"))?),
        };
        if value.is_empty() {
            return Ok(Event::Cancel);
        }
        self.session.entries().update(id, field, &value)?;
        output::success(&format!("Updated {field}"));
        Ok(Event::Edited)
    }

    fn delete_screen(&self, id: i64) -> Result<Event> {
        let Some(entry) = self.session.entries().get(id)? else {
            return Ok(Event::Cancel);
        };
        let question = format!("Are you sure you want to remove \"{}\"?", entry.name);
        let confirmed = self.ctx.prompt.confirm(&question)?;
        if confirmed {
            self.session.entries().remove(id)?;
            output::success(&format!("Removed entry '{}'", entry.name));
        }
        Ok(Event::ConfirmDelete(confirmed))
    }
}

/// Menu shown on the detail screen, in display order.
fn detail_actions(entry: &Entry, reveal: Reveal) -> Vec<(String, Event)> {
    let show = |shown: bool| if shown { "Hide" } else { "Show" };
    vec![
        (
            format!("{} username", show(reveal.username)),
            Event::ToggleReveal(EntryField::Username),
        ),
        (
            format!("{} password", show(reveal.password)),
            Event::ToggleReveal(EntryField::Password),
        ),
        ("Copy username".into(), Event::Copy(EntryField::Username)),
        ("Copy password".into(), Event::Copy(EntryField::Password)),
        ("Edit username".into(), Event::StartEdit(EntryField::Username)),
        ("Edit password".into(), Event::StartEdit(EntryField::Password)),
        (
            if entry.auto_enabled {
                "Disable auto mode".into()
            } else {
                "Enable auto mode".into()
            },
            Event::ToggleAuto,
        ),
        ("Delete".into(), Event::RequestDelete),
        ("Back".into(), Event::Back),
        ("Quit".into(), Event::Quit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::testing::unlocked_vault;
    use crate::config::Settings;
    use crate::prompt::ScriptedPrompt;
    use crate::unlock::unlock;

    const SHOW_PASSWORD: usize = 1;
    const EDIT_PASSWORD: usize = 5;
    const TOGGLE_AUTO: usize = 6;
    const DELETE: usize = 7;
    const BACK: usize = 8;

    #[test]
    fn create_edit_and_delete_through_menus() {
        let (_dir, path, keychain) = unlocked_vault();
        let prompt = ScriptedPrompt::new()
            // List (empty): "+ New entry" is index 0.
            .choose(Some(0))
            .line("Email")
            .line("me@x.com")
            .secret("p4ss")
            // List: select the entry, reveal, edit the password.
            .choose(Some(0))
            .choose(Some(SHOW_PASSWORD))
            .confirm_with(true)
            .choose(Some(EDIT_PASSWORD))
            .confirm_with(true)
            .secret("newp4ss")
            // Back on detail: toggle auto, then delete.
            .choose(Some(TOGGLE_AUTO))
            .choose(Some(DELETE))
            .confirm_with(true)
            // List is empty again; Esc quits.
            .choose(None);
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());

        execute(&ctx).unwrap();

        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        assert!(session.entries().list().unwrap().is_empty());
        session.close().unwrap();
    }

    #[test]
    fn edits_persist_after_quit() {
        let (_dir, path, keychain) = unlocked_vault();
        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        session.entries().create("Email", "me@x.com", "p4ss").unwrap();
        session.close().unwrap();

        let prompt = ScriptedPrompt::new()
            .choose(Some(0))
            .choose(Some(EDIT_PASSWORD))
            .confirm_with(true)
            .secret("newp4ss")
            .choose(Some(TOGGLE_AUTO))
            .choose(Some(BACK))
            // List: entry, "+ New entry", "Quit".
            .choose(Some(2));
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        execute(&ctx).unwrap();

        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        let entry = session.entries().require("Email").unwrap();
        assert_eq!(entry.password, "newp4ss");
        assert!(entry.auto_enabled);
        session.close().unwrap();
    }

    #[test]
    fn declined_show_and_edit_stay_on_detail() {
        let (_dir, path, keychain) = unlocked_vault();
        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        session.entries().create("Email", "me@x.com", "p4ss").unwrap();
        session.close().unwrap();

        let prompt = ScriptedPrompt::new()
            .choose(Some(0))
            .choose(Some(SHOW_PASSWORD))
            .confirm_with(false)
            .choose(Some(EDIT_PASSWORD))
            .confirm_with(false)
            .choose(Some(BACK))
            .choose(Some(2));
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        execute(&ctx).unwrap();

        // No "New password" prompt was shown, and the password is untouched.
        assert!(!prompt.asked().iter().any(|q| q.contains("New password")));
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        assert_eq!(session.entries().require("Email").unwrap().password, "p4ss");
        session.close().unwrap();
    }

    #[test]
    fn auto_entries_show_and_edit_without_asking() {
        let (_dir, path, keychain) = unlocked_vault();
        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        session.entries().create("CI", "bot", "token").unwrap();
        session.entries().set_auto_enabled_by_name("CI", true).unwrap();
        session.close().unwrap();

        // No confirm_with answers are queued; a question would fail the run.
        let prompt = ScriptedPrompt::new()
            .choose(Some(0))
            .choose(Some(SHOW_PASSWORD))
            .choose(Some(SHOW_PASSWORD))
            .choose(Some(EDIT_PASSWORD))
            .secret("rotated")
            .choose(Some(BACK))
            .choose(Some(2));
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        execute(&ctx).unwrap();

        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        assert_eq!(session.entries().require("CI").unwrap().password, "rotated");
        session.close().unwrap();
    }

    #[test]
    fn empty_edit_keeps_old_value() {
        let (_dir, path, keychain) = unlocked_vault();
        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        session.entries().create("Email", "me@x.com", "p4ss").unwrap();
        session.close().unwrap();

        let prompt = ScriptedPrompt::new()
            .choose(Some(0))
            .choose(Some(EDIT_PASSWORD))
            .confirm_with(true)
            .secret("")
            .choose(Some(BACK))
            .choose(Some(2));
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        execute(&ctx).unwrap();

        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        assert_eq!(session.entries().require("Email").unwrap().password, "p4ss");
        session.close().unwrap();
    }

    #[test]
    fn duplicate_create_returns_to_list() {
        let (_dir, path, keychain) = unlocked_vault();
        let none = ScriptedPrompt::new();
        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        session.entries().create("Email", "me@x.com", "p4ss").unwrap();
        session.close().unwrap();

        let prompt = ScriptedPrompt::new()
            .choose(Some(1))
            .line("Email")
            .line("other")
            .secret("other")
            .choose(None);
        let ctx = Context::new(&path, &keychain, &prompt, Settings::default());
        execute(&ctx).unwrap();

        let session = unlock(&path, &keychain, &none, Default::default()).unwrap();
        assert_eq!(session.entries().list().unwrap().len(), 1);
        session.close().unwrap();
    }

    #[test]
    fn actions_reflect_state() {
        let entry = Entry {
            id: 1,
            name: "Email".into(),
            username: "me".into(),
            password: "p".into(),
            auto_enabled: true,
        };
        let revealed = Reveal {
            username: false,
            password: true,
        };
        let actions = detail_actions(&entry, revealed);
        assert_eq!(actions[SHOW_PASSWORD].0, "Hide password");
        assert_eq!(actions[TOGGLE_AUTO].0, "Disable auto mode");
        assert_eq!(actions[BACK].1, Event::Back);
    }
}

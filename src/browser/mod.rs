//! State machine of the interactive entry browser.
//!
//! Every screen is a `View` variant and every user action an `Event`.
//! `transition` is the only place views change; the terminal driver in
//! `cli::commands::browse` renders the current view, turns input into an
//! event, performs any side effect, and asks for the next view.
//!
//! Events that make no sense in the current view leave it unchanged.

use crate::vault::EntryField;

/// Which plaintext fields are currently shown on the detail screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    pub username: bool,
    pub password: bool,
}

impl Reveal {
    /// Whether `field` is currently shown in plaintext.
    pub fn shows(self, field: EntryField) -> bool {
        match field {
            EntryField::Username => self.username,
            EntryField::Password => self.password,
            EntryField::Name => true,
        }
    }

    fn toggled(self, field: EntryField) -> Self {
        match field {
            EntryField::Username => Self {
                username: !self.username,
                ..self
            },
            EntryField::Password => Self {
                password: !self.password,
                ..self
            },
            EntryField::Name => self,
        }
    }
}

/// A browser screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// All entries.
    List,
    /// One entry, by id.
    Detail { id: i64, reveal: Reveal },
    /// Waiting for a yes/no before deleting `id`.
    ConfirmDelete { id: i64 },
    /// Reading a new value for one field of `id`.
    Edit { id: i64, field: EntryField },
    /// Reading name/username/password for a new entry.
    Create,
    /// Terminal: the browser is closing.
    Quit,
}

/// A user action (or the completion of one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select(i64),
    Back,
    StartCreate,
    Created,
    ToggleReveal(EntryField),
    Copy(EntryField),
    StartEdit(EntryField),
    Edited,
    ToggleAuto,
    RequestDelete,
    ConfirmDelete(bool),
    Cancel,
    Quit,
}

/// Compute the view that follows `view` when `event` happens.
pub fn transition(view: &View, event: Event) -> View {
    match (view, event) {
        (View::Quit, _) => View::Quit,
        (_, Event::Quit) => View::Quit,

        (View::List, Event::Select(id)) => View::Detail {
            id,
            reveal: Reveal::default(),
        },
        (View::List, Event::StartCreate) => View::Create,

        (View::Create, Event::Created | Event::Cancel | Event::Back) => View::List,

        (View::Detail { .. }, Event::Back) => View::List,
        (View::Detail { id, reveal }, Event::ToggleReveal(field)) => View::Detail {
            id: *id,
            reveal: reveal.toggled(field),
        },
        // Copy and auto toggling stay on the same screen.
        (View::Detail { .. }, Event::Copy(_) | Event::ToggleAuto) => view.clone(),
        (View::Detail { id, .. }, Event::StartEdit(field)) if field != EntryField::Name => {
            View::Edit { id: *id, field }
        }
        (View::Detail { id, .. }, Event::RequestDelete) => View::ConfirmDelete { id: *id },

        (View::Edit { id, .. }, Event::Edited | Event::Cancel) => View::Detail {
            id: *id,
            reveal: Reveal::default(),
        },

        (View::ConfirmDelete { .. }, Event::ConfirmDelete(true)) => View::List,
        (View::ConfirmDelete { id }, Event::ConfirmDelete(false) | Event::Cancel) => {
            View::Detail {
                id: *id,
                reveal: Reveal::default(),
            }
        }

        _ => view.clone(),
    }
}

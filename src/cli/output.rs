//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Status messages go to
//! stderr so stdout carries only data (entry names, output values).

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::browser::Reveal;
use crate::vault::Entry;

/// Placeholder shown for hidden values.
const MASK: &str = "••••••••";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// One line per entry, in id order, auto-enabled entries tagged.
pub fn entry_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            if e.auto_enabled {
                format!("{} [auto]", e.name)
            } else {
                e.name.clone()
            }
        })
        .collect()
}

/// Print entry names to stdout.
pub fn print_entry_names(entries: &[Entry]) {
    if entries.is_empty() {
        info("No entries.");
        tip("Run `shecrets create <NAME>` to add your first entry.");
        return;
    }

    for line in entry_lines(entries) {
        println!("{line}");
    }
}

/// Render one entry as a two-column table, masking hidden fields.
pub fn entry_table(entry: &Entry, reveal: Reveal) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let shown = |visible: bool, value: &str| {
        if visible {
            value.to_string()
        } else {
            MASK.to_string()
        }
    };

    table.add_row(vec!["Name".to_string(), entry.name.clone()]);
    table.add_row(vec![
        "Username".to_string(),
        shown(reveal.username, &entry.username),
    ]);
    table.add_row(vec![
        "Password".to_string(),
        shown(reveal.password, &entry.password),
    ]);
    table.add_row(vec![
        "Auto mode".to_string(),
        if entry.auto_enabled { "on" } else { "off" }.to_string(),
    ]);

    table
}

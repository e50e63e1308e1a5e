//! Clipboard copy with delayed auto-clear.
//!
//! `copy` spawns a detached copy of the current executable running the
//! hidden `clear-clipboard` subcommand.  That helper receives a JSON
//! request on stdin, sleeps, and clears the clipboard only if it still
//! holds the value we put there.
//!
//! On Linux the X11/Wayland selection is served by whichever process set
//! it and disappears when that process drops its `Clipboard`, so there
//! the helper also sets the value and keeps serving it until the clear.
//! It reports `ready` on stdout once it owns the selection.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::errors::{Result, ShecretsError};

/// Name of the hidden subcommand that performs the delayed clear.
pub const CLEAR_SUBCOMMAND: &str = "clear-clipboard";

/// Line the helper prints once it owns the selection.
const READY: &str = "ready";

/// What the clear helper reads from stdin.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearRequest {
    /// The value we copied; anything else in the clipboard is left alone.
    pub expected: String,
    /// Delay in milliseconds.
    pub delay: u64,
    /// The helper sets `expected` itself and serves it until the clear.
    #[serde(default)]
    pub own_selection: bool,
}

/// Copy `text` to the clipboard and schedule it to be cleared after
/// `delay`.
pub fn copy(text: &str, delay: Duration) -> Result<()> {
    if cfg!(target_os = "linux") {
        let mut child = spawn_helper(text, delay, true)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShecretsError::Clipboard("clipboard helper has no stdout".into()))?;
        return wait_ready(BufReader::new(stdout));
    }

    let mut clipboard = open()?;
    clipboard.set_text(text.to_string()).map_err(clip_err)?;
    if let Err(e) = spawn_helper(text, delay, false) {
        warn!(error = %e, "could not schedule clipboard clear");
    }
    Ok(())
}

fn spawn_helper(expected: &str, delay: Duration, own_selection: bool) -> Result<Child> {
    let exe = std::env::current_exe()?;
    let request = ClearRequest {
        expected: expected.to_string(),
        delay: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        own_selection,
    };
    let payload = Zeroizing::new(
        serde_json::to_vec(&request).map_err(|e| ShecretsError::Clipboard(e.to_string()))?,
    );
    drop(Zeroizing::new(request.expected));

    let mut cmd = Command::new(exe);
    cmd.arg(CLEAR_SUBCOMMAND)
        .stdin(Stdio::piped())
        .stdout(if own_selection { Stdio::piped() } else { Stdio::null() })
        .stderr(Stdio::null());

    detach(&mut cmd);

    let mut child = cmd.spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&payload)?;
    }
    debug!(
        pid = child.id(),
        delay_ms = request.delay,
        own_selection,
        "scheduled clipboard clear"
    );
    Ok(child)
}

/// Leave the terminal's process group so Ctrl-C on the parent does not
/// take the helper down with it.
fn detach(cmd: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    let _ = cmd;
}

/// Block until the helper confirms it owns the selection.
fn wait_ready(mut output: impl BufRead) -> Result<()> {
    let mut line = String::new();
    output.read_line(&mut line)?;
    if line.trim_end() == READY {
        Ok(())
    } else {
        Err(ShecretsError::Clipboard(
            "clipboard helper could not take the selection".into(),
        ))
    }
}

/// Entry point of the hidden helper: read a `ClearRequest` from `input`,
/// take the selection if asked to, wait, then clear the clipboard if it
/// is unchanged.
pub fn run_clear_helper(mut input: impl Read, mut output: impl Write) -> Result<()> {
    let mut raw = Zeroizing::new(Vec::new());
    input.read_to_end(&mut raw)?;
    let request: ClearRequest = serde_json::from_slice(&raw)
        .map_err(|e| ShecretsError::Clipboard(format!("bad clear request: {e}")))?;
    let expected = Zeroizing::new(request.expected);

    // Held for the whole delay: on Linux dropping it drops the selection.
    let mut clipboard = open()?;
    if request.own_selection {
        set_owned(&mut clipboard, &expected)?;
        writeln!(output, "{READY}")?;
        output.flush()?;
    }
    drop(output);

    thread::sleep(Duration::from_millis(request.delay));

    let current = Zeroizing::new(clipboard.get_text().unwrap_or_default());
    if should_clear(&current, &expected) {
        clipboard.set_text(String::new()).map_err(clip_err)?;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn set_owned(clipboard: &mut Clipboard, text: &str) -> Result<()> {
    use arboard::SetExtLinux;
    clipboard
        .set()
        .exclude_from_history()
        .text(text.to_string())
        .map_err(clip_err)
}

#[cfg(not(target_os = "linux"))]
fn set_owned(clipboard: &mut Clipboard, text: &str) -> Result<()> {
    clipboard.set_text(text.to_string()).map_err(clip_err)
}

fn open() -> Result<Clipboard> {
    Clipboard::new().map_err(clip_err)
}

fn clip_err(e: arboard::Error) -> ShecretsError {
    ShecretsError::Clipboard(e.to_string())
}

/// Only clear what we copied ourselves.
fn should_clear(current: &str, expected: &str) -> bool {
    current == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_json_shape() {
        let json = serde_json::to_string(&ClearRequest {
            expected: "p4ss".into(),
            delay: 45_000,
            own_selection: true,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"expected":"p4ss","delay":45000,"own_selection":true}"#
        );
    }

    #[test]
    fn helper_does_not_own_by_default() {
        let request: ClearRequest =
            serde_json::from_str(r#"{"expected":"p4ss","delay":10}"#).unwrap();
        assert!(!request.own_selection);
    }

    #[test]
    fn copy_waits_for_helper_to_own_selection() {
        wait_ready(&b"ready\n"[..]).unwrap();

        // Helper exited (or failed to set) before saying it was ready.
        assert!(matches!(wait_ready(&b""[..]), Err(ShecretsError::Clipboard(_))));
        assert!(matches!(
            wait_ready(&b"something else\n"[..]),
            Err(ShecretsError::Clipboard(_))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn helper_leads_its_own_process_group() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo $$ $(cut -d' ' -f5 /proc/$$/stat)"]);
        detach(&mut cmd);
        let out = cmd.output().unwrap();
        let text = String::from_utf8(out.stdout).unwrap();
        let ids: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1], "pid and process group differ");
    }

    #[test]
    fn leaves_foreign_contents_alone() {
        assert!(should_clear("p4ss", "p4ss"));
        assert!(!should_clear("something the user copied", "p4ss"));
    }

    #[test]
    fn helper_rejects_garbage() {
        let result = run_clear_helper(&b"not json"[..], Vec::new());
        assert!(matches!(result, Err(ShecretsError::Clipboard(_))));
    }
}

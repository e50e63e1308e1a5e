//! Interactive input collaborator.
//!
//! The vault engine never talks to the terminal directly; it asks a
//! `Prompt`.  `TerminalPrompt` is the real implementation (stderr-based
//! `dialoguer` widgets), `ScriptedPrompt` replays canned answers.

use std::cell::RefCell;
use std::collections::VecDeque;

use dialoguer::{Confirm, Input, Password, Select};
use zeroize::Zeroizing;

use crate::errors::{Result, ShecretsError};

/// Blocking user input.
pub trait Prompt {
    /// Read a secret without echoing it.
    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Read one line of visible text.
    fn read_line(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question (default: no).
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Pick one of `items`.  `None` means the user backed out.
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>> {
        let secret = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| ShecretsError::CommandFailed(format!("passphrase prompt: {e}")))?;
        Ok(Zeroizing::new(secret))
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ShecretsError::CommandFailed(format!("input prompt: {e}")))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| ShecretsError::CommandFailed(format!("confirm prompt: {e}")))
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|e| ShecretsError::CommandFailed(format!("menu: {e}")))
    }
}

/// Replays pre-recorded answers and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    secrets: RefCell<VecDeque<String>>,
    lines: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    choices: RefCell<VecDeque<Option<usize>>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `read_secret`.
    pub fn secret(self, answer: &str) -> Self {
        self.secrets.borrow_mut().push_back(answer.to_string());
        self
    }

    /// Queue an answer for the next `read_line`.
    pub fn line(self, answer: &str) -> Self {
        self.lines.borrow_mut().push_back(answer.to_string());
        self
    }

    /// Queue an answer for the next `confirm`.
    pub fn confirm_with(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    /// Queue an answer for the next `select`.
    pub fn choose(self, answer: Option<usize>) -> Self {
        self.choices.borrow_mut().push_back(answer);
        self
    }

    /// Every prompt text shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn record(&self, prompt: &str) {
        self.asked.borrow_mut().push(prompt.to_string());
    }
}

fn exhausted(prompt: &str) -> ShecretsError {
    ShecretsError::CommandFailed(format!("no scripted answer for prompt '{prompt}'"))
}

impl Prompt for ScriptedPrompt {
    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>> {
        self.record(prompt);
        self.secrets
            .borrow_mut()
            .pop_front()
            .map(Zeroizing::new)
            .ok_or_else(|| exhausted(prompt))
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        self.record(prompt);
        self.lines
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted(prompt))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.record(prompt);
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted(prompt))
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.record(prompt);
        let choice = self
            .choices
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| exhausted(prompt))?;
        match choice {
            Some(i) if i >= items.len() => Err(ShecretsError::CommandFailed(format!(
                "scripted choice {i} out of range for '{prompt}'"
            ))),
            other => Ok(other),
        }
    }
}

/// Read a new passphrase twice and require both readings to match.
pub fn read_new_passphrase(prompt: &dyn Prompt) -> Result<Zeroizing<String>> {
    let first = prompt.read_secret("New passphrase")?;
    let second = prompt.read_secret("Confirm passphrase")?;
    if *first != *second {
        return Err(ShecretsError::PassphraseMismatch);
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompt_replays_in_order() {
        let prompt = ScriptedPrompt::new().line("a").line("b").confirm_with(true);
        assert_eq!(prompt.read_line("1").unwrap(), "a");
        assert_eq!(prompt.read_line("2").unwrap(), "b");
        assert!(prompt.confirm("3").unwrap());
        assert_eq!(prompt.asked(), vec!["1", "2", "3"]);
    }

    #[test]
    fn scripted_prompt_errors_when_exhausted() {
        let prompt = ScriptedPrompt::new();
        assert!(prompt.read_secret("Passphrase").is_err());
    }

    #[test]
    fn new_passphrase_must_match() {
        let prompt = ScriptedPrompt::new().secret("one").secret("two");
        assert!(matches!(
            read_new_passphrase(&prompt),
            Err(ShecretsError::PassphraseMismatch)
        ));

        let prompt = ScriptedPrompt::new().secret("same").secret("same");
        assert_eq!(read_new_passphrase(&prompt).unwrap().as_str(), "same");
    }
}

pub mod browser;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod keyring;
pub mod logging;
pub mod prompt;
pub mod unlock;
pub mod vault;

//! One module per subcommand.

pub mod auto;
pub mod browse;
pub mod completions;
pub mod create;
pub mod edit;
pub mod get;
pub mod init;
pub mod keychain;
pub mod list;
pub mod remove;

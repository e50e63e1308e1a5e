//! Configuration loaded from `.shecrets.toml`.

pub mod settings;

pub use settings::Settings;

//! # scirius-cli
//!
//! The `scirius-admin` management utility: commands that drive the console
//! forms of [`scirius_rules`] against the configured record store.
//!
//! ## Quick Start
//!
//! ```rust
//! use scirius_cli::command::CommandRegistry;
//! use scirius_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"createruleset"));
//! assert!(names.contains(&"addsource"));
//! ```

// - result_large_err: SciriusError is the crate-wide error type
// - doc_markdown: command names in docs are not code items
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]

pub mod command;
pub mod commands;
pub mod files;

pub use command::{CommandContext, CommandRegistry, ManagementCommand};
pub use files::RuleFileStorage;

use scirius_core::{settings_loader, SciriusResult, Settings};

/// Builds a registry holding every built-in command.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    commands::register_builtin_commands(&mut registry);
    registry
}

/// Loads settings from the `--settings` file when given, otherwise from
/// the defaults; `SCIRIUS_*` environment variables apply in both cases.
pub fn load_settings(matches: &clap::ArgMatches) -> SciriusResult<Settings> {
    let path = matches.get_one::<String>("settings").or_else(|| {
        matches
            .subcommand()
            .and_then(|(_, sub)| sub.try_get_one::<String>("settings").ok().flatten())
    });
    match path {
        Some(path) => settings_loader::from_file_with_env(path),
        None => Ok(settings_loader::from_env()),
    }
}

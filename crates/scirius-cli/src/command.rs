//! Management command framework for scirius-admin.
//!
//! This module provides the [`ManagementCommand`] trait for defining CLI
//! commands and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use scirius_cli::command::{CommandContext, ManagementCommand};
//! use scirius_core::SciriusResult;
//!
//! struct CountCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for CountCommand {
//!     fn name(&self) -> &str { "count" }
//!     fn help(&self) -> &str { "Count rulesets" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         ctx: &CommandContext,
//!     ) -> SciriusResult<()> {
//!         println!("{}", ctx.store.rulesets().await?.len());
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scirius_core::{SciriusError, SciriusResult, Settings};
use scirius_db::RuleStore;
use tracing::Instrument;

/// What a command runs against: the loaded settings and the opened store.
#[derive(Clone)]
pub struct CommandContext {
    /// The console settings.
    pub settings: Settings,
    /// The record store named by `settings.database`.
    pub store: Arc<dyn RuleStore>,
}

impl CommandContext {
    /// Creates a context from settings and an already opened store.
    pub fn new(settings: Settings, store: Arc<dyn RuleStore>) -> Self {
        Self { settings, store }
    }

    /// Opens the store described by `settings.database`.
    pub fn open(settings: Settings) -> SciriusResult<Self> {
        let store = scirius_db::open_store(&settings.database)?;
        Ok(Self::new(settings, store))
    }
}

/// A management command that can be registered and invoked through the CLI.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches.
    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()>;
}

/// A registry of management commands, dispatched by subcommand name.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a management command, replacing one of the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    /// Returns the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with one subcommand per
    /// registered command and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("scirius-admin")
            .about("scirius-rs rule management utility")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("FILE")
                    .help("Settings file (TOML or JSON); SCIRIUS_* variables still apply"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| (*name).clone());

        for (name, cmd) in entries {
            // clap wants `&'static str` names; commands are registered once at startup.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Runs the command named by the subcommand in `matches`.
    pub async fn execute(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            SciriusError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            SciriusError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "Running management command");
        cmd.handle(sub_matches, ctx)
            .instrument(scirius_core::logging::operation_span(name))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirius_db::MemoryStore;

    struct TestCommand {
        cmd_name: String,
    }

    impl TestCommand {
        fn new(name: &str) -> Self {
            Self {
                cmd_name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl ManagementCommand for TestCommand {
        fn name(&self) -> &str {
            &self.cmd_name
        }

        fn help(&self) -> &'static str {
            "A test command"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(
                clap::Arg::new("verbose")
                    .long("verbose")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _ctx: &CommandContext) -> SciriusResult<()> {
            Ok(())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl ManagementCommand for FailingCommand {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn help(&self) -> &'static str {
            "A command that always fails"
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _ctx: &CommandContext) -> SciriusResult<()> {
            Err(SciriusError::ConfigurationError("deliberate failure".to_string()))
        }
    }

    fn context() -> CommandContext {
        CommandContext::new(Settings::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("test")));
        let cmd = registry.get("test").unwrap();
        assert_eq!(cmd.name(), "test");
        assert_eq!(cmd.help(), "A test command");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_list_commands_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("zebra")));
        registry.register(Box::new(TestCommand::new("alpha")));
        registry.register(Box::new(TestCommand::new("alpha")));
        assert_eq!(registry.list_commands(), vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_build_cli_with_global_settings() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("test")));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["scirius-admin", "test", "--verbose", "--settings", "s.toml"])
            .unwrap();
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(sub_matches.get_one::<String>("settings").unwrap(), "s.toml");
        assert_eq!(name, "test");
        assert!(sub_matches.get_flag("verbose"));
    }

    #[test]
    fn test_subcommand_required() {
        let registry = CommandRegistry::new();
        assert!(registry.build_cli().try_get_matches_from(["scirius-admin"]).is_err());
    }

    #[tokio::test]
    async fn test_execute() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("test")));
        registry.register(Box::new(FailingCommand));
        let ctx = context();

        let ok = registry.build_cli().try_get_matches_from(["scirius-admin", "test"]).unwrap();
        assert!(registry.execute(&ok, &ctx).await.is_ok());

        let fail = registry.build_cli().try_get_matches_from(["scirius-admin", "fail"]).unwrap();
        assert!(registry.execute(&fail, &ctx).await.is_err());
    }
}

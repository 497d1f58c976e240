//! The `copyruleset` management command.

use async_trait::async_trait;
use scirius_core::SciriusResult;
use scirius_forms::FormData;
use scirius_rules::RulesetCopyForm;

use super::submit;
use crate::command::{CommandContext, ManagementCommand};

/// Copies a ruleset under a new name.
pub struct CopyrulesetCommand;

#[async_trait]
impl ManagementCommand for CopyrulesetCommand {
    fn name(&self) -> &'static str {
        "copyruleset"
    }

    fn help(&self) -> &'static str {
        "Copy a ruleset under a new name"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("ruleset")
                .required(true)
                .value_name("RULESET_ID")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            clap::Arg::new("name")
                .long("name")
                .required(true)
                .help("Name of the copy"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let id = matches.get_one::<i64>("ruleset").copied().unwrap_or_default();
        let mut data = FormData::new();
        if let Some(name) = matches.get_one::<String>("name") {
            data.set("name", name.as_str());
        }

        let mut form = RulesetCopyForm::new();
        submit(&mut form, &data).await?;
        let copy = form.copy(store, id).await?;
        println!("Copied ruleset {id} to '{}' (id {})", copy.name, copy.id);
        Ok(())
    }
}

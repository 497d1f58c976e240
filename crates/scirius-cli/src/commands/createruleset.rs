//! The `createruleset` management command.

use async_trait::async_trait;
use scirius_core::SciriusResult;
use scirius_forms::FormData;
use scirius_rules::RulesetForm;

use super::{set_checkbox, submit};
use crate::command::{CommandContext, ManagementCommand};

/// Creates a ruleset from source snapshots.
///
/// Every category of the selected sources is activated unless
/// `--no-activate-categories` is given.
pub struct CreaterulesetCommand;

#[async_trait]
impl ManagementCommand for CreaterulesetCommand {
    fn name(&self) -> &'static str {
        "createruleset"
    }

    fn help(&self) -> &'static str {
        "Create a ruleset from source snapshots"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("name")
                .long("name")
                .required(true)
                .help("Unique ruleset name"),
        )
        .arg(
            clap::Arg::new("source")
                .long("source")
                .value_name("ID")
                .value_parser(clap::value_parser!(i64))
                .action(clap::ArgAction::Append)
                .help("Source snapshot id to include (repeatable)"),
        )
        .arg(
            clap::Arg::new("no_activate_categories")
                .long("no-activate-categories")
                .action(clap::ArgAction::SetTrue)
                .help("Attach the sources without their categories"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let mut data = FormData::new();
        if let Some(name) = matches.get_one::<String>("name") {
            data.set("name", name.as_str());
        }
        for id in matches.get_many::<i64>("source").into_iter().flatten() {
            data.append("sources", id.to_string());
        }
        set_checkbox(
            &mut data,
            "activate_categories",
            !matches.get_flag("no_activate_categories"),
        );

        let mut form = RulesetForm::new(store).await?;
        submit(&mut form, &data).await?;
        let ruleset = form.create_ruleset(store).await?;

        let sources = store.ruleset_sources(ruleset.id).await?;
        let categories = store.ruleset_categories(ruleset.id).await?;
        println!(
            "Created ruleset '{}' (id {}) with {} source(s) and {} categories",
            ruleset.name,
            ruleset.id,
            sources.len(),
            categories.len()
        );
        Ok(())
    }
}

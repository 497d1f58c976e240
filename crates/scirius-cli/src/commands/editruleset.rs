//! The `editruleset` management command.

use async_trait::async_trait;
use scirius_core::SciriusResult;
use scirius_rules::RulesetEditForm;

use super::{initial_data, replace_list, submit};
use crate::command::{CommandContext, ManagementCommand};

/// Renames a ruleset or replaces its categories.
///
/// Whatever is not given on the command line keeps its current value.
pub struct EditrulesetCommand;

#[async_trait]
impl ManagementCommand for EditrulesetCommand {
    fn name(&self) -> &'static str {
        "editruleset"
    }

    fn help(&self) -> &'static str {
        "Rename a ruleset or replace its categories"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("ruleset")
                .required(true)
                .value_name("RULESET_ID")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(clap::Arg::new("name").long("name").help("New ruleset name"))
        .arg(
            clap::Arg::new("category")
                .long("category")
                .value_name("ID")
                .value_parser(clap::value_parser!(i64))
                .action(clap::ArgAction::Append)
                .help("Category id to keep active (repeatable)"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let id = matches.get_one::<i64>("ruleset").copied().unwrap_or_default();
        let ruleset = store.ruleset(id).await?;

        let mut form = RulesetEditForm::for_ruleset(store, &ruleset).await?;
        let mut data = initial_data(&form);
        if let Some(name) = matches.get_one::<String>("name") {
            data.set("name", name.as_str());
        }
        replace_list(
            &mut data,
            "categories",
            matches
                .get_many::<i64>("category")
                .into_iter()
                .flatten()
                .map(ToString::to_string),
        );

        submit(&mut form, &data).await?;
        let edited = form.apply(store, ruleset.id).await?;
        println!(
            "Updated ruleset '{}' (id {}) with {} categories",
            edited.name,
            edited.id,
            store.ruleset_categories(edited.id).await?.len()
        );
        Ok(())
    }
}

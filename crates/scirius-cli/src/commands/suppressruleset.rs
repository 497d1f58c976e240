//! The `suppressruleset` management command.

use async_trait::async_trait;
use scirius_core::SciriusResult;
use scirius_forms::FormData;
use scirius_rules::RulesetSuppressForm;

use super::submit;
use crate::command::{CommandContext, ManagementCommand};

/// Deletes a ruleset.
pub struct SuppressrulesetCommand;

#[async_trait]
impl ManagementCommand for SuppressrulesetCommand {
    fn name(&self) -> &'static str {
        "suppressruleset"
    }

    fn help(&self) -> &'static str {
        "Delete a ruleset"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("ruleset")
                .required(true)
                .value_name("RULESET_ID")
                .value_parser(clap::value_parser!(i64)),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let mut data = FormData::new();
        if let Some(id) = matches.get_one::<i64>("ruleset") {
            data.set("ruleset", id.to_string());
        }

        let mut form = RulesetSuppressForm::new(store).await?;
        submit(&mut form, &data).await?;
        let removed = form.suppress(store).await?;
        println!("Deleted ruleset '{}' (id {})", removed.name, removed.id);
        Ok(())
    }
}

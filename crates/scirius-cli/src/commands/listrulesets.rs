//! The `listrulesets` management command.

use async_trait::async_trait;
use serde::Serialize;

use scirius_core::{SciriusError, SciriusResult};
use scirius_db::RuleStore;

use crate::command::{CommandContext, ManagementCommand};

/// Lists rulesets with their associations.
pub struct ListrulesetsCommand;

/// One line of the `listrulesets` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RulesetSummary {
    pub id: i64,
    pub name: String,
    /// Source snapshot ids.
    pub sources: Vec<i64>,
    /// Category ids.
    pub categories: Vec<i64>,
}

/// Collects a summary of every ruleset, ordered by id.
pub async fn summarize_rulesets(store: &dyn RuleStore) -> SciriusResult<Vec<RulesetSummary>> {
    let mut summaries = Vec::new();
    for ruleset in store.rulesets().await? {
        summaries.push(RulesetSummary {
            sources: store.ruleset_sources(ruleset.id).await?,
            categories: store.ruleset_categories(ruleset.id).await?,
            id: ruleset.id,
            name: ruleset.name,
        });
    }
    Ok(summaries)
}

#[async_trait]
impl ManagementCommand for ListrulesetsCommand {
    fn name(&self) -> &'static str {
        "listrulesets"
    }

    fn help(&self) -> &'static str {
        "List rulesets with their sources and categories"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print JSON instead of a table"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let summaries = summarize_rulesets(ctx.store.as_ref()).await?;

        if matches.get_flag("json") {
            let rendered = serde_json::to_string_pretty(&summaries)
                .map_err(|e| SciriusError::SerializationError(e.to_string()))?;
            println!("{rendered}");
            return Ok(());
        }

        if summaries.is_empty() {
            println!("No rulesets.");
        }
        for s in &summaries {
            println!(
                "{:>4}  {:<32} {} source(s), {} categories",
                s.id,
                s.name,
                s.sources.len(),
                s.categories.len()
            );
        }
        Ok(())
    }
}

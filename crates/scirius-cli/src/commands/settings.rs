//! The `settings` management command.
//!
//! Shows or changes the system settings. Options that are not given keep
//! their stored value.

use async_trait::async_trait;
use scirius_core::{SciriusError, SciriusResult};
use scirius_rules::SystemSettingsForm;

use super::{initial_data, set_checkbox, submit};
use crate::command::{CommandContext, ManagementCommand};

/// Shows or edits the system settings.
pub struct SettingsCommand;

#[async_trait]
impl ManagementCommand for SettingsCommand {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn help(&self) -> &'static str {
        "Show or change the system settings"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("use_http_proxy")
                .long("use-http-proxy")
                .value_name("BOOL")
                .value_parser(clap::value_parser!(bool))
                .help("Download sources through a proxy"),
        )
        .arg(
            clap::Arg::new("http_proxy")
                .long("http-proxy")
                .value_name("URL")
                .help("Proxy for HTTP downloads (empty to clear)"),
        )
        .arg(
            clap::Arg::new("https_proxy")
                .long("https-proxy")
                .value_name("URL")
                .help("Proxy for HTTPS downloads (empty to clear)"),
        )
        .arg(
            clap::Arg::new("use_elasticsearch")
                .long("use-elasticsearch")
                .value_name("BOOL")
                .value_parser(clap::value_parser!(bool))
                .help("Query Elasticsearch for rule hits"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let mut form = SystemSettingsForm::load(store).await?;
        let mut data = initial_data(&form);
        let mut changed = false;

        for key in ["use_http_proxy", "use_elasticsearch"] {
            if let Some(checked) = matches.get_one::<bool>(key) {
                set_checkbox(&mut data, key, *checked);
                changed = true;
            }
        }
        for key in ["http_proxy", "https_proxy"] {
            if let Some(value) = matches.get_one::<String>(key) {
                data.set(key, value.as_str());
                changed = true;
            }
        }

        let settings = if changed {
            submit(&mut form, &data).await?;
            form.save(store).await?
        } else {
            store.system_settings().await?
        };

        let rendered = serde_json::to_string_pretty(&settings)
            .map_err(|e| SciriusError::SerializationError(e.to_string()))?;
        println!("{rendered}");
        Ok(())
    }
}

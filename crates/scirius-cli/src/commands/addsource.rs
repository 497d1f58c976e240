//! The `addsource` management command.
//!
//! Adds a rule source with its `HEAD` snapshot, optionally attaching it to
//! existing rulesets. A rules file given with `--file` is uploaded with the
//! form and stored under `rules_dir`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scirius_core::SciriusResult;
use scirius_forms::{FormData, UploadedFile};
use scirius_rules::AddSourceForm;

use super::{set_checkbox, submit};
use crate::command::{CommandContext, ManagementCommand};
use crate::files::RuleFileStorage;

/// Adds a rule source.
pub struct AddsourceCommand;

/// Reads a file from disk as if it had been uploaded under its file name.
pub async fn read_upload(path: &Path) -> SciriusResult<UploadedFile> {
    let content = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedFile::new(name, content))
}

/// Builds the submission for [`AddSourceForm`] from the command arguments.
pub async fn source_data(matches: &clap::ArgMatches) -> SciriusResult<FormData> {
    let mut data = FormData::new();
    for key in ["name", "method", "datatype", "uri", "authkey"] {
        if let Some(value) = matches.get_one::<String>(key) {
            data.set(key, value.as_str());
        }
    }
    set_checkbox(&mut data, "cert_verif", !matches.get_flag("no_cert_verif"));
    if let Some(ids) = matches.get_many::<i64>("ruleset") {
        for id in ids {
            data.append("rulesets", id.to_string());
        }
    }
    if let Some(path) = matches.get_one::<PathBuf>("file") {
        data.add_file("file", read_upload(path).await?);
    }
    Ok(data)
}

#[async_trait]
impl ManagementCommand for AddsourceCommand {
    fn name(&self) -> &'static str {
        "addsource"
    }

    fn help(&self) -> &'static str {
        "Add a rule source"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("name")
                .long("name")
                .required(true)
                .help("Unique source name"),
        )
        .arg(
            clap::Arg::new("method")
                .long("method")
                .default_value("http")
                .help("How rules are obtained: http or local"),
        )
        .arg(
            clap::Arg::new("datatype")
                .long("datatype")
                .default_value("sigs")
                .help("Content type: sigs, sig or other"),
        )
        .arg(clap::Arg::new("uri").long("uri").help("Download URL"))
        .arg(
            clap::Arg::new("authkey")
                .long("authkey")
                .help("Optional authorization key"),
        )
        .arg(
            clap::Arg::new("no_cert_verif")
                .long("no-cert-verif")
                .action(clap::ArgAction::SetTrue)
                .help("Do not check TLS certificates"),
        )
        .arg(
            clap::Arg::new("file")
                .long("file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Rules file to upload"),
        )
        .arg(
            clap::Arg::new("ruleset")
                .long("ruleset")
                .value_name("ID")
                .value_parser(clap::value_parser!(i64))
                .action(clap::ArgAction::Append)
                .help("Attach the source to this ruleset (repeatable)"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> SciriusResult<()> {
        let store = ctx.store.as_ref();
        let mut form = AddSourceForm::new(store).await?;
        submit(&mut form, &source_data(matches).await?).await?;
        let added = form.save(store).await?;

        // The file is stored after the records; a failed write leaves the
        // source in place without its file.
        let stored = match form.uploaded_file() {
            Some(file) => Some(
                RuleFileStorage::new(&ctx.settings.rules_dir)
                    .save(added.source.id, file)
                    .await?,
            ),
            None => None,
        };

        println!(
            "Added source '{}' (id {}), snapshot {}",
            added.source.name, added.source.id, added.version.id
        );
        for ruleset_id in &added.rulesets {
            println!("  attached to ruleset {ruleset_id}");
        }
        if let Some(path) = stored {
            println!("  stored {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandRegistry;

    fn matches(args: &[&str]) -> clap::ArgMatches {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(AddsourceCommand));
        let argv = ["scirius-admin", "addsource"].into_iter().chain(args.iter().copied());
        let matches = registry.build_cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("addsource").unwrap().clone()
    }

    #[tokio::test]
    async fn test_read_upload_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.rules");
        std::fs::write(&path, "alert ip any any -> any any (sid:1;)\n").unwrap();
        let file = read_upload(&path).await.unwrap();
        assert_eq!(file.name, "local.rules");
        assert_eq!(file.size, 37);
    }

    #[tokio::test]
    async fn test_source_data_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.rules");
        let err = source_data(&matches(&["--name", "x", "--file", missing.to_str().unwrap()]))
            .await
            .unwrap_err();
        assert!(matches!(err, scirius_core::SciriusError::IoError(_)));
    }
}

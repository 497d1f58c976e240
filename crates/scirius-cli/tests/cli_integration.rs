//! End-to-end tests of the management commands against a SQLite store in a
//! temporary directory.

use chrono::Utc;
use tempfile::TempDir;

use scirius_cli::commands::listrulesets::summarize_rulesets;
use scirius_cli::{builtin_registry, load_settings, CommandContext};
use scirius_core::{DatabaseSettings, SciriusError, SciriusResult, Settings, StoreEngine};
use scirius_db::NewCategory;

fn settings_in(dir: &TempDir) -> Settings {
    Settings {
        debug: true,
        log_level: "warn".to_string(),
        database: DatabaseSettings {
            engine: StoreEngine::Sqlite,
            name: dir.path().join("db.sqlite3").to_string_lossy().into_owned(),
        },
        rules_dir: dir.path().join("rules"),
    }
}

async fn run(ctx: &CommandContext, args: &[&str]) -> SciriusResult<()> {
    let registry = builtin_registry();
    let argv = std::iter::once("scirius-admin").chain(args.iter().copied());
    let matches = registry
        .build_cli()
        .try_get_matches_from(argv)
        .map_err(|e| SciriusError::ConfigurationError(e.to_string()))?;
    registry.execute(&matches, ctx).await
}

async fn add_category(ctx: &CommandContext, source: i64, name: &str) -> i64 {
    ctx.store
        .create_category(NewCategory {
            name: name.into(),
            filename: format!("{name}.rules"),
            descr: String::new(),
            created_date: Utc::now(),
            source,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_ruleset_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CommandContext::open(settings_in(&dir)).unwrap();

    run(&ctx, &["addsource", "--name", "et", "--uri", "https://rules.example.org/et.tar.gz"])
        .await
        .unwrap();
    let source = ctx.store.sources().await.unwrap().remove(0);
    let version = ctx.store.source_versions().await.unwrap().remove(0);
    let scan = add_category(&ctx, source.id, "scan").await;
    let dos = add_category(&ctx, source.id, "dos").await;

    let sid = version.id.to_string();
    run(&ctx, &["createruleset", "--name", "prod", "--source", &sid])
        .await
        .unwrap();
    run(&ctx, &["createruleset", "--name", "lean", "--source", &sid, "--no-activate-categories"])
        .await
        .unwrap();

    let summaries = summarize_rulesets(ctx.store.as_ref()).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "prod");
    assert_eq!(summaries[0].sources, vec![version.id]);
    assert_eq!(summaries[0].categories, vec![scan, dos]);
    assert!(summaries[1].categories.is_empty());

    let prod = summaries[0].id.to_string();
    run(&ctx, &["editruleset", &prod, "--category", &dos.to_string()])
        .await
        .unwrap();
    let edited = ctx.store.ruleset(summaries[0].id).await.unwrap();
    assert_eq!(edited.name, "prod");
    assert_eq!(ctx.store.ruleset_categories(edited.id).await.unwrap(), vec![dos]);

    run(&ctx, &["copyruleset", &prod, "--name", "staging"]).await.unwrap();
    run(&ctx, &["suppressruleset", &prod]).await.unwrap();
    run(&ctx, &["listrulesets", "--json"]).await.unwrap();

    let names: Vec<String> = ctx
        .store
        .rulesets()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["lean", "staging"]);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ctx = CommandContext::open(settings_in(&dir)).unwrap();
        run(&ctx, &["settings", "--use-http-proxy", "true", "--http-proxy", "http://proxy:3128"])
            .await
            .unwrap();
    }
    let ctx = CommandContext::open(settings_in(&dir)).unwrap();
    let settings = ctx.store.system_settings().await.unwrap();
    assert!(settings.use_http_proxy);
    assert_eq!(settings.http_proxy, "http://proxy:3128");
    assert!(settings.use_elasticsearch);

    run(&ctx, &["settings", "--use-elasticsearch", "false"]).await.unwrap();
    let settings = ctx.store.system_settings().await.unwrap();
    assert!(!settings.use_elasticsearch);
    assert_eq!(settings.http_proxy, "http://proxy:3128");
}

#[tokio::test]
async fn test_addsource_stores_uploaded_file() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CommandContext::open(settings_in(&dir)).unwrap();
    run(&ctx, &["createruleset", "--name", "empty"]).await.unwrap_err();
    ctx.store
        .create_ruleset(scirius_db::NewRuleset::named("target", Utc::now()))
        .await
        .unwrap();

    let rules = dir.path().join("local.rules");
    std::fs::write(&rules, "alert ip any any -> any any (sid:1;)\n").unwrap();
    run(
        &ctx,
        &[
            "addsource",
            "--name",
            "local",
            "--method",
            "local",
            "--datatype",
            "sig",
            "--file",
            rules.to_str().unwrap(),
            "--ruleset",
            "1",
        ],
    )
    .await
    .unwrap();

    let source = ctx.store.sources().await.unwrap().remove(0);
    let stored = dir
        .path()
        .join("rules")
        .join(source.id.to_string())
        .join("local.rules");
    assert_eq!(
        std::fs::read_to_string(stored).unwrap(),
        "alert ip any any -> any any (sid:1;)\n"
    );
    assert_eq!(ctx.store.ruleset_sources(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_input_reports_field_errors() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CommandContext::open(settings_in(&dir)).unwrap();
    let long_key = "k".repeat(101);
    let err = run(&ctx, &["addsource", "--name", "et", "--authkey", &long_key])
        .await
        .unwrap_err();
    match err {
        SciriusError::ValidationError(err) => {
            assert_eq!(
                err.messages_for("authkey"),
                vec!["Ensure this value has at most 100 characters (it has 101)."]
            );
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(ctx.store.sources().await.unwrap().is_empty());

    let err = run(&ctx, &["suppressruleset", "42"]).await.unwrap_err();
    assert!(matches!(err, SciriusError::ValidationError(_)));
}

#[test]
fn test_load_settings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scirius.toml");
    std::fs::write(
        &path,
        "debug = false\n[database]\nengine = \"memory\"\nname = \"unused\"\n",
    )
    .unwrap();
    let matches = builtin_registry()
        .build_cli()
        .try_get_matches_from(["scirius-admin", "listrulesets", "--settings", path.to_str().unwrap()])
        .unwrap();
    let settings = load_settings(&matches).unwrap();
    assert_eq!(settings.database.engine, StoreEngine::Memory);
}

//! Behaviour every `RuleStore` implementation must share.

use chrono::Utc;
use scirius_core::SciriusError;
use scirius_db::{
    ContentType, FetchMethod, MemoryStore, NewCategory, NewRuleset, NewSource,
    NewSourceAtVersion, RuleStore, SqliteStore,
};

fn stores() -> Vec<(&'static str, Box<dyn RuleStore>)> {
    vec![
        ("memory", Box::new(MemoryStore::new())),
        ("sqlite", Box::new(SqliteStore::memory().unwrap())),
    ]
}

fn http_source(name: &str) -> NewSource {
    let now = Utc::now();
    NewSource {
        name: name.to_string(),
        created_date: now,
        updated_date: now,
        method: FetchMethod::Http,
        datatype: ContentType::Sigs,
        uri: Some("https://rules.example.org/open.tar.gz".to_string()),
        cert_verif: true,
        authkey: None,
    }
}

fn category(name: &str, source: i64) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        filename: format!("{name}.rules"),
        descr: String::new(),
        created_date: Utc::now(),
        source,
    }
}

#[tokio::test]
async fn lists_are_ordered_by_primary_key() {
    for (label, store) in stores() {
        for name in ["zeta", "alpha", "mid"] {
            store
                .create_ruleset(NewRuleset::named(name, Utc::now()))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .rulesets()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"], "{label}");
    }
}

#[tokio::test]
async fn associations_have_set_semantics() {
    for (label, store) in stores() {
        let src = store.create_source(http_source("et")).await.unwrap();
        let sav = store
            .create_source_version(NewSourceAtVersion::head(src.id, Utc::now()))
            .await
            .unwrap();
        let cat = store.create_category(category("scan", src.id)).await.unwrap();
        let rs = store
            .create_ruleset(NewRuleset::named("prod", Utc::now()))
            .await
            .unwrap();

        for _ in 0..2 {
            store.add_ruleset_source(rs.id, sav.id).await.unwrap();
            store.add_ruleset_category(rs.id, cat.id).await.unwrap();
        }
        assert_eq!(store.ruleset_sources(rs.id).await.unwrap(), vec![sav.id], "{label}");
        assert_eq!(store.ruleset_categories(rs.id).await.unwrap(), vec![cat.id], "{label}");
    }
}

#[tokio::test]
async fn set_categories_replaces_and_dedupes() {
    for (label, store) in stores() {
        let src = store.create_source(http_source("et")).await.unwrap();
        let a = store.create_category(category("a", src.id)).await.unwrap();
        let b = store.create_category(category("b", src.id)).await.unwrap();
        let c = store.create_category(category("c", src.id)).await.unwrap();
        let rs = store
            .create_ruleset(NewRuleset::named("prod", Utc::now()))
            .await
            .unwrap();
        store.add_ruleset_category(rs.id, a.id).await.unwrap();

        store
            .set_ruleset_categories(rs.id, &[c.id, b.id, c.id])
            .await
            .unwrap();
        assert_eq!(
            store.ruleset_categories(rs.id).await.unwrap(),
            vec![b.id, c.id],
            "{label}"
        );

        let err = store.set_ruleset_categories(rs.id, &[999]).await.unwrap_err();
        assert!(matches!(err, SciriusError::DoesNotExist(_)), "{label}");
        assert_eq!(
            store.ruleset_categories(rs.id).await.unwrap(),
            vec![b.id, c.id],
            "{label}: failed replace must leave the set untouched"
        );
    }
}

#[tokio::test]
async fn delete_removes_ruleset_and_its_associations() {
    for (label, store) in stores() {
        let src = store.create_source(http_source("et")).await.unwrap();
        let sav = store
            .create_source_version(NewSourceAtVersion::head(src.id, Utc::now()))
            .await
            .unwrap();
        let keep = store
            .create_ruleset(NewRuleset::named("keep", Utc::now()))
            .await
            .unwrap();
        let gone = store
            .create_ruleset(NewRuleset::named("gone", Utc::now()))
            .await
            .unwrap();
        store.add_ruleset_source(keep.id, sav.id).await.unwrap();
        store.add_ruleset_source(gone.id, sav.id).await.unwrap();

        store.delete_ruleset(gone.id).await.unwrap();

        assert!(matches!(
            store.ruleset(gone.id).await,
            Err(SciriusError::DoesNotExist(_))
        ));
        assert_eq!(store.rulesets().await.unwrap().len(), 1, "{label}");
        assert_eq!(store.ruleset_sources(keep.id).await.unwrap(), vec![sav.id]);
        assert_eq!(store.source_versions().await.unwrap().len(), 1, "{label}");
    }
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    for (label, store) in stores() {
        let rs = store
            .create_ruleset(NewRuleset::named("prod", Utc::now()))
            .await
            .unwrap();
        assert!(
            matches!(
                store.add_ruleset_source(rs.id, 42).await,
                Err(SciriusError::DoesNotExist(_))
            ),
            "{label}"
        );
        assert!(
            matches!(
                store
                    .create_source_version(NewSourceAtVersion::head(42, Utc::now()))
                    .await,
                Err(SciriusError::DoesNotExist(_))
            ),
            "{label}"
        );
    }
}

#[tokio::test]
async fn update_source_keeps_identity() {
    for (label, store) in stores() {
        let mut src = store.create_source(http_source("et")).await.unwrap();
        store.create_source(http_source("other")).await.unwrap();

        src.cert_verif = false;
        src.authkey = Some("secret".into());
        store.update_source(&src).await.unwrap();
        assert_eq!(store.source(src.id).await.unwrap(), src, "{label}");

        src.name = "other".into();
        assert!(
            matches!(
                store.update_source(&src).await,
                Err(SciriusError::IntegrityError(_))
            ),
            "{label}"
        );
    }
}

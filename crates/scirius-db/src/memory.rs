//! In-memory record store.
//!
//! [`MemoryStore`] keeps every table in a `BTreeMap` behind a single
//! `tokio::sync::RwLock`. It enforces the same constraints as the SQLite
//! store (unique source and ruleset names, existing foreign keys) so tests
//! written against it hold for both.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scirius_core::{SciriusError, SciriusResult};

use crate::models::{
    Category, NewCategory, NewRuleset, NewSource, NewSourceAtVersion, Ruleset, Source,
    SourceAtVersion, SystemSettings,
};
use crate::store::RuleStore;

#[derive(Debug, Default)]
struct Tables {
    settings: Option<SystemSettings>,
    sources: BTreeMap<i64, Source>,
    categories: BTreeMap<i64, Category>,
    versions: BTreeMap<i64, SourceAtVersion>,
    rulesets: BTreeMap<i64, Ruleset>,
    // (ruleset_id, version_id) / (ruleset_id, category_id)
    ruleset_sources: BTreeSet<(i64, i64)>,
    ruleset_categories: BTreeSet<(i64, i64)>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn require_source(&self, id: i64) -> SciriusResult<()> {
        if self.sources.contains_key(&id) {
            Ok(())
        } else {
            Err(SciriusError::DoesNotExist(format!("source {id}")))
        }
    }

    fn require_ruleset(&self, id: i64) -> SciriusResult<()> {
        if self.rulesets.contains_key(&id) {
            Ok(())
        } else {
            Err(SciriusError::DoesNotExist(format!("ruleset {id}")))
        }
    }
}

/// A process-local store. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn associated(set: &BTreeSet<(i64, i64)>, ruleset_id: i64) -> Vec<i64> {
    set.range((ruleset_id, i64::MIN)..=(ruleset_id, i64::MAX))
        .map(|(_, other)| *other)
        .collect()
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn system_settings(&self) -> SciriusResult<SystemSettings> {
        Ok(self.tables.read().await.settings.clone().unwrap_or_default())
    }

    async fn save_system_settings(&self, settings: &SystemSettings) -> SciriusResult<()> {
        self.tables.write().await.settings = Some(settings.clone());
        Ok(())
    }

    async fn sources(&self) -> SciriusResult<Vec<Source>> {
        Ok(self.tables.read().await.sources.values().cloned().collect())
    }

    async fn source(&self, id: i64) -> SciriusResult<Source> {
        self.tables
            .read()
            .await
            .sources
            .get(&id)
            .cloned()
            .ok_or_else(|| SciriusError::DoesNotExist(format!("source {id}")))
    }

    async fn create_source(&self, source: NewSource) -> SciriusResult<Source> {
        let mut tables = self.tables.write().await;
        if tables.sources.values().any(|s| s.name == source.name) {
            return Err(SciriusError::IntegrityError(format!(
                "source name '{}' already exists",
                source.name
            )));
        }
        let id = tables.next_id();
        let stored = source.with_id(id);
        tables.sources.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_source(&self, source: &Source) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_source(source.id)?;
        if tables
            .sources
            .values()
            .any(|s| s.id != source.id && s.name == source.name)
        {
            return Err(SciriusError::IntegrityError(format!(
                "source name '{}' already exists",
                source.name
            )));
        }
        tables.sources.insert(source.id, source.clone());
        Ok(())
    }

    async fn categories(&self) -> SciriusResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn categories_for_source(&self, source_id: i64) -> SciriusResult<Vec<Category>> {
        Ok(self
            .tables
            .read()
            .await
            .categories
            .values()
            .filter(|c| c.source == source_id)
            .cloned()
            .collect())
    }

    async fn create_category(&self, category: NewCategory) -> SciriusResult<Category> {
        let mut tables = self.tables.write().await;
        tables.require_source(category.source)?;
        let id = tables.next_id();
        let stored = category.with_id(id);
        tables.categories.insert(id, stored.clone());
        Ok(stored)
    }

    async fn source_versions(&self) -> SciriusResult<Vec<SourceAtVersion>> {
        Ok(self.tables.read().await.versions.values().cloned().collect())
    }

    async fn source_version(&self, id: i64) -> SciriusResult<SourceAtVersion> {
        self.tables
            .read()
            .await
            .versions
            .get(&id)
            .cloned()
            .ok_or_else(|| SciriusError::DoesNotExist(format!("source version {id}")))
    }

    async fn create_source_version(
        &self,
        version: NewSourceAtVersion,
    ) -> SciriusResult<SourceAtVersion> {
        let mut tables = self.tables.write().await;
        tables.require_source(version.source)?;
        let id = tables.next_id();
        let stored = version.with_id(id);
        tables.versions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn rulesets(&self) -> SciriusResult<Vec<Ruleset>> {
        Ok(self.tables.read().await.rulesets.values().cloned().collect())
    }

    async fn ruleset(&self, id: i64) -> SciriusResult<Ruleset> {
        self.tables
            .read()
            .await
            .rulesets
            .get(&id)
            .cloned()
            .ok_or_else(|| SciriusError::DoesNotExist(format!("ruleset {id}")))
    }

    async fn create_ruleset(&self, ruleset: NewRuleset) -> SciriusResult<Ruleset> {
        let mut tables = self.tables.write().await;
        if tables.rulesets.values().any(|r| r.name == ruleset.name) {
            return Err(SciriusError::IntegrityError(format!(
                "ruleset name '{}' already exists",
                ruleset.name
            )));
        }
        let id = tables.next_id();
        let stored = ruleset.with_id(id);
        tables.rulesets.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_ruleset(&self, ruleset: &Ruleset) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_ruleset(ruleset.id)?;
        if tables
            .rulesets
            .values()
            .any(|r| r.id != ruleset.id && r.name == ruleset.name)
        {
            return Err(SciriusError::IntegrityError(format!(
                "ruleset name '{}' already exists",
                ruleset.name
            )));
        }
        tables.rulesets.insert(ruleset.id, ruleset.clone());
        Ok(())
    }

    async fn delete_ruleset(&self, id: i64) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        if tables.rulesets.remove(&id).is_none() {
            return Err(SciriusError::DoesNotExist(format!("ruleset {id}")));
        }
        tables.ruleset_sources.retain(|(r, _)| *r != id);
        tables.ruleset_categories.retain(|(r, _)| *r != id);
        Ok(())
    }

    async fn add_ruleset_source(&self, ruleset_id: i64, version_id: i64) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_ruleset(ruleset_id)?;
        if !tables.versions.contains_key(&version_id) {
            return Err(SciriusError::DoesNotExist(format!(
                "source version {version_id}"
            )));
        }
        tables.ruleset_sources.insert((ruleset_id, version_id));
        Ok(())
    }

    async fn add_ruleset_category(
        &self,
        ruleset_id: i64,
        category_id: i64,
    ) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_ruleset(ruleset_id)?;
        if !tables.categories.contains_key(&category_id) {
            return Err(SciriusError::DoesNotExist(format!("category {category_id}")));
        }
        tables.ruleset_categories.insert((ruleset_id, category_id));
        Ok(())
    }

    async fn set_ruleset_categories(
        &self,
        ruleset_id: i64,
        category_ids: &[i64],
    ) -> SciriusResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_ruleset(ruleset_id)?;
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !tables.categories.contains_key(*id))
        {
            return Err(SciriusError::DoesNotExist(format!("category {missing}")));
        }
        tables.ruleset_categories.retain(|(r, _)| *r != ruleset_id);
        for id in category_ids {
            tables.ruleset_categories.insert((ruleset_id, *id));
        }
        Ok(())
    }

    async fn ruleset_sources(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>> {
        let tables = self.tables.read().await;
        tables.require_ruleset(ruleset_id)?;
        Ok(associated(&tables.ruleset_sources, ruleset_id))
    }

    async fn ruleset_categories(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>> {
        let tables = self.tables.read().await;
        tables.require_ruleset(ruleset_id)?;
        Ok(associated(&tables.ruleset_categories, ruleset_id))
    }
}

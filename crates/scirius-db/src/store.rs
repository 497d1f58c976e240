//! The record store trait.
//!
//! [`RuleStore`] is the boundary between the console forms and whatever
//! persists the records. Forms read the live row set of a record type to
//! populate their choice fields and issue ordered writes; atomicity and
//! isolation are whatever the implementation provides.
//!
//! Association methods have set semantics: adding an association that
//! already exists is a no-op, so callers never produce duplicates.
//!
//! Listing methods return records ordered by primary key.

use async_trait::async_trait;
use scirius_core::SciriusResult;

use crate::models::{
    Category, NewCategory, NewRuleset, NewSource, NewSourceAtVersion, Ruleset, Source,
    SourceAtVersion, SystemSettings,
};

/// Async access to the rule management records.
#[async_trait]
pub trait RuleStore: Send + Sync {
    // ── System settings ──────────────────────────────────────────────

    /// Returns the settings singleton, or the defaults if it was never saved.
    async fn system_settings(&self) -> SciriusResult<SystemSettings>;

    /// Stores the settings singleton.
    async fn save_system_settings(&self, settings: &SystemSettings) -> SciriusResult<()>;

    // ── Sources ──────────────────────────────────────────────────────

    /// Returns all sources.
    async fn sources(&self) -> SciriusResult<Vec<Source>>;

    /// Returns the source with the given id.
    async fn source(&self, id: i64) -> SciriusResult<Source>;

    /// Stores a new source. Fails with `IntegrityError` on a duplicate name.
    async fn create_source(&self, source: NewSource) -> SciriusResult<Source>;

    /// Overwrites every field of an existing source.
    async fn update_source(&self, source: &Source) -> SciriusResult<()>;

    // ── Categories ───────────────────────────────────────────────────

    /// Returns all categories.
    async fn categories(&self) -> SciriusResult<Vec<Category>>;

    /// Returns the categories belonging to `source_id`.
    async fn categories_for_source(&self, source_id: i64) -> SciriusResult<Vec<Category>>;

    /// Stores a new category. Fails with `DoesNotExist` for an unknown source.
    async fn create_category(&self, category: NewCategory) -> SciriusResult<Category>;

    // ── Source snapshots ─────────────────────────────────────────────

    /// Returns all source snapshots.
    async fn source_versions(&self) -> SciriusResult<Vec<SourceAtVersion>>;

    /// Returns the source snapshot with the given id.
    async fn source_version(&self, id: i64) -> SciriusResult<SourceAtVersion>;

    /// Stores a new snapshot. Fails with `DoesNotExist` for an unknown source.
    async fn create_source_version(
        &self,
        version: NewSourceAtVersion,
    ) -> SciriusResult<SourceAtVersion>;

    // ── Rulesets ─────────────────────────────────────────────────────

    /// Returns all rulesets.
    async fn rulesets(&self) -> SciriusResult<Vec<Ruleset>>;

    /// Returns the ruleset with the given id.
    async fn ruleset(&self, id: i64) -> SciriusResult<Ruleset>;

    /// Stores a new, empty ruleset. Fails with `IntegrityError` on a duplicate name.
    async fn create_ruleset(&self, ruleset: NewRuleset) -> SciriusResult<Ruleset>;

    /// Overwrites the scalar fields of an existing ruleset.
    async fn update_ruleset(&self, ruleset: &Ruleset) -> SciriusResult<()>;

    /// Deletes a ruleset together with its associations.
    async fn delete_ruleset(&self, id: i64) -> SciriusResult<()>;

    // ── Ruleset associations ─────────────────────────────────────────

    /// Associates a source snapshot with a ruleset.
    async fn add_ruleset_source(&self, ruleset_id: i64, version_id: i64) -> SciriusResult<()>;

    /// Associates a category with a ruleset.
    async fn add_ruleset_category(&self, ruleset_id: i64, category_id: i64)
        -> SciriusResult<()>;

    /// Replaces the category set of a ruleset.
    async fn set_ruleset_categories(
        &self,
        ruleset_id: i64,
        category_ids: &[i64],
    ) -> SciriusResult<()>;

    /// Returns the ids of the source snapshots associated with a ruleset, ascending.
    async fn ruleset_sources(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>>;

    /// Returns the ids of the categories associated with a ruleset, ascending.
    async fn ruleset_categories(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>>;
}

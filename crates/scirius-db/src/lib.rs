//! # scirius-db
//!
//! The data layer the console forms read from and write to.
//!
//! - [`value`] - backend-agnostic [`Value`] used for cleaned form data and record fields
//! - [`fields`] / [`model`] - static field metadata ([`FieldDef`], [`ModelMeta`]) per record type
//! - [`models`] - the records: [`SystemSettings`], [`Source`], [`Category`],
//!   [`SourceAtVersion`], [`Ruleset`]
//! - [`store`] - the [`RuleStore`] trait
//! - [`memory`] - [`MemoryStore`], a process-local store
//! - `sqlite` - `SqliteStore`, backed by `rusqlite` (feature `sqlite`)

pub mod fields;
pub mod memory;
pub mod model;
pub mod models;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod store;
pub mod value;

use std::sync::Arc;

use scirius_core::{DatabaseSettings, SciriusResult, StoreEngine};

pub use fields::{FieldDef, FieldType};
pub use memory::MemoryStore;
pub use model::{Model, ModelMeta};
pub use models::{
    Category, ContentType, FetchMethod, NewCategory, NewRuleset, NewSource, NewSourceAtVersion,
    Ruleset, Source, SourceAtVersion, SystemSettings,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::RuleStore;
pub use value::Value;

/// Opens the store described by `settings`.
///
/// # Errors
///
/// Returns an error if the SQLite database cannot be opened, or if the
/// SQLite engine is requested while the `sqlite` feature is disabled.
pub fn open_store(settings: &DatabaseSettings) -> SciriusResult<Arc<dyn RuleStore>> {
    match settings.engine {
        StoreEngine::Memory => {
            tracing::info!("Using in-memory rule store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StoreEngine::Sqlite => {
            tracing::info!(path = %settings.name, "Opening SQLite rule store");
            Ok(Arc::new(SqliteStore::open(&settings.name)?))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreEngine::Sqlite => Err(scirius_core::SciriusError::ConfigurationError(
            "SQLite store requested but the `sqlite` feature is disabled".to_string(),
        )),
    }
}

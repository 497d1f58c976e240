//! SQLite record store using `rusqlite`.
//!
//! [`SqliteStore`] holds one connection behind a `tokio::sync::Mutex` and
//! runs every statement through `tokio::task::spawn_blocking`.
//!
//! - WAL journal mode and foreign keys are enabled on open
//! - `:memory:` opens an in-memory database (handy for tests)
//! - The schema is created on open if it does not exist yet
//!
//! Timestamps are stored as RFC 3339 text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use scirius_core::{SciriusError, SciriusResult};

use crate::models::{
    Category, NewCategory, NewRuleset, NewSource, NewSourceAtVersion, Ruleset, Source,
    SourceAtVersion, SystemSettings,
};
use crate::store::RuleStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rules_systemsettings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    use_http_proxy INTEGER NOT NULL,
    http_proxy TEXT NOT NULL,
    https_proxy TEXT NOT NULL,
    use_elasticsearch INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS rules_source (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    method TEXT NOT NULL,
    datatype TEXT NOT NULL,
    uri TEXT,
    cert_verif INTEGER NOT NULL,
    authkey TEXT
);
CREATE TABLE IF NOT EXISTS rules_category (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    filename TEXT NOT NULL,
    descr TEXT NOT NULL,
    created_date TEXT NOT NULL,
    source_id INTEGER NOT NULL REFERENCES rules_source(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS rules_sourceatversion (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES rules_source(id) ON DELETE CASCADE,
    version TEXT NOT NULL,
    git_version TEXT NOT NULL,
    updated_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS rules_ruleset (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    descr TEXT NOT NULL,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS rules_ruleset_sources (
    ruleset_id INTEGER NOT NULL REFERENCES rules_ruleset(id) ON DELETE CASCADE,
    sourceatversion_id INTEGER NOT NULL REFERENCES rules_sourceatversion(id) ON DELETE CASCADE,
    PRIMARY KEY (ruleset_id, sourceatversion_id)
);
CREATE TABLE IF NOT EXISTS rules_ruleset_categories (
    ruleset_id INTEGER NOT NULL REFERENCES rules_ruleset(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES rules_category(id) ON DELETE CASCADE,
    PRIMARY KEY (ruleset_id, category_id)
);
";

const SOURCE_COLUMNS: &str =
    "id, name, created_date, updated_date, method, datatype, uri, cert_verif, authkey";
const CATEGORY_COLUMNS: &str = "id, name, filename, descr, created_date, source_id";
const VERSION_COLUMNS: &str = "id, source_id, version, git_version, updated_date";
const RULESET_COLUMNS: &str = "id, name, descr, created_date, updated_date";

/// A SQLite-backed record store.
pub struct SqliteStore {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `OperationalError` if the database cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> SciriusResult<Self> {
        let path = path.into();
        let conn = if path.to_str() == Some(":memory:") {
            Connection::open_in_memory()
        } else {
            Connection::open(&path)
        }
        .map_err(|e| SciriusError::OperationalError(format!("SQLite open failed: {e}")))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SciriusError::OperationalError(format!("Failed to set pragmas: {e}")))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| SciriusError::OperationalError(format!("Failed to create schema: {e}")))?;

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn memory() -> SciriusResult<Self> {
        Self::open(":memory:")
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> SciriusResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> SciriusResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            f(&conn)
        })
        .await
        .map_err(|e| SciriusError::DatabaseError(format!("Task join error: {e}")))?
    }
}

// ── Error and row helpers ──────────────────────────────────────────────

fn db_err(e: rusqlite::Error) -> SciriusError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            SciriusError::IntegrityError(e.to_string())
        }
        rusqlite::Error::QueryReturnedNoRows => SciriusError::DoesNotExist(e.to_string()),
        other => SciriusError::DatabaseError(other.to_string()),
    }
}

fn conversion_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn get_datetime(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

fn get_parsed<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e: String| conversion_err(idx, std::io::Error::other(e)))
}

fn source_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        name: row.get(1)?,
        created_date: get_datetime(row, 2)?,
        updated_date: get_datetime(row, 3)?,
        method: get_parsed(row, 4)?,
        datatype: get_parsed(row, 5)?,
        uri: row.get(6)?,
        cert_verif: row.get(7)?,
        authkey: row.get(8)?,
    })
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        filename: row.get(2)?,
        descr: row.get(3)?,
        created_date: get_datetime(row, 4)?,
        source: row.get(5)?,
    })
}

fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SourceAtVersion> {
    Ok(SourceAtVersion {
        id: row.get(0)?,
        source: row.get(1)?,
        version: row.get(2)?,
        git_version: row.get(3)?,
        updated_date: get_datetime(row, 4)?,
    })
}

fn ruleset_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ruleset> {
    Ok(Ruleset {
        id: row.get(0)?,
        name: row.get(1)?,
        descr: row.get(2)?,
        created_date: get_datetime(row, 3)?,
        updated_date: get_datetime(row, 4)?,
    })
}

fn query_all<T>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> SciriusResult<Vec<T>> {
    let mut stmt = conn.prepare(sql).map_err(db_err)?;
    let rows = stmt.query_map(params, map).map_err(db_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
}

fn query_one<T>(
    conn: &Connection,
    sql: &str,
    id: i64,
    what: &str,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> SciriusResult<T> {
    conn.query_row(sql, params![id], map)
        .optional()
        .map_err(db_err)?
        .ok_or_else(|| SciriusError::DoesNotExist(format!("{what} {id}")))
}

fn require(conn: &Connection, table: &str, id: i64, what: &str) -> SciriusResult<()> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
    let found: Option<i64> = conn
        .query_row(&sql, params![id], |row| row.get(0))
        .optional()
        .map_err(db_err)?;
    found
        .map(|_| ())
        .ok_or_else(|| SciriusError::DoesNotExist(format!("{what} {id}")))
}

fn ids(conn: &Connection, sql: &str, ruleset_id: i64) -> SciriusResult<Vec<i64>> {
    require(conn, "rules_ruleset", ruleset_id, "ruleset")?;
    let mut stmt = conn.prepare(sql).map_err(db_err)?;
    let rows = stmt
        .query_map(params![ruleset_id], |row| row.get::<_, i64>(0))
        .map_err(db_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
}

#[async_trait]
impl RuleStore for SqliteStore {
    async fn system_settings(&self) -> SciriusResult<SystemSettings> {
        self.with_conn(|conn| {
            let stored = conn
                .query_row(
                    "SELECT use_http_proxy, http_proxy, https_proxy, use_elasticsearch \
                     FROM rules_systemsettings WHERE id = 1",
                    [],
                    |row| {
                        Ok(SystemSettings {
                            use_http_proxy: row.get(0)?,
                            http_proxy: row.get(1)?,
                            https_proxy: row.get(2)?,
                            use_elasticsearch: row.get(3)?,
                        })
                    },
                )
                .optional()
                .map_err(db_err)?;
            Ok(stored.unwrap_or_default())
        })
        .await
    }

    async fn save_system_settings(&self, settings: &SystemSettings) -> SciriusResult<()> {
        let settings = settings.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO rules_systemsettings \
                 (id, use_http_proxy, http_proxy, https_proxy, use_elasticsearch) \
                 VALUES (1, ?1, ?2, ?3, ?4) \
                 ON CONFLICT(id) DO UPDATE SET use_http_proxy = excluded.use_http_proxy, \
                 http_proxy = excluded.http_proxy, https_proxy = excluded.https_proxy, \
                 use_elasticsearch = excluded.use_elasticsearch",
                params![
                    settings.use_http_proxy,
                    settings.http_proxy,
                    settings.https_proxy,
                    settings.use_elasticsearch
                ],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn sources(&self) -> SciriusResult<Vec<Source>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {SOURCE_COLUMNS} FROM rules_source ORDER BY id");
            query_all(conn, &sql, [], source_from_row)
        })
        .await
    }

    async fn source(&self, id: i64) -> SciriusResult<Source> {
        self.with_conn(move |conn| {
            let sql = format!("SELECT {SOURCE_COLUMNS} FROM rules_source WHERE id = ?1");
            query_one(conn, &sql, id, "source", source_from_row)
        })
        .await
    }

    async fn create_source(&self, source: NewSource) -> SciriusResult<Source> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO rules_source \
                 (name, created_date, updated_date, method, datatype, uri, cert_verif, authkey) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    source.name,
                    source.created_date.to_rfc3339(),
                    source.updated_date.to_rfc3339(),
                    source.method.as_str(),
                    source.datatype.as_str(),
                    source.uri,
                    source.cert_verif,
                    source.authkey
                ],
            )
            .map_err(db_err)?;
            Ok(source.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update_source(&self, source: &Source) -> SciriusResult<()> {
        let source = source.clone();
        self.with_conn(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE rules_source SET name = ?1, created_date = ?2, updated_date = ?3, \
                     method = ?4, datatype = ?5, uri = ?6, cert_verif = ?7, authkey = ?8 \
                     WHERE id = ?9",
                    params![
                        source.name,
                        source.created_date.to_rfc3339(),
                        source.updated_date.to_rfc3339(),
                        source.method.as_str(),
                        source.datatype.as_str(),
                        source.uri,
                        source.cert_verif,
                        source.authkey,
                        source.id
                    ],
                )
                .map_err(db_err)?;
            if changed == 0 {
                return Err(SciriusError::DoesNotExist(format!("source {}", source.id)));
            }
            Ok(())
        })
        .await
    }

    async fn categories(&self) -> SciriusResult<Vec<Category>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {CATEGORY_COLUMNS} FROM rules_category ORDER BY id");
            query_all(conn, &sql, [], category_from_row)
        })
        .await
    }

    async fn categories_for_source(&self, source_id: i64) -> SciriusResult<Vec<Category>> {
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {CATEGORY_COLUMNS} FROM rules_category WHERE source_id = ?1 ORDER BY id"
            );
            query_all(conn, &sql, params![source_id], category_from_row)
        })
        .await
    }

    async fn create_category(&self, category: NewCategory) -> SciriusResult<Category> {
        self.with_conn(move |conn| {
            require(conn, "rules_source", category.source, "source")?;
            conn.execute(
                "INSERT INTO rules_category (name, filename, descr, created_date, source_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    category.name,
                    category.filename,
                    category.descr,
                    category.created_date.to_rfc3339(),
                    category.source
                ],
            )
            .map_err(db_err)?;
            Ok(category.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn source_versions(&self) -> SciriusResult<Vec<SourceAtVersion>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {VERSION_COLUMNS} FROM rules_sourceatversion ORDER BY id");
            query_all(conn, &sql, [], version_from_row)
        })
        .await
    }

    async fn source_version(&self, id: i64) -> SciriusResult<SourceAtVersion> {
        self.with_conn(move |conn| {
            let sql = format!("SELECT {VERSION_COLUMNS} FROM rules_sourceatversion WHERE id = ?1");
            query_one(conn, &sql, id, "source version", version_from_row)
        })
        .await
    }

    async fn create_source_version(
        &self,
        version: NewSourceAtVersion,
    ) -> SciriusResult<SourceAtVersion> {
        self.with_conn(move |conn| {
            require(conn, "rules_source", version.source, "source")?;
            conn.execute(
                "INSERT INTO rules_sourceatversion (source_id, version, git_version, updated_date) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    version.source,
                    version.version,
                    version.git_version,
                    version.updated_date.to_rfc3339()
                ],
            )
            .map_err(db_err)?;
            Ok(version.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn rulesets(&self) -> SciriusResult<Vec<Ruleset>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {RULESET_COLUMNS} FROM rules_ruleset ORDER BY id");
            query_all(conn, &sql, [], ruleset_from_row)
        })
        .await
    }

    async fn ruleset(&self, id: i64) -> SciriusResult<Ruleset> {
        self.with_conn(move |conn| {
            let sql = format!("SELECT {RULESET_COLUMNS} FROM rules_ruleset WHERE id = ?1");
            query_one(conn, &sql, id, "ruleset", ruleset_from_row)
        })
        .await
    }

    async fn create_ruleset(&self, ruleset: NewRuleset) -> SciriusResult<Ruleset> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO rules_ruleset (name, descr, created_date, updated_date) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    ruleset.name,
                    ruleset.descr,
                    ruleset.created_date.to_rfc3339(),
                    ruleset.updated_date.to_rfc3339()
                ],
            )
            .map_err(db_err)?;
            Ok(ruleset.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update_ruleset(&self, ruleset: &Ruleset) -> SciriusResult<()> {
        let ruleset = ruleset.clone();
        self.with_conn(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE rules_ruleset SET name = ?1, descr = ?2, created_date = ?3, \
                     updated_date = ?4 WHERE id = ?5",
                    params![
                        ruleset.name,
                        ruleset.descr,
                        ruleset.created_date.to_rfc3339(),
                        ruleset.updated_date.to_rfc3339(),
                        ruleset.id
                    ],
                )
                .map_err(db_err)?;
            if changed == 0 {
                return Err(SciriusError::DoesNotExist(format!("ruleset {}", ruleset.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete_ruleset(&self, id: i64) -> SciriusResult<()> {
        self.with_conn(move |conn| {
            let changed = conn
                .execute("DELETE FROM rules_ruleset WHERE id = ?1", params![id])
                .map_err(db_err)?;
            if changed == 0 {
                return Err(SciriusError::DoesNotExist(format!("ruleset {id}")));
            }
            Ok(())
        })
        .await
    }

    async fn add_ruleset_source(&self, ruleset_id: i64, version_id: i64) -> SciriusResult<()> {
        self.with_conn(move |conn| {
            require(conn, "rules_ruleset", ruleset_id, "ruleset")?;
            require(conn, "rules_sourceatversion", version_id, "source version")?;
            conn.execute(
                "INSERT OR IGNORE INTO rules_ruleset_sources (ruleset_id, sourceatversion_id) \
                 VALUES (?1, ?2)",
                params![ruleset_id, version_id],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn add_ruleset_category(
        &self,
        ruleset_id: i64,
        category_id: i64,
    ) -> SciriusResult<()> {
        self.with_conn(move |conn| {
            require(conn, "rules_ruleset", ruleset_id, "ruleset")?;
            require(conn, "rules_category", category_id, "category")?;
            conn.execute(
                "INSERT OR IGNORE INTO rules_ruleset_categories (ruleset_id, category_id) \
                 VALUES (?1, ?2)",
                params![ruleset_id, category_id],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn set_ruleset_categories(
        &self,
        ruleset_id: i64,
        category_ids: &[i64],
    ) -> SciriusResult<()> {
        let category_ids = category_ids.to_vec();
        self.with_conn(move |conn| {
            require(conn, "rules_ruleset", ruleset_id, "ruleset")?;
            for id in &category_ids {
                require(conn, "rules_category", *id, "category")?;
            }
            let tx = conn.unchecked_transaction().map_err(db_err)?;
            tx.execute(
                "DELETE FROM rules_ruleset_categories WHERE ruleset_id = ?1",
                params![ruleset_id],
            )
            .map_err(db_err)?;
            for id in &category_ids {
                tx.execute(
                    "INSERT OR IGNORE INTO rules_ruleset_categories (ruleset_id, category_id) \
                     VALUES (?1, ?2)",
                    params![ruleset_id, id],
                )
                .map_err(db_err)?;
            }
            tx.commit().map_err(db_err)
        })
        .await
    }

    async fn ruleset_sources(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>> {
        self.with_conn(move |conn| {
            ids(
                conn,
                "SELECT sourceatversion_id FROM rules_ruleset_sources \
                 WHERE ruleset_id = ?1 ORDER BY sourceatversion_id",
                ruleset_id,
            )
        })
        .await
    }

    async fn ruleset_categories(&self, ruleset_id: i64) -> SciriusResult<Vec<i64>> {
        self.with_conn(move |conn| {
            ids(
                conn,
                "SELECT category_id FROM rules_ruleset_categories \
                 WHERE ruleset_id = ?1 ORDER BY category_id",
                ruleset_id,
            )
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, FetchMethod};

    fn new_source(name: &str) -> NewSource {
        let now = Utc::now();
        NewSource {
            name: name.to_string(),
            created_date: now,
            updated_date: now,
            method: FetchMethod::Local,
            datatype: ContentType::Sig,
            uri: None,
            cert_verif: false,
            authkey: Some("k3y".to_string()),
        }
    }

    #[tokio::test]
    async fn test_open_memory() {
        let store = SqliteStore::memory().unwrap();
        assert_eq!(store.path(), Path::new(":memory:"));
        assert!(store.rulesets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_source_round_trip_preserves_fields() {
        let store = SqliteStore::memory().unwrap();
        let created = store.create_source(new_source("local")).await.unwrap();
        let loaded = store.source(created.id).await.unwrap();
        assert_eq!(loaded.method, FetchMethod::Local);
        assert_eq!(loaded.datatype, ContentType::Sig);
        assert_eq!(loaded.authkey.as_deref(), Some("k3y"));
        assert_eq!(
            loaded.created_date.timestamp_micros(),
            created.created_date.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_duplicate_ruleset_is_integrity_error() {
        let store = SqliteStore::memory().unwrap();
        store
            .create_ruleset(NewRuleset::named("dup", Utc::now()))
            .await
            .unwrap();
        let err = store
            .create_ruleset(NewRuleset::named("dup", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, SciriusError::IntegrityError(_)));
    }

    #[tokio::test]
    async fn test_missing_records_are_does_not_exist() {
        let store = SqliteStore::memory().unwrap();
        assert!(matches!(
            store.ruleset(7).await,
            Err(SciriusError::DoesNotExist(_))
        ));
        assert!(matches!(
            store.delete_ruleset(7).await,
            Err(SciriusError::DoesNotExist(_))
        ));
        assert!(matches!(
            store.ruleset_sources(7).await,
            Err(SciriusError::DoesNotExist(_))
        ));
    }

    #[tokio::test]
    async fn test_settings_upsert() {
        let store = SqliteStore::memory().unwrap();
        assert_eq!(store.system_settings().await.unwrap(), SystemSettings::default());
        let mut s = SystemSettings::default();
        s.use_elasticsearch = false;
        store.save_system_settings(&s).await.unwrap();
        s.https_proxy = "http://proxy:8080".into();
        store.save_system_settings(&s).await.unwrap();
        assert_eq!(store.system_settings().await.unwrap(), s);
    }

    #[tokio::test]
    async fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.sqlite3");
        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .create_ruleset(NewRuleset::named("persisted", Utc::now()))
                .await
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let names: Vec<String> = store
            .rulesets()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["persisted"]);
    }
}
